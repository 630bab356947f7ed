//! Typed stage parameters
//!
//! Each handler kind has its own parameter schema. Stage parameter maps are
//! decoded into these types before a run starts, so handlers never inspect
//! untyped JSON.

use serde::Deserialize;
use std::path::PathBuf;

/// Parameters of an `extract` stage, tagged by `source_type`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "source_type")]
pub enum ExtractParams {
    #[serde(rename = "database")]
    Database { source_details: DatabaseSource },
    /// Any other source type; extracts nothing
    #[serde(other)]
    Unsupported,
}

/// Connection details and query for a database source
#[derive(Clone, PartialEq, Deserialize)]
pub struct DatabaseSource {
    pub db_url: String,
    pub username: String,
    pub password: String,
    pub query: String,
}

impl std::fmt::Debug for DatabaseSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseSource")
            .field("db_url", &self.db_url)
            .field("username", &self.username)
            .field("password", &"********")
            .field("query", &self.query)
            .finish()
    }
}

/// Parameters of a `transform` stage
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TransformParams {
    pub transformations: Vec<TransformRule>,
}

/// A single column rule, applied to every record
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TransformRule {
    pub column: String,
    pub operation: TransformOperation,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum TransformOperation {
    Uppercase,
    /// Not understood by this engine; applying it changes nothing
    Unknown(String),
}

impl From<String> for TransformOperation {
    fn from(name: String) -> Self {
        match name.as_str() {
            "uppercase" => TransformOperation::Uppercase,
            _ => TransformOperation::Unknown(name),
        }
    }
}

/// Parameters of an `output` stage, tagged by `output_type`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "output_type")]
pub enum OutputParams {
    #[serde(rename = "csv")]
    Csv {
        output_location: PathBuf,
        #[serde(default)]
        overwrite_existing: bool,
    },
    /// Any other output type; writes nothing
    #[serde(other)]
    Unsupported,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_database() {
        let params: ExtractParams = serde_json::from_value(json!({
            "source_type": "database",
            "source_details": {
                "db_url": "postgres://localhost/crm",
                "username": "etl",
                "password": "secret",
                "query": "SELECT 1"
            }
        }))
        .unwrap();

        match params {
            ExtractParams::Database { source_details } => {
                assert_eq!(source_details.username, "etl");
                assert_eq!(source_details.query, "SELECT 1");
            }
            other => panic!("unexpected params: {:?}", other),
        }
    }

    #[test]
    fn test_extract_unknown_source_type() {
        let params: ExtractParams =
            serde_json::from_value(json!({"source_type": "s3", "bucket": "x"})).unwrap();
        assert_eq!(params, ExtractParams::Unsupported);
    }

    #[test]
    fn test_extract_database_missing_details() {
        let result = serde_json::from_value::<ExtractParams>(json!({"source_type": "database"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_database_source_debug_hides_password() {
        let source = DatabaseSource {
            db_url: "postgres://db".into(),
            username: "etl".into(),
            password: "hunter2".into(),
            query: "SELECT 1".into(),
        };
        assert!(!format!("{:?}", source).contains("hunter2"));
    }

    #[test]
    fn test_transform_operations() {
        let params: TransformParams = serde_json::from_value(json!({
            "transformations": [
                {"column": "name", "operation": "uppercase"},
                {"column": "name", "operation": "reverse"}
            ]
        }))
        .unwrap();

        assert_eq!(params.transformations[0].operation, TransformOperation::Uppercase);
        assert_eq!(
            params.transformations[1].operation,
            TransformOperation::Unknown("reverse".into())
        );
    }

    #[test]
    fn test_output_csv_defaults_overwrite_to_false() {
        let params: OutputParams = serde_json::from_value(json!({
            "output_type": "csv",
            "output_location": "/tmp/out.csv"
        }))
        .unwrap();

        assert_eq!(
            params,
            OutputParams::Csv {
                output_location: PathBuf::from("/tmp/out.csv"),
                overwrite_existing: false,
            }
        );
    }

    #[test]
    fn test_output_unknown_type() {
        let params: OutputParams =
            serde_json::from_value(json!({"output_type": "parquet"})).unwrap();
        assert_eq!(params, OutputParams::Unsupported);
    }
}
