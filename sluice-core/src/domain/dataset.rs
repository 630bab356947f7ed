//! Tabular dataset passed between stages

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One row: column name to value, in column order
pub type Record = serde_json::Map<String, Value>;

/// Ordered sequence of records
///
/// Stages hand datasets to each other by value, so a stage never observes
/// mutations made by another consumer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn records_mut(&mut self) -> &mut [Record] {
        &mut self.records
    }

    /// Column names of the first record, in that record's key order
    pub fn columns(&self) -> Option<Vec<&str>> {
        self.records
            .first()
            .map(|record| record.keys().map(String::as_str).collect())
    }
}

impl From<Vec<Record>> for Dataset {
    fn from(records: Vec<Record>) -> Self {
        Self { records }
    }
}

/// Textual form of a cell value
///
/// Missing and null values render as `null`, strings render without quotes,
/// everything else renders as compact JSON.
pub fn text_form(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "null".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_columns_follow_first_record_order() {
        let dataset: Dataset = vec![
            record(json!({"zeta": 1, "alpha": 2, "mid": 3})),
            record(json!({"other": true})),
        ]
        .into();

        assert_eq!(dataset.columns().unwrap(), ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_columns_of_empty_dataset() {
        assert!(Dataset::new().columns().is_none());
    }

    #[test]
    fn test_text_form() {
        assert_eq!(text_form(None), "null");
        assert_eq!(text_form(Some(&Value::Null)), "null");
        assert_eq!(text_form(Some(&json!("ana"))), "ana");
        assert_eq!(text_form(Some(&json!(42))), "42");
        assert_eq!(text_form(Some(&json!(1.5))), "1.5");
        assert_eq!(text_form(Some(&json!(true))), "true");
        assert_eq!(text_form(Some(&json!({"a": [1, 2]}))), r#"{"a":[1,2]}"#);
    }

    #[test]
    fn test_clone_is_independent() {
        let original: Dataset = vec![record(json!({"name": "ana"}))].into();
        let mut copy = original.clone();
        copy.records_mut()[0].insert("name".into(), json!("ANA"));

        assert_eq!(original.records()[0]["name"], json!("ana"));
    }
}
