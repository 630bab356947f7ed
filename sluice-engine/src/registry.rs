//! Stage handler registry
//!
//! Resolves a stage's declared name to one of the fixed handler kinds and
//! decodes its parameters into the matching [`StageOperation`].

use serde::de::DeserializeOwned;
use serde_json::Value;
use sluice_core::domain::stage::{Parameters, StageDescriptor};

use crate::error::{EngineError, Result};
use crate::params::{ExtractParams, OutputParams, TransformParams};

/// The fixed set of handler kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageKind {
    Extract,
    Clean,
    Anonymize,
    Transform,
    Merge,
    Output,
}

impl StageKind {
    /// Resolve a declared stage name, ignoring case
    pub fn resolve(name: &str) -> Result<Self> {
        match name.to_lowercase().as_str() {
            "extract" => Ok(StageKind::Extract),
            "clean" => Ok(StageKind::Clean),
            "anonymize" => Ok(StageKind::Anonymize),
            "transform" => Ok(StageKind::Transform),
            "merge" => Ok(StageKind::Merge),
            "output" => Ok(StageKind::Output),
            _ => Err(EngineError::UnsupportedStage(name.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StageKind::Extract => "extract",
            StageKind::Clean => "clean",
            StageKind::Anonymize => "anonymize",
            StageKind::Transform => "transform",
            StageKind::Merge => "merge",
            StageKind::Output => "output",
        }
    }

    /// Whether this kind replaces the dataset flowing to later stages
    pub fn produces_data(&self) -> bool {
        matches!(self, StageKind::Extract | StageKind::Transform)
    }
}

impl std::fmt::Display for StageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stage's behavior together with its typed parameters
///
/// Clean, anonymize and merge are policy hooks: their parameters are kept
/// as-is and they leave the dataset untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum StageOperation {
    Extract(ExtractParams),
    Clean(Parameters),
    Anonymize(Parameters),
    Transform(TransformParams),
    Merge(Parameters),
    Output(OutputParams),
}

impl StageOperation {
    /// Resolve the handler for a descriptor and decode its parameters
    pub fn decode(descriptor: &StageDescriptor) -> Result<Self> {
        let kind = StageKind::resolve(&descriptor.name)?;

        let operation = match kind {
            StageKind::Extract => StageOperation::Extract(typed(descriptor)?),
            StageKind::Clean => StageOperation::Clean(descriptor.parameters.clone()),
            StageKind::Anonymize => StageOperation::Anonymize(descriptor.parameters.clone()),
            StageKind::Transform => StageOperation::Transform(typed(descriptor)?),
            StageKind::Merge => StageOperation::Merge(descriptor.parameters.clone()),
            StageKind::Output => StageOperation::Output(typed(descriptor)?),
        };

        Ok(operation)
    }

    pub fn kind(&self) -> StageKind {
        match self {
            StageOperation::Extract(_) => StageKind::Extract,
            StageOperation::Clean(_) => StageKind::Clean,
            StageOperation::Anonymize(_) => StageKind::Anonymize,
            StageOperation::Transform(_) => StageKind::Transform,
            StageOperation::Merge(_) => StageKind::Merge,
            StageOperation::Output(_) => StageKind::Output,
        }
    }
}

fn typed<T: DeserializeOwned>(descriptor: &StageDescriptor) -> Result<T> {
    serde_json::from_value(Value::Object(descriptor.parameters.clone())).map_err(|e| {
        EngineError::InvalidParameters {
            stage: descriptor.name.clone(),
            message: e.to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::TransformOperation;
    use serde_json::json;

    #[test]
    fn test_resolve_is_case_insensitive() {
        assert_eq!(StageKind::resolve("EXTRACT").unwrap(), StageKind::Extract);
        assert_eq!(StageKind::resolve("Anonymize").unwrap(), StageKind::Anonymize);
        assert_eq!(StageKind::resolve("output").unwrap(), StageKind::Output);
    }

    #[test]
    fn test_resolve_unknown_name() {
        match StageKind::resolve("Load") {
            Err(EngineError::UnsupportedStage(name)) => assert_eq!(name, "Load"),
            other => panic!("expected unsupported stage, got {:?}", other),
        }
    }

    #[test]
    fn test_data_producing_kinds() {
        assert!(StageKind::Extract.produces_data());
        assert!(StageKind::Transform.produces_data());
        assert!(!StageKind::Output.produces_data());
        assert!(!StageKind::Merge.produces_data());
    }

    #[test]
    fn test_decode_transform() {
        let descriptor = StageDescriptor::new("Transform").with_parameter(
            "transformations",
            json!([{"column": "name", "operation": "uppercase"}]),
        );

        match StageOperation::decode(&descriptor).unwrap() {
            StageOperation::Transform(params) => {
                assert_eq!(params.transformations.len(), 1);
                assert_eq!(params.transformations[0].column, "name");
                assert_eq!(
                    params.transformations[0].operation,
                    TransformOperation::Uppercase
                );
            }
            other => panic!("unexpected operation: {:?}", other),
        }
    }

    #[test]
    fn test_decode_policy_hooks_accept_anything() {
        for name in ["clean", "anonymize", "merge"] {
            let descriptor = StageDescriptor::new(name).with_parameter("anything", json!([1, 2]));
            let operation = StageOperation::decode(&descriptor).unwrap();
            assert_eq!(operation.kind().as_str(), name);
        }
    }

    #[test]
    fn test_decode_invalid_parameters() {
        let descriptor = StageDescriptor::new("transform");
        match StageOperation::decode(&descriptor) {
            Err(EngineError::InvalidParameters { stage, message }) => {
                assert_eq!(stage, "transform");
                assert!(message.contains("transformations"));
            }
            other => panic!("expected invalid parameters, got {:?}", other),
        }
    }
}
