//! Stage domain types

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Free-form stage parameters, keyed by parameter name
pub type Parameters = serde_json::Map<String, Value>;

/// One declared pipeline step
///
/// This is the shape stages take inside a pipeline request. The `name`
/// selects the handler (case-insensitive); `parameters` are interpreted by
/// that handler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageDescriptor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub parameters: Parameters,
}

impl StageDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            parameters: Parameters::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }
}

/// A stage linked to the process that owns it
///
/// `position` is the zero-based index in the declared stage list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    pub id: Uuid,
    pub process_id: Uuid,
    pub position: u32,
    #[serde(flatten)]
    pub descriptor: StageDescriptor,
}

impl Stage {
    pub fn link(process_id: Uuid, position: u32, descriptor: StageDescriptor) -> Self {
        Self {
            id: Uuid::new_v4(),
            process_id,
            position,
            descriptor,
        }
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Parameters, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Parameters>::deserialize(deserializer).map(Option::unwrap_or_default)
}
