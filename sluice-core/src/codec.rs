//! Pipeline description codec
//!
//! A pipeline request is submitted as JSON and stored verbatim as a
//! [`Description`](crate::domain::description::Description). Restart rebuilds
//! the stage list from that text, so encoding and decoding must preserve
//! stage order, names, descriptions and parameters exactly.
//!
//! Expected shape:
//!
//! ```json
//! {
//!   "etl_process": {
//!     "description": "Nightly customer export",
//!     "stages": [
//!       { "name": "extract", "parameters": { "source_type": "database" } },
//!       { "name": "output", "parameters": { "output_type": "csv" } }
//!     ]
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::stage::StageDescriptor;

/// Errors raised while encoding or decoding descriptions
#[derive(Debug, Error)]
pub enum CodecError {
    /// The text is not valid JSON or lacks `etl_process.stages`
    #[error("malformed description: {0}")]
    Malformed(String),

    #[error("description is {len} characters long (max {max})")]
    DescriptionTooLong { len: usize, max: usize },

    #[error("failed to encode description: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Top-level pipeline request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineRequest {
    pub etl_process: PipelineBody,
}

/// Body of a pipeline request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub stages: Vec<StageDescriptor>,
}

/// Parse a full pipeline request
pub fn parse_request(text: &str) -> Result<PipelineRequest, CodecError> {
    serde_json::from_str(text).map_err(|e| CodecError::Malformed(e.to_string()))
}

/// Decode the ordered stage list from stored description text
pub fn decode(text: &str) -> Result<Vec<StageDescriptor>, CodecError> {
    parse_request(text).map(|request| request.etl_process.stages)
}

/// Encode a stage list into canonical request text
pub fn encode(description: Option<&str>, stages: &[StageDescriptor]) -> Result<String, CodecError> {
    let request = PipelineRequest {
        etl_process: PipelineBody {
            description: description.map(str::to_string),
            stages: stages.to_vec(),
        },
    };

    serde_json::to_string(&request).map_err(CodecError::Encode)
}
