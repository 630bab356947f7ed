//! Engine error types

use std::path::PathBuf;

use sluice_core::CodecError;
use thiserror::Error;
use uuid::Uuid;

use crate::source::SourceError;
use crate::store::StoreError;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors surfaced by the pipeline runner and the lifecycle manager
///
/// Every variant is fatal to the run or call that raised it. Nothing is
/// retried.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("unsupported stage: {0}")]
    UnsupportedStage(String),

    #[error("invalid parameters for stage '{stage}': {message}")]
    InvalidParameters { stage: String, message: String },

    #[error("extraction failed: {0}")]
    Extraction(#[from] SourceError),

    #[error("output file {} already exists and 'overwrite_existing' is false", .0.display())]
    OutputConflict(PathBuf),

    #[error("failed to write output to {}: {source}", path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("process {0} not found")]
    ProcessNotFound(Uuid),

    #[error("description {0} not found")]
    DescriptionNotFound(Uuid),

    #[error("no stages found for description {0}")]
    EmptyPipeline(Uuid),

    #[error("malformed description: {0}")]
    MalformedDescription(String),

    #[error("storage error: {0}")]
    Storage(#[from] StoreError),
}

impl From<CodecError> for EngineError {
    fn from(err: CodecError) -> Self {
        match err {
            CodecError::Malformed(msg) => EngineError::MalformedDescription(msg),
            other => EngineError::MalformedDescription(other.to_string()),
        }
    }
}
