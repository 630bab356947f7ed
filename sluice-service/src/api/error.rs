//! API Error Handling
//!
//! Unified error types and conversion for API responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sluice_core::CodecError;
use sluice_engine::{EngineError, StoreError};

/// API error type
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Conflict(String),
    StorageError(StoreError),
    InternalError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::StorageError(err) => {
                tracing::error!("Storage error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::ProcessNotFound(_) | EngineError::DescriptionNotFound(_) => {
                ApiError::NotFound(err.to_string())
            }
            EngineError::UnsupportedStage(_)
            | EngineError::InvalidParameters { .. }
            | EngineError::EmptyPipeline(_)
            | EngineError::MalformedDescription(_) => ApiError::BadRequest(err.to_string()),
            EngineError::OutputConflict(_) => ApiError::Conflict(err.to_string()),
            EngineError::Storage(store_err) => ApiError::StorageError(store_err),
            EngineError::Extraction(_) | EngineError::OutputWrite { .. } => {
                ApiError::InternalError(err.to_string())
            }
        }
    }
}

impl From<CodecError> for ApiError {
    fn from(err: CodecError) -> Self {
        match err {
            CodecError::Malformed(_) | CodecError::DescriptionTooLong { .. } => {
                ApiError::BadRequest(err.to_string())
            }
            CodecError::Encode(_) => {
                ApiError::InternalError(err.to_string())
            }
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
