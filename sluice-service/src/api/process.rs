//! Process API Handlers
//!
//! HTTP endpoints for running, terminating, restarting and inspecting
//! pipeline processes.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use sluice_core::codec;
use sluice_core::domain::description::Description;
use sluice_core::dto::process::{ProcessSummary, RestartAccepted, RunAccepted, TerminateResponse};
use sluice_engine::ProcessManager;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};

/// POST /etl-process/run
/// Store the submitted request and run it to the end
///
/// The body is kept verbatim as the process description.
pub async fn run_process(
    State(manager): State<Arc<ProcessManager>>,
    body: String,
) -> ApiResult<(StatusCode, Json<RunAccepted>)> {
    let request = codec::parse_request(&body)?;
    let description = Description::new(body)?;
    let description_id = description.id;

    tracing::info!(
        "Running pipeline with {} stage(s), description: {}",
        request.etl_process.stages.len(),
        description_id
    );

    // Runs on its own task so a dropped connection can't abandon the run
    let process_id = tokio::spawn(async move {
        manager
            .start(description, request.etl_process.stages)
            .await
    })
    .await
    .map_err(|e| ApiError::InternalError(format!("Pipeline task failed: {}", e)))??;

    Ok((
        StatusCode::CREATED,
        Json(RunAccepted {
            process_id,
            description_id,
        }),
    ))
}

/// DELETE /etl-process/terminate/{process_id}
pub async fn terminate_process(
    State(manager): State<Arc<ProcessManager>>,
    Path(process_id): Path<Uuid>,
) -> ApiResult<Json<TerminateResponse>> {
    tracing::info!("Terminating process: {}", process_id);

    let outcome = manager.terminate(process_id).await?;

    Ok(Json(TerminateResponse {
        process_id,
        outcome,
    }))
}

/// PUT /etl-process/etl-description/{description_id}/restart/{process_id}
pub async fn restart_process(
    State(manager): State<Arc<ProcessManager>>,
    Path((description_id, process_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<RestartAccepted>> {
    tracing::info!(
        "Restarting process {} from description {}",
        process_id,
        description_id
    );

    let process_id = tokio::spawn(async move { manager.restart(description_id, process_id).await })
        .await
        .map_err(|e| ApiError::InternalError(format!("Pipeline task failed: {}", e)))??;

    Ok(Json(RestartAccepted { process_id }))
}

/// GET /etl-process/{process_id}
pub async fn get_process(
    State(manager): State<Arc<ProcessManager>>,
    Path(process_id): Path<Uuid>,
) -> ApiResult<Json<ProcessSummary>> {
    tracing::debug!("Getting process: {}", process_id);

    let process = manager.status(process_id).await?;
    Ok(Json(process.into()))
}
