//! API Module
//!
//! HTTP API layer for the service.
//! Each submodule handles endpoints for a specific domain.

pub mod error;
pub mod health;
pub mod process;

use axum::{
    Router,
    routing::{delete, get, post, put},
};
use sluice_engine::ProcessManager;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Create the main API router with all endpoints
pub fn create_router(manager: Arc<ProcessManager>) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Process endpoints
        .route("/etl-process/run", post(process::run_process))
        .route(
            "/etl-process/terminate/{process_id}",
            delete(process::terminate_process),
        )
        .route(
            "/etl-process/etl-description/{description_id}/restart/{process_id}",
            put(process::restart_process),
        )
        .route("/etl-process/{process_id}", get(process::get_process))
        // Add state and middleware
        .with_state(manager)
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use serde_json::{Value, json};
    use sluice_engine::{MemoryStore, PgSourceConnector, PipelineRunner};
    use tempfile::TempDir;
    use tower::ServiceExt;
    use uuid::Uuid;

    fn app() -> Router {
        let manager = ProcessManager::new(
            Arc::new(MemoryStore::new()),
            PipelineRunner::new(Arc::new(PgSourceConnector::new())),
        );
        create_router(Arc::new(manager))
    }

    fn pipeline(output: &std::path::Path, overwrite: bool) -> String {
        json!({
            "etl_process": {
                "description": "hooks only",
                "stages": [
                    {"name": "clean", "parameters": {}},
                    {"name": "merge", "parameters": {}},
                    {
                        "name": "output",
                        "parameters": {
                            "output_type": "csv",
                            "output_location": output.to_string_lossy(),
                            "overwrite_existing": overwrite
                        }
                    }
                ]
            }
        })
        .to_string()
    }

    async fn send(app: &Router, method: &str, uri: &str, body: String) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    fn id(value: &Value, key: &str) -> Uuid {
        value[key].as_str().unwrap().parse().unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (status, _) = send(&app(), "GET", "/health", String::new()).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_run_then_get_process() {
        let dir = TempDir::new().unwrap();
        let app = app();

        let (status, body) = send(
            &app,
            "POST",
            "/etl-process/run",
            pipeline(&dir.path().join("out.csv"), false),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let process_id = id(&body, "process_id");

        let (status, body) = send(&app, "GET", &format!("/etl-process/{}", process_id), String::new()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], json!("COMPLETED"));
        assert_eq!(body["stages"], json!(["clean", "merge", "output"]));
    }

    #[tokio::test]
    async fn test_run_rejects_malformed_and_unsupported() {
        let app = app();

        let (status, body) = send(&app, "POST", "/etl-process/run", "{not json".to_string()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());

        let unsupported = r#"{"etl_process":{"stages":[{"name":"load"}]}}"#.to_string();
        let (status, _) = send(&app, "POST", "/etl-process/run", unsupported).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_run_output_conflict() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        std::fs::write(&path, "keep").unwrap();

        let (status, _) = send(&app(), "POST", "/etl-process/run", pipeline(&path, false)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "keep");
    }

    #[tokio::test]
    async fn test_terminate_completed_and_unknown() {
        let dir = TempDir::new().unwrap();
        let app = app();
        let (_, body) = send(
            &app,
            "POST",
            "/etl-process/run",
            pipeline(&dir.path().join("out.csv"), true),
        )
        .await;
        let process_id = id(&body, "process_id");

        let uri = format!("/etl-process/terminate/{}", process_id);
        let (status, body) = send(&app, "DELETE", &uri, String::new()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["outcome"], json!("already_completed"));

        let uri = format!("/etl-process/terminate/{}", Uuid::new_v4());
        let (status, _) = send(&app, "DELETE", &uri, String::new()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_restart_creates_new_process() {
        let dir = TempDir::new().unwrap();
        let app = app();
        let (_, body) = send(
            &app,
            "POST",
            "/etl-process/run",
            pipeline(&dir.path().join("out.csv"), true),
        )
        .await;
        let process_id = id(&body, "process_id");
        let description_id = id(&body, "description_id");

        let uri = format!(
            "/etl-process/etl-description/{}/restart/{}",
            description_id, process_id
        );
        let (status, body) = send(&app, "PUT", &uri, String::new()).await;
        assert_eq!(status, StatusCode::OK);
        assert_ne!(id(&body, "process_id"), process_id);

        let uri = format!(
            "/etl-process/etl-description/{}/restart/{}",
            Uuid::new_v4(),
            process_id
        );
        let (status, _) = send(&app, "PUT", &uri, String::new()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
