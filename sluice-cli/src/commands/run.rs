//! Run command
//!
//! Executes a request locally against an in-memory store.

use anyhow::{Context, Result};
use colored::*;
use sluice_core::codec;
use sluice_core::domain::description::Description;
use sluice_core::domain::process::{Process, ProcessStatus};
use sluice_engine::{MemoryStore, PgSourceConnector, PipelineRunner, ProcessManager};
use std::sync::Arc;

/// Run the request and print the resulting process
pub async fn run_request(text: &str) -> Result<()> {
    let process = execute(text).await?;
    print_process(&process);
    Ok(())
}

pub(crate) async fn execute(text: &str) -> Result<Process> {
    let request = codec::parse_request(text).context("Failed to parse pipeline request")?;
    let description = Description::new(text).context("Request cannot be stored as a description")?;

    let manager = ProcessManager::new(
        Arc::new(MemoryStore::new()),
        PipelineRunner::new(Arc::new(PgSourceConnector::new())),
    );

    let process_id = manager
        .start(description, request.etl_process.stages)
        .await
        .context("Pipeline run failed")?;

    Ok(manager.status(process_id).await?)
}

fn print_process(process: &Process) {
    let status = match process.status {
        ProcessStatus::Completed => process.status.to_string().green().bold(),
        ProcessStatus::Terminated => process.status.to_string().red().bold(),
        ProcessStatus::InProgress => process.status.to_string().yellow().bold(),
    };

    println!("{}", "✓ Pipeline run finished".green().bold());
    println!("  Process:     {}", process.id.to_string().cyan());
    println!("  Description: {}", process.description_id.to_string().dimmed());
    println!("  Status:      {}", status);
    println!(
        "  Stages:      {}",
        process
            .stages
            .iter()
            .map(|s| s.name())
            .collect::<Vec<_>>()
            .join(", ")
            .dimmed()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_execute_hook_pipeline_completes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        let text = json!({
            "etl_process": {
                "stages": [
                    {"name": "clean"},
                    {
                        "name": "output",
                        "parameters": {"output_type": "csv", "output_location": path.to_string_lossy()}
                    }
                ]
            }
        })
        .to_string();

        let process = execute(&text).await.unwrap();

        assert_eq!(process.status, ProcessStatus::Completed);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    }

    #[tokio::test]
    async fn test_execute_reports_failure() {
        let text = r#"{"etl_process":{"stages":[{"name":"load"}]}}"#;
        let err = execute(text).await.unwrap_err();
        assert!(format!("{:#}", err).contains("unsupported stage"));
    }
}
