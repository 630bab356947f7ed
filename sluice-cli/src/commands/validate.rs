//! Validate command
//!
//! Decodes a request and resolves every stage without running anything.

use anyhow::{Context, Result};
use colored::*;
use sluice_core::codec::{self, PipelineRequest};
use sluice_core::domain::description::Description;
use sluice_engine::runner::{self, PlannedStage};

/// Print the request's stages with their resolved kinds
pub fn validate_request(text: &str) -> Result<()> {
    let (request, planned) = check(text)?;

    println!("{}", "✓ Pipeline request is valid".green().bold());
    if let Some(description) = &request.etl_process.description {
        println!("  Description: {}", description.bold());
    }
    println!("  Stages:      {}", planned.len().to_string().cyan());

    for (idx, (stage, declared)) in planned
        .iter()
        .zip(&request.etl_process.stages)
        .enumerate()
    {
        println!(
            "    {}. {} {}",
            idx + 1,
            stage.operation.kind().to_string().cyan(),
            declared
                .description
                .as_ref()
                .map(|d| format!("({})", d))
                .unwrap_or_default()
                .dimmed()
        );
    }

    Ok(())
}

/// Decode the request and build its execution plan
pub(crate) fn check(text: &str) -> Result<(PipelineRequest, Vec<PlannedStage>)> {
    Description::new(text).context("Request cannot be stored as a description")?;
    let request = codec::parse_request(text).context("Failed to parse pipeline request")?;
    let planned = runner::plan(&request.etl_process.stages).context("Invalid pipeline")?;

    Ok((request, planned))
}
