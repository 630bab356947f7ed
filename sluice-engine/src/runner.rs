//! Pipeline runner
//!
//! Executes a stage list strictly in declared order. The dataset produced by
//! each data-producing stage is handed by value to the next stage. Before
//! every stage the runner checks its cancellation token; once cancelled it
//! stops without starting another stage. A stage that is already running is
//! never interrupted.

use sluice_core::domain::dataset::Dataset;
use sluice_core::domain::stage::StageDescriptor;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::handlers::{extract, output, transform};
use crate::registry::StageOperation;
use crate::source::SourceConnector;

/// A stage resolved to its handler, ready to execute
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedStage {
    pub name: String,
    pub operation: StageOperation,
}

/// Result of a run that did not fail
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    /// Dataset from the most recent data-producing stage
    pub dataset: Option<Dataset>,
    /// Number of stages that ran to completion
    pub stages_run: usize,
    /// Whether the run stopped early because it was cancelled
    pub cancelled: bool,
}

/// Resolve every stage before anything executes
///
/// Fails on the first stage with an unknown name or parameters that don't
/// fit its kind.
pub fn plan(stages: &[StageDescriptor]) -> Result<Vec<PlannedStage>> {
    stages
        .iter()
        .map(|descriptor| {
            Ok(PlannedStage {
                name: descriptor.name.clone(),
                operation: StageOperation::decode(descriptor)?,
            })
        })
        .collect()
}

pub struct PipelineRunner {
    connector: Arc<dyn SourceConnector>,
}

impl PipelineRunner {
    pub fn new(connector: Arc<dyn SourceConnector>) -> Self {
        Self { connector }
    }

    /// Run all stages against an initially absent dataset
    pub async fn run(
        &self,
        stages: &[StageDescriptor],
        cancel: &CancellationToken,
    ) -> Result<RunOutcome> {
        let plan = plan(stages)?;
        let total = plan.len();
        let mut dataset: Option<Dataset> = None;

        for (idx, stage) in plan.iter().enumerate() {
            if cancel.is_cancelled() {
                info!(
                    "Run cancelled before stage {}/{} ({})",
                    idx + 1,
                    total,
                    stage.name
                );
                return Ok(RunOutcome {
                    dataset,
                    stages_run: idx,
                    cancelled: true,
                });
            }

            debug!("Executing stage {}/{}: {}", idx + 1, total, stage.name);
            dataset = self.execute_stage(stage, dataset).await?;

            if stage.operation.kind().produces_data() {
                let rows = dataset.as_ref().map_or(0, Dataset::len);
                debug!("Stage '{}' completed with {} row(s)", stage.name, rows);
            } else {
                debug!("Stage '{}' completed", stage.name);
            }
        }

        Ok(RunOutcome {
            dataset,
            stages_run: total,
            cancelled: false,
        })
    }

    async fn execute_stage(
        &self,
        stage: &PlannedStage,
        dataset: Option<Dataset>,
    ) -> Result<Option<Dataset>> {
        match &stage.operation {
            StageOperation::Extract(params) => {
                extract::run(self.connector.as_ref(), params).await.map(Some)
            }
            StageOperation::Transform(params) => match dataset {
                Some(data) => Ok(Some(transform::apply(data, &params.transformations))),
                None => {
                    warn!("Stage '{}' has no dataset to transform", stage.name);
                    Ok(None)
                }
            },
            StageOperation::Output(params) => output::run(dataset, params).await,
            StageOperation::Clean(_) | StageOperation::Anonymize(_) | StageOperation::Merge(_) => {
                Ok(dataset)
            }
        }
    }
}
