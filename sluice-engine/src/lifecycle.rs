//! Process lifecycle
//!
//! Owns the status state machine for every run:
//!
//! ```text
//! IN_PROGRESS ──▶ COMPLETED
//!      │
//!      └────────▶ TERMINATED
//! ```
//!
//! Both end states are terminal. Every status write is a compare-and-set on
//! the store, so whichever of completion and termination lands first wins.
//! A failed run is moved to TERMINATED; no run stays IN_PROGRESS once the
//! manager has returned.

use sluice_core::codec;
use sluice_core::domain::description::Description;
use sluice_core::domain::process::{Process, ProcessStatus};
use sluice_core::domain::stage::StageDescriptor;
use sluice_core::dto::process::TerminateOutcome;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::error::{EngineError, Result};
use crate::runner::PipelineRunner;
use crate::store::ProcessStore;

type ActiveRuns = Mutex<HashMap<Uuid, CancellationToken>>;

pub struct ProcessManager {
    store: Arc<dyn ProcessStore>,
    runner: PipelineRunner,
    active: Arc<ActiveRuns>,
}

impl ProcessManager {
    pub fn new(store: Arc<dyn ProcessStore>, runner: PipelineRunner) -> Self {
        Self {
            store,
            runner,
            active: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Persist a submission and run it to the end
    ///
    /// Returns the new process id once the run has finished or stopped
    /// because it was terminated.
    pub async fn start(
        &self,
        description: Description,
        stages: Vec<StageDescriptor>,
    ) -> Result<Uuid> {
        self.store.save_description(&description).await?;
        info!("Description stored: {}", description.id);

        self.execute(Process::new(description.id, stages)).await
    }

    /// Stop an in-progress run before its next stage
    pub async fn terminate(&self, process_id: Uuid) -> Result<TerminateOutcome> {
        let process = self.status(process_id).await?;

        match process.status {
            ProcessStatus::Completed => {
                info!("Process {} already completed, nothing to terminate", process_id);
                Ok(TerminateOutcome::AlreadyCompleted)
            }
            ProcessStatus::Terminated => {
                info!("Process {} already terminated", process_id);
                Ok(TerminateOutcome::AlreadyTerminated)
            }
            ProcessStatus::InProgress => {
                // Cancelled before the write so the run cannot start another
                // stage once TERMINATED is visible. If completion wins the
                // write below, the run had no stage left to skip.
                self.cancel(process_id);

                let moved = self
                    .store
                    .transition(process_id, ProcessStatus::InProgress, ProcessStatus::Terminated)
                    .await?;

                if moved {
                    info!("Process {} terminated", process_id);
                    return Ok(TerminateOutcome::Terminated);
                }

                // Lost the race with the run's own status write
                let current = self.status(process_id).await?;
                Ok(match current.status {
                    ProcessStatus::Completed => TerminateOutcome::AlreadyCompleted,
                    _ => TerminateOutcome::AlreadyTerminated,
                })
            }
        }
    }

    /// Rebuild a pipeline from its stored description and run it again
    ///
    /// An old process still in progress is terminated first. Returns the id
    /// of the new process.
    pub async fn restart(&self, description_id: Uuid, process_id: Uuid) -> Result<Uuid> {
        let process = self.status(process_id).await?;

        if !process.status.is_terminal() {
            let outcome = self.terminate(process_id).await?;
            info!("Process {} superseded by restart ({:?})", process_id, outcome);
        }

        let description = self
            .store
            .find_description(description_id)
            .await?
            .ok_or(EngineError::DescriptionNotFound(description_id))?;

        let stages = codec::decode(&description.text)?;
        if stages.is_empty() {
            return Err(EngineError::EmptyPipeline(description_id));
        }

        info!(
            "Restarting description {} with {} stage(s)",
            description_id,
            stages.len()
        );

        self.execute(Process::new(description_id, stages)).await
    }

    pub async fn status(&self, process_id: Uuid) -> Result<Process> {
        self.store
            .find_process(process_id)
            .await?
            .ok_or(EngineError::ProcessNotFound(process_id))
    }

    #[cfg(test)]
    fn is_running(&self, process_id: Uuid) -> bool {
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&process_id)
    }

    async fn execute(&self, process: Process) -> Result<Uuid> {
        let process_id = process.id;
        let stages = process.descriptors();

        // Registered before the process is visible so a terminate that reads
        // it always finds a token to cancel.
        let guard = ActiveRun::register(self.active.clone(), process_id);
        self.store.create_process(&process).await?;
        info!(
            "Process {} started with {} stage(s)",
            process_id,
            stages.len()
        );

        let result = self.runner.run(&stages, guard.token()).await;
        drop(guard);

        match result {
            Ok(outcome) if outcome.cancelled => {
                info!(
                    "Process {} stopped after {} stage(s)",
                    process_id, outcome.stages_run
                );
                // Covers a terminate whose status write failed after cancelling
                self.store
                    .transition(process_id, ProcessStatus::InProgress, ProcessStatus::Terminated)
                    .await?;
                Ok(process_id)
            }
            Ok(_) => {
                let moved = self
                    .store
                    .transition(process_id, ProcessStatus::InProgress, ProcessStatus::Completed)
                    .await?;
                if moved {
                    info!("Process {} completed", process_id);
                } else {
                    info!("Process {} was terminated before completion", process_id);
                }
                Ok(process_id)
            }
            Err(e) => {
                error!("Process {} failed: {}", process_id, e);
                if let Err(store_err) = self
                    .store
                    .transition(process_id, ProcessStatus::InProgress, ProcessStatus::Terminated)
                    .await
                {
                    error!(
                        "Failed to mark process {} as terminated: {}",
                        process_id, store_err
                    );
                }
                Err(e)
            }
        }
    }

    fn cancel(&self, process_id: Uuid) {
        let active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
        match active.get(&process_id) {
            Some(token) => token.cancel(),
            None => warn!("No active run for process {}", process_id),
        }
    }
}

/// Keeps a run's token registered for as long as the run is executing
struct ActiveRun {
    active: Arc<ActiveRuns>,
    process_id: Uuid,
    token: CancellationToken,
}

impl ActiveRun {
    fn register(active: Arc<ActiveRuns>, process_id: Uuid) -> Self {
        let token = CancellationToken::new();
        active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(process_id, token.clone());

        Self {
            active,
            process_id,
            token,
        }
    }

    fn token(&self) -> &CancellationToken {
        &self.token
    }
}

impl Drop for ActiveRun {
    fn drop(&mut self) {
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.process_id);
    }
}
