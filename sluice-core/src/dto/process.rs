//! Process DTOs

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::process::{Process, ProcessStatus};

/// Process summary for status lookups
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessSummary {
    pub id: Uuid,
    pub description_id: Uuid,
    pub status: ProcessStatus,
    pub stages: Vec<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<Process> for ProcessSummary {
    fn from(process: Process) -> Self {
        Self {
            id: process.id,
            description_id: process.description_id,
            status: process.status,
            stages: process
                .stages
                .into_iter()
                .map(|s| s.descriptor.name)
                .collect(),
            created_at: process.created_at,
            updated_at: process.updated_at,
        }
    }
}

/// Response to a pipeline submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunAccepted {
    pub process_id: Uuid,
    pub description_id: Uuid,
}

/// Response to a restart request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestartAccepted {
    pub process_id: Uuid,
}

/// What a termination request did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminateOutcome {
    /// The process was in progress and is now terminated
    Terminated,
    /// The process had already completed; nothing changed
    AlreadyCompleted,
    /// The process had already been terminated; nothing changed
    AlreadyTerminated,
}

/// Response to a termination request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerminateResponse {
    pub process_id: Uuid,
    pub outcome: TerminateOutcome,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::stage::StageDescriptor;

    #[test]
    fn test_process_summary_conversion() {
        let process = Process::new(
            Uuid::new_v4(),
            vec![StageDescriptor::new("extract"), StageDescriptor::new("output")],
        );

        let summary: ProcessSummary = process.clone().into();
        assert_eq!(summary.id, process.id);
        assert_eq!(summary.status, ProcessStatus::InProgress);
        assert_eq!(summary.stages, ["extract", "output"]);
    }

    #[test]
    fn test_terminate_outcome_serialization() {
        let json = serde_json::to_string(&TerminateOutcome::AlreadyCompleted).unwrap();
        assert_eq!(json, "\"already_completed\"");
    }
}
