//! Process domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::stage::{Stage, StageDescriptor};

/// One end-to-end run of a pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Process {
    pub id: Uuid,
    pub description_id: Uuid,
    pub status: ProcessStatus,
    pub stages: Vec<Stage>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Process {
    /// Creates an in-progress process and links the stages to it in order
    pub fn new(description_id: Uuid, stages: Vec<StageDescriptor>) -> Self {
        let id = Uuid::new_v4();
        let now = Utc::now();
        let stages = stages
            .into_iter()
            .enumerate()
            .map(|(position, descriptor)| Stage::link(id, position as u32, descriptor))
            .collect();

        Self {
            id,
            description_id,
            status: ProcessStatus::InProgress,
            stages,
            created_at: now,
            updated_at: now,
        }
    }

    /// Stage descriptors in declared order
    pub fn descriptors(&self) -> Vec<StageDescriptor> {
        self.stages.iter().map(|s| s.descriptor.clone()).collect()
    }
}

/// Process lifecycle status
///
/// `InProgress` is the only non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProcessStatus {
    InProgress,
    Completed,
    Terminated,
}

impl ProcessStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessStatus::InProgress => "IN_PROGRESS",
            ProcessStatus::Completed => "COMPLETED",
            ProcessStatus::Terminated => "TERMINATED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, ProcessStatus::InProgress)
    }
}

impl std::fmt::Display for ProcessStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored status string that names no known status
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown process status: {0}")]
pub struct ParseStatusError(pub String);

impl FromStr for ProcessStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "IN_PROGRESS" => Ok(ProcessStatus::InProgress),
            "COMPLETED" => Ok(ProcessStatus::Completed),
            "TERMINATED" => Ok(ProcessStatus::Terminated),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}
