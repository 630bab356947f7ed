//! In-memory store used by the CLI and tests

use async_trait::async_trait;
use chrono::Utc;
use sluice_core::domain::description::Description;
use sluice_core::domain::process::{Process, ProcessStatus};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{ProcessStore, StoreError};

#[derive(Default)]
pub struct MemoryStore {
    descriptions: RwLock<HashMap<Uuid, Description>>,
    processes: RwLock<HashMap<Uuid, Process>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All processes created against a description, oldest first
    pub async fn processes_for(&self, description_id: Uuid) -> Vec<Process> {
        let mut found: Vec<Process> = self
            .processes
            .read()
            .await
            .values()
            .filter(|p| p.description_id == description_id)
            .cloned()
            .collect();
        found.sort_by_key(|p| p.created_at);
        found
    }
}

#[async_trait]
impl ProcessStore for MemoryStore {
    async fn save_description(&self, description: &Description) -> Result<(), StoreError> {
        let mut descriptions = self.descriptions.write().await;
        if descriptions.contains_key(&description.id) {
            return Err(StoreError::Duplicate(description.id));
        }
        descriptions.insert(description.id, description.clone());
        Ok(())
    }

    async fn find_description(&self, id: Uuid) -> Result<Option<Description>, StoreError> {
        Ok(self.descriptions.read().await.get(&id).cloned())
    }

    async fn create_process(&self, process: &Process) -> Result<(), StoreError> {
        let mut processes = self.processes.write().await;
        if processes.contains_key(&process.id) {
            return Err(StoreError::Duplicate(process.id));
        }
        processes.insert(process.id, process.clone());
        Ok(())
    }

    async fn find_process(&self, id: Uuid) -> Result<Option<Process>, StoreError> {
        Ok(self.processes.read().await.get(&id).cloned())
    }

    async fn transition(
        &self,
        id: Uuid,
        from: ProcessStatus,
        to: ProcessStatus,
    ) -> Result<bool, StoreError> {
        let mut processes = self.processes.write().await;
        match processes.get_mut(&id) {
            Some(process) if process.status == from => {
                process.status = to;
                process.updated_at = Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
