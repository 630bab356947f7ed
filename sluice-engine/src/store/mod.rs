//! Persistence seam for descriptions and processes
//!
//! The lifecycle manager only talks to storage through [`ProcessStore`].
//! Status changes go through [`ProcessStore::transition`], a compare-and-set,
//! so a completion can never overwrite a concurrent termination.

pub mod memory;

use async_trait::async_trait;
use sluice_core::domain::description::Description;
use sluice_core::domain::process::{Process, ProcessStatus};
use thiserror::Error;
use uuid::Uuid;

pub use memory::MemoryStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("corrupt stored data: {0}")]
    Corrupt(String),

    #[error("{0} already exists")]
    Duplicate(Uuid),
}

#[async_trait]
pub trait ProcessStore: Send + Sync {
    async fn save_description(&self, description: &Description) -> Result<(), StoreError>;

    async fn find_description(&self, id: Uuid) -> Result<Option<Description>, StoreError>;

    /// Persist a new process together with its linked stages
    async fn create_process(&self, process: &Process) -> Result<(), StoreError>;

    async fn find_process(&self, id: Uuid) -> Result<Option<Process>, StoreError>;

    /// Move `id` from `from` to `to` if it is currently in `from`
    ///
    /// Returns `false` when the process is missing or in another state.
    async fn transition(
        &self,
        id: Uuid,
        from: ProcessStatus,
        to: ProcessStatus,
    ) -> Result<bool, StoreError>;
}
