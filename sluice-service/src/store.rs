//! Postgres-backed process store

use async_trait::async_trait;
use sluice_core::domain::description::Description;
use sluice_core::domain::process::{Process, ProcessStatus};
use sluice_engine::{ProcessStore, StoreError};
use sqlx::PgPool;
use uuid::Uuid;

use crate::repository::{description_repository, process_repository};

pub struct PgProcessStore {
    pool: PgPool,
}

impl PgProcessStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProcessStore for PgProcessStore {
    async fn save_description(&self, description: &Description) -> Result<(), StoreError> {
        description_repository::insert(&self.pool, description).await?;
        Ok(())
    }

    async fn find_description(&self, id: Uuid) -> Result<Option<Description>, StoreError> {
        Ok(description_repository::find_by_id(&self.pool, id).await?)
    }

    async fn create_process(&self, process: &Process) -> Result<(), StoreError> {
        process_repository::create(&self.pool, process).await?;
        Ok(())
    }

    async fn find_process(&self, id: Uuid) -> Result<Option<Process>, StoreError> {
        process_repository::find_by_id(&self.pool, id)
            .await?
            .map(|record| Process::try_from(record).map_err(StoreError::Corrupt))
            .transpose()
    }

    async fn transition(
        &self,
        id: Uuid,
        from: ProcessStatus,
        to: ProcessStatus,
    ) -> Result<bool, StoreError> {
        Ok(process_repository::transition(&self.pool, id, from, to).await?)
    }
}
