//! Fakes shared by the engine's unit tests

use async_trait::async_trait;
use serde_json::Value;
use sluice_core::domain::dataset::Record;
use sluice_core::domain::description::Description;
use sluice_core::domain::process::{Process, ProcessStatus};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Notify;
use uuid::Uuid;

use crate::params::DatabaseSource;
use crate::source::{SourceConnector, SourceError};
use crate::store::{MemoryStore, ProcessStore, StoreError};

pub fn record(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {}", other),
    }
}

pub fn sample_source() -> DatabaseSource {
    DatabaseSource {
        db_url: "postgres://localhost/crm".to_string(),
        username: "etl".to_string(),
        password: "secret".to_string(),
        query: "SELECT name FROM customers".to_string(),
    }
}

/// Returns fixed rows, or a fixed failure
pub struct StaticSource {
    rows: Result<Vec<Record>, String>,
    calls: AtomicUsize,
}

impl StaticSource {
    pub fn new(rows: Vec<Record>) -> Self {
        Self {
            rows: Ok(rows),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            rows: Err(message.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SourceConnector for StaticSource {
    async fn fetch(&self, _source: &DatabaseSource) -> Result<Vec<Record>, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.rows.clone().map_err(SourceError::Unavailable)
    }
}

/// Blocks inside `fetch` until released, so tests can act mid-stage
pub struct GatedSource {
    rows: Vec<Record>,
    pub entered: Arc<Notify>,
    pub release: Arc<Notify>,
}

impl GatedSource {
    pub fn new(rows: Vec<Record>) -> Self {
        Self {
            rows,
            entered: Arc::new(Notify::new()),
            release: Arc::new(Notify::new()),
        }
    }
}

#[async_trait]
impl SourceConnector for GatedSource {
    async fn fetch(&self, _source: &DatabaseSource) -> Result<Vec<Record>, SourceError> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok(self.rows.clone())
    }
}

/// Commits status writes immediately but returns from them late
pub struct LaggingStore {
    inner: Arc<MemoryStore>,
    lag: Duration,
    pub committed: Arc<Notify>,
}

impl LaggingStore {
    pub fn new(inner: Arc<MemoryStore>, lag: Duration) -> Self {
        Self {
            inner,
            lag,
            committed: Arc::new(Notify::new()),
        }
    }
}

#[async_trait]
impl ProcessStore for LaggingStore {
    async fn save_description(&self, description: &Description) -> Result<(), StoreError> {
        self.inner.save_description(description).await
    }

    async fn find_description(&self, id: Uuid) -> Result<Option<Description>, StoreError> {
        self.inner.find_description(id).await
    }

    async fn create_process(&self, process: &Process) -> Result<(), StoreError> {
        self.inner.create_process(process).await
    }

    async fn find_process(&self, id: Uuid) -> Result<Option<Process>, StoreError> {
        self.inner.find_process(id).await
    }

    async fn transition(
        &self,
        id: Uuid,
        from: ProcessStatus,
        to: ProcessStatus,
    ) -> Result<bool, StoreError> {
        let moved = self.inner.transition(id, from, to).await?;
        self.committed.notify_one();
        tokio::time::sleep(self.lag).await;
        Ok(moved)
    }
}
