//! Sluice Engine
//!
//! Pipeline execution engine and process lifecycle management.
//!
//! Architecture:
//! - Registry: Resolves stage names to handler kinds and typed parameters
//! - Runner: Executes a stage list in order, threading the dataset forward
//! - Handlers: Extract, transform and output behavior
//! - Sources: Connections to the databases extract stages read from
//! - Store: Persistence seam for descriptions and processes
//! - Lifecycle: Start, terminate and restart with the process state machine

pub mod error;
pub mod handlers;
pub mod lifecycle;
pub mod params;
pub mod registry;
pub mod runner;
pub mod source;
pub mod store;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::{EngineError, Result};
pub use lifecycle::ProcessManager;
pub use registry::{StageKind, StageOperation};
pub use runner::{PipelineRunner, RunOutcome};
pub use source::{PgSourceConnector, SourceConnector, SourceError};
pub use store::{MemoryStore, ProcessStore, StoreError};
pub use tokio_util::sync::CancellationToken;
