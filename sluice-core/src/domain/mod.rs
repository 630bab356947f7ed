//! Core domain types
//!
//! These types represent the fundamental ETL entities and are shared between
//! the engine (execution), the service (persistence, HTTP) and the CLI.

pub mod dataset;
pub mod description;
pub mod process;
pub mod stage;
