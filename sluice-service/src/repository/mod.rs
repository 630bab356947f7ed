//! Repository Module
//!
//! Data access layer for the service.
//! Each repository handles database operations for a specific domain entity.

pub mod description;
pub mod process;

pub use description as description_repository;
pub use process as process_repository;
