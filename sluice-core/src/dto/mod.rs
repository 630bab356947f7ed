//! Data Transfer Objects
//!
//! Lightweight response shapes exchanged with the HTTP service's clients and
//! printed by the CLI.

pub mod process;
