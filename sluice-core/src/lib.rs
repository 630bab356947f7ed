//! Sluice Core
//!
//! Core types and abstractions for the Sluice ETL service.
//!
//! This crate contains:
//! - Domain types: Descriptions, processes, stages and the tabular dataset
//! - DTOs: Response shapes shared by the HTTP service and the CLI
//! - Codec: Conversion between stored pipeline descriptions and stage lists

pub mod codec;
pub mod domain;
pub mod dto;

pub use codec::CodecError;
