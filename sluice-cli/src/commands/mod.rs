//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod run;
mod validate;

use anyhow::{Context, Result};
use clap::Subcommand;
use std::path::{Path, PathBuf};

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Run a pipeline request file to completion with an in-memory store
    Run {
        /// Path to the request JSON file
        file: PathBuf,
    },
    /// Check a pipeline request file and list its stages
    Validate {
        /// Path to the request JSON file
        file: PathBuf,
    },
}

/// Handle a CLI command
pub async fn handle_command(command: Commands) -> Result<()> {
    match command {
        Commands::Run { file } => run::run_request(&read_request(&file)?).await,
        Commands::Validate { file } => validate::validate_request(&read_request(&file)?),
    }
}

fn read_request(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read request file: {}", path.display()))
}
