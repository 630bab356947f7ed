//! Sluice CLI
//!
//! Runs and checks pipeline request files locally, without the service.

mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "sluice")]
#[command(about = "Sluice ETL pipeline CLI", long_about = None)]
struct Cli {
    /// Log filter, in RUST_LOG syntax
    #[arg(long, env = "RUST_LOG", default_value = "sluice_engine=info")]
    log: String,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&cli.log))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    handle_command(cli.command).await
}
