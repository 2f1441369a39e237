//! jaffle-ingest CLI
//!
//! Loads the Jaffle Shop API into a local DuckDB database.

use anyhow::Context;
use clap::Parser;
use jaffle_ingest::cli::{Cli, Runner};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let runner = Runner::new(cli);

    runner
        .run()
        .await
        .context("jaffle_shop pipeline failed")
}
