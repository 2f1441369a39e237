//! CLI runner - executes the pipeline

use crate::cli::commands::Cli;
use crate::config::PipelineConfig;
use crate::connectors::jaffle_shop_source;
use crate::error::{Result, ResultExt};
use crate::pipeline::{LoadInfo, Pipeline};
use tracing::debug;

/// CLI runner
#[derive(Debug)]
pub struct Runner {
    _cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { _cli: cli }
    }

    /// Resolve the config from the environment, run the pipeline and print
    /// the load summary
    pub async fn run(&self) -> Result<()> {
        let config = PipelineConfig::from_env().context("Failed to resolve pipeline config")?;
        let info = Self::run_with_config(config).await?;
        println!("{info}");
        Ok(())
    }

    /// Run the Jaffle Shop pipeline with an explicit config
    pub async fn run_with_config(config: PipelineConfig) -> Result<LoadInfo> {
        debug!(?config, "Resolved pipeline config");
        let source = jaffle_shop_source(config.page_size)?;
        let pipeline = Pipeline::new(config)?;
        pipeline.run(&source).await
    }
}
