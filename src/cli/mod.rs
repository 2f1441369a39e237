//! CLI module
//!
//! Command-line entry point. The binary takes no options besides `--help`
//! and `--version`; everything else comes from the environment (see
//! [`PipelineConfig`](crate::config::PipelineConfig)).

mod commands;
mod runner;

pub use commands::Cli;
pub use runner::Runner;
