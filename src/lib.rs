//! # jaffle-ingest
//!
//! Paginated extraction of a REST API into a local DuckDB dataset.
//!
//! ## Features
//!
//! - **Pagination**: page number, offset and `Link` header strategies with
//!   independent stop conditions (empty page, missing `rel="next"`)
//! - **HTTP**: retry with backoff for transient failures, optional rate limit
//! - **Normalization**: nested objects flattened into columns, Arrow schema
//!   inference, Parquet staging
//! - **Loading**: DuckDB tables with replace or append write dispositions
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use jaffle_ingest::{connectors::jaffle_shop_source, PipelineConfig, Pipeline, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = PipelineConfig::from_env()?;
//!     let source = jaffle_shop_source(config.page_size)?;
//!
//!     let info = Pipeline::new(config)?.run(&source).await?;
//!     println!("{info}");
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      Pipeline::run(source)                      │
//! │      extract (N resources) → normalize (N pages) → load (N)     │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────┬───────────┬───────┴───────┬───────────┬─────────────┐
//! │   HTTP   │ Paginate  │   Normalize   │  Output   │ Destination │
//! ├──────────┼───────────┼───────────────┼───────────┼─────────────┤
//! │ GET      │ Page No.  │ Flatten       │ Arrow     │ DuckDB      │
//! │ Retry    │ Offset    │ snake_case    │ Parquet   │ Replace     │
//! │ Backoff  │ Link      │ _load_id      │ Package   │ Append      │
//! │ RateLimit│ Stop conds│               │           │ _loads      │
//! └──────────┴───────────┴───────────────┴───────────┴─────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// HTTP client with retry and rate limiting
pub mod http;

/// Pagination strategies
pub mod pagination;

/// Response decoders
pub mod decode;

/// Resource registration
pub mod resource;

/// Built-in source definitions
pub mod connectors;

/// Record flattening and normalization
pub mod normalize;

/// Arrow/Parquet output and staging
pub mod output;

/// DuckDB destination
pub mod destination;

/// Pipeline configuration
pub mod config;

/// Pipeline runtime
pub mod pipeline;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::{PipelineConfig, WorkerConfig};
pub use error::{Error, Result};
pub use pipeline::{LoadInfo, Pipeline};
pub use resource::{Resource, Source};
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
