//! Pipeline runtime
//!
//! Runs a [`Source`](crate::resource::Source) end to end.
//!
//! # Overview
//!
//! - **Extract**: up to `workers.extract` resources are paginated at once
//! - **Normalize**: pages are flattened on blocking threads, at most
//!   `workers.normalize` at a time, and staged as one Parquet file per table
//! - **Load**: up to `workers.load` tables are loaded into DuckDB at once,
//!   each over its own connection
//!
//! The first failure ends the run. Tables already loaded stay loaded.

mod runner;
mod types;

pub use runner::Pipeline;
pub use types::{new_load_id, LoadInfo, TableMetrics};
