//! DuckDB destination
//!
//! Loads staged Parquet files into tables of a DuckDB database file. Tables
//! live in a schema named after the dataset, next to a `_loads` table that
//! records every completed load.

mod engine;

pub use engine::{quote_ident, quote_literal, DuckDbDestination, LoadJob, TableLoader};

/// Table recording completed loads
pub const LOADS_TABLE: &str = "_loads";
