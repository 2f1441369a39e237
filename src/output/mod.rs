//! Output module
//!
//! Handles Arrow RecordBatch creation and Parquet file writing.
//!
//! # Overview
//!
//! This module provides utilities for:
//! - Inferring Arrow schemas from flat JSON records
//! - Converting JSON to Arrow RecordBatches
//! - Writing Parquet files that the destination loads from
//! - Laying those files out as a per-load staging package

mod schema;
mod staging;
mod writer;

pub use schema::{infer_schema, json_to_arrow, merge_schemas, resolve_null_types};
pub use staging::{LoadPackage, StagedTable};
pub use writer::{write_batches_to_parquet, ParquetWriter, ParquetWriterConfig};
