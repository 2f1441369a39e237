//! Pipeline types
//!
//! Load summary returned by a pipeline run.

use crate::types::WriteDisposition;
use chrono::{DateTime, Utc};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Create a load id from the current time
///
/// Load ids are `<unix seconds>.<microseconds>`, so they sort in creation
/// order.
pub fn new_load_id() -> String {
    load_id_at(Utc::now())
}

pub(crate) fn load_id_at(at: DateTime<Utc>) -> String {
    format!("{}.{:06}", at.timestamp(), at.timestamp_subsec_micros())
}

/// Per-table outcome of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableMetrics {
    /// Resource the rows came from
    pub resource: String,
    /// Destination table
    pub table: String,
    /// Write disposition applied
    pub write_disposition: WriteDisposition,
    /// Pages extracted
    pub pages: usize,
    /// Rows extracted and staged
    pub rows: usize,
    /// Staged files loaded
    pub files: usize,
    /// Rows in the table after loading
    pub table_rows: u64,
}

/// Summary of a completed run
#[derive(Debug, Clone)]
pub struct LoadInfo {
    /// Pipeline name
    pub pipeline_name: String,
    /// DuckDB database file
    pub destination_path: PathBuf,
    /// Dataset (schema) the tables were loaded into
    pub dataset_name: String,
    /// Load id stamped on every row of this run
    pub load_id: String,
    /// Per-table metrics in source order
    pub tables: Vec<TableMetrics>,
    /// Wall-clock duration of the run
    pub elapsed: Duration,
}

impl LoadInfo {
    /// Metrics for one table
    pub fn table(&self, name: &str) -> Option<&TableMetrics> {
        self.tables.iter().find(|t| t.table == name)
    }

    /// Rows extracted across all tables
    pub fn total_rows(&self) -> usize {
        self.tables.iter().map(|t| t.rows).sum()
    }

    /// Pages extracted across all tables
    pub fn total_pages(&self) -> usize {
        self.tables.iter().map(|t| t.pages).sum()
    }
}

impl fmt::Display for LoadInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Pipeline {} load step completed in {:.2}s",
            self.pipeline_name,
            self.elapsed.as_secs_f64()
        )?;
        writeln!(
            f,
            "1 load package(s) were loaded to destination duckdb and into dataset {}",
            self.dataset_name
        )?;
        writeln!(
            f,
            "The duckdb destination used {} location to store data",
            self.destination_path.display()
        )?;
        write!(
            f,
            "Load package {} is LOADED and contains no failed jobs",
            self.load_id
        )?;
        for t in &self.tables {
            write!(
                f,
                "\n  {}: {} rows in {} pages ({}), table now has {} rows",
                t.table, t.rows, t.pages, t.write_disposition, t.table_rows
            )?;
        }
        Ok(())
    }
}
