//! DuckDB load engine

use super::LOADS_TABLE;
use crate::error::{Error, Result};
use crate::output::StagedTable;
use crate::types::WriteDisposition;
use duckdb::{params, Connection};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Quote an SQL identifier
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Quote an SQL string literal
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// DuckDB database holding one dataset
pub struct DuckDbDestination {
    conn: Connection,
    path: Option<PathBuf>,
    dataset: String,
}

/// One table's worth of staged files to load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadJob {
    /// Destination table
    pub table: String,
    /// Parquet files to read
    pub files: Vec<PathBuf>,
    /// How existing rows are treated
    pub disposition: WriteDisposition,
}

impl LoadJob {
    /// Build a job from a staged table
    pub fn new(staged: &StagedTable, disposition: WriteDisposition) -> Self {
        Self {
            table: staged.table.clone(),
            files: staged.files.clone(),
            disposition,
        }
    }
}

/// Loads tables over its own connection to the destination
///
/// Loaders are `Send`, so each can run on a blocking thread while other
/// tables load concurrently.
pub struct TableLoader {
    conn: Connection,
    dataset: String,
}

impl DuckDbDestination {
    /// Open (or create) a database file and prepare the dataset schema
    pub fn open(path: impl AsRef<Path>, dataset: impl Into<String>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path).map_err(|e| {
            Error::config(format!(
                "Failed to open DuckDB database {}: {e}",
                path.display()
            ))
        })?;

        Self::init(conn, Some(path.to_path_buf()), dataset.into())
    }

    /// Create an in-memory database
    pub fn in_memory(dataset: impl Into<String>) -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| Error::config(format!("Failed to create DuckDB connection: {e}")))?;

        Self::init(conn, None, dataset.into())
    }

    fn init(conn: Connection, path: Option<PathBuf>, dataset: String) -> Result<Self> {
        if dataset.is_empty() {
            return Err(Error::invalid_value("dataset_name", "must not be empty"));
        }

        let schema = quote_ident(&dataset);
        conn.execute_batch(&format!(
            "CREATE SCHEMA IF NOT EXISTS {schema};
             CREATE TABLE IF NOT EXISTS {schema}.{loads} (
                 load_id VARCHAR NOT NULL,
                 pipeline_name VARCHAR NOT NULL,
                 status INTEGER NOT NULL,
                 inserted_at TIMESTAMP DEFAULT current_timestamp
             );",
            loads = quote_ident(LOADS_TABLE),
        ))?;

        debug!(dataset = %dataset, "Prepared dataset schema");
        Ok(Self {
            conn,
            path,
            dataset,
        })
    }

    /// Database file, or `None` for an in-memory database
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Dataset (schema) name
    pub fn dataset(&self) -> &str {
        &self.dataset
    }

    /// Create a loader with its own connection to this database
    pub fn loader(&self) -> Result<TableLoader> {
        Ok(TableLoader {
            conn: self.conn.try_clone()?,
            dataset: self.dataset.clone(),
        })
    }

    /// Check whether a table exists in the dataset
    pub fn table_exists(&self, table: &str) -> Result<bool> {
        table_exists(&self.conn, &self.dataset, table)
    }

    /// Count the rows of a dataset table
    pub fn row_count(&self, table: &str) -> Result<u64> {
        row_count(&self.conn, &self.dataset, table)
    }

    /// Record a completed load
    pub fn record_load(&self, load_id: &str, pipeline_name: &str) -> Result<()> {
        let sql = format!(
            "INSERT INTO {}.{} (load_id, pipeline_name, status) VALUES (?, ?, 0)",
            quote_ident(&self.dataset),
            quote_ident(LOADS_TABLE)
        );
        self.conn.execute(&sql, params![load_id, pipeline_name])?;
        Ok(())
    }

    /// Load ids recorded so far, oldest first
    pub fn completed_loads(&self) -> Result<Vec<String>> {
        let sql = format!(
            "SELECT load_id FROM {}.{} ORDER BY inserted_at, load_id",
            quote_ident(&self.dataset),
            quote_ident(LOADS_TABLE)
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let loads = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(loads)
    }
}

impl std::fmt::Debug for DuckDbDestination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DuckDbDestination")
            .field("path", &self.path)
            .field("dataset", &self.dataset)
            .finish_non_exhaustive()
    }
}

impl TableLoader {
    /// Load one table and return its row count afterwards
    ///
    /// `Replace` swaps the table contents atomically; a replace without files
    /// empties an existing table and skips a missing one. `Append` creates the
    /// table on first use and inserts by column name.
    pub fn load(&mut self, job: &LoadJob) -> Result<u64> {
        let table = format!("{}.{}", quote_ident(&self.dataset), quote_ident(&job.table));

        if job.files.is_empty() {
            if job.disposition == WriteDisposition::Replace
                && table_exists(&self.conn, &self.dataset, &job.table)?
            {
                self.conn
                    .execute_batch(&format!("DELETE FROM {table};"))
                    .map_err(|e| Error::load(&job.table, e.to_string()))?;
                info!(table = %job.table, "Cleared table, no rows extracted");
            }
            return Ok(0);
        }

        let source = read_parquet(&job.files);
        let sql = match job.disposition {
            WriteDisposition::Replace => {
                format!("CREATE OR REPLACE TABLE {table} AS SELECT * FROM {source};")
            }
            WriteDisposition::Append => format!(
                "CREATE TABLE IF NOT EXISTS {table} AS SELECT * FROM {source} LIMIT 0;
                 INSERT INTO {table} BY NAME SELECT * FROM {source};"
            ),
        };

        debug!(table = %job.table, sql = %sql, "Loading table");

        let tx = self
            .conn
            .transaction()
            .map_err(|e| Error::load(&job.table, e.to_string()))?;
        tx.execute_batch(&sql)
            .map_err(|e| Error::load(&job.table, e.to_string()))?;
        tx.commit()
            .map_err(|e| Error::load(&job.table, e.to_string()))?;

        let rows = row_count(&self.conn, &self.dataset, &job.table)?;
        info!(
            table = %job.table,
            disposition = %job.disposition,
            files = job.files.len(),
            rows,
            "Loaded table"
        );
        Ok(rows)
    }
}

fn read_parquet(files: &[PathBuf]) -> String {
    let list: Vec<String> = files
        .iter()
        .map(|f| quote_literal(&f.to_string_lossy()))
        .collect();
    format!("read_parquet([{}], union_by_name = true)", list.join(", "))
}

fn table_exists(conn: &Connection, dataset: &str, table: &str) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT count(*) FROM information_schema.tables WHERE table_schema = ? AND table_name = ?",
        params![dataset, table],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

fn row_count(conn: &Connection, dataset: &str, table: &str) -> Result<u64> {
    let sql = format!(
        "SELECT count(*) FROM {}.{}",
        quote_ident(dataset),
        quote_ident(table)
    );
    let count: i64 = conn.query_row(&sql, [], |row| row.get(0))?;
    Ok(count as u64)
}
