//! Load package staging
//!
//! A load package is a directory of Parquet files, one subdirectory per
//! table, written by normalization and consumed by the destination:
//!
//! ```text
//! <root>/load/<load_id>/<table>/part-00000.parquet
//! ```

use super::schema::{merge_schemas, resolve_null_types};
use super::writer::{ParquetWriter, ParquetWriterConfig};
use crate::error::{Error, Result};
use crate::normalize::NormalizedPage;
use arrow::datatypes::Schema;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Parquet files staged for one table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedTable {
    /// Destination table name
    pub table: String,
    /// Staged files; empty when the resource produced no rows
    pub files: Vec<PathBuf>,
    /// Rows written across all files
    pub rows: usize,
}

/// Staging directory for one load
#[derive(Debug, Clone)]
pub struct LoadPackage {
    load_id: String,
    dir: PathBuf,
    config: ParquetWriterConfig,
}

impl LoadPackage {
    /// Create the package directory `<root>/load/<load_id>`
    pub fn create(root: impl AsRef<Path>, load_id: impl Into<String>) -> Result<Self> {
        let load_id = load_id.into();
        let dir = root.as_ref().join("load").join(&load_id);
        std::fs::create_dir_all(&dir).map_err(|e| {
            Error::output(format!(
                "Failed to create load package {}: {e}",
                dir.display()
            ))
        })?;

        debug!(path = %dir.display(), "Created load package");
        Ok(Self {
            load_id,
            dir,
            config: ParquetWriterConfig::default(),
        })
    }

    /// Use a specific Parquet writer configuration
    #[must_use]
    pub fn with_writer_config(mut self, config: ParquetWriterConfig) -> Self {
        self.config = config;
        self
    }

    /// Load id of this package
    pub fn load_id(&self) -> &str {
        &self.load_id
    }

    /// Package directory
    pub fn path(&self) -> &Path {
        &self.dir
    }

    /// Write all pages of a table into one Parquet file
    ///
    /// The file schema is the merge of every page's schema, so columns that
    /// appear on later pages are null for earlier rows. A column typed on any
    /// page keeps that type; only columns null on every page become text.
    pub fn write_table(&self, table: &str, pages: &[NormalizedPage]) -> Result<StagedTable> {
        let rows: usize = pages.iter().map(NormalizedPage::len).sum();
        if rows == 0 {
            return Ok(StagedTable {
                table: table.to_string(),
                files: Vec::new(),
                rows: 0,
            });
        }

        let merged = pages
            .iter()
            .fold(Schema::empty(), |acc, page| merge_schemas(&acc, &page.schema));
        let schema = resolve_null_types(&merged);

        let table_dir = self.dir.join(table);
        std::fs::create_dir_all(&table_dir)?;
        let path = table_dir.join("part-00000.parquet");

        let mut writer = ParquetWriter::new(&path, &schema, &self.config)?;
        for page in pages.iter().filter(|p| !p.is_empty()) {
            writer.write(&page.to_batch(&schema)?)?;
        }
        let written = writer.close()?;

        debug!(table, rows = written, path = %path.display(), "Staged table");
        Ok(StagedTable {
            table: table.to_string(),
            files: vec![path],
            rows: written,
        })
    }

    /// Delete the package directory and everything in it
    pub fn remove(self) -> Result<()> {
        std::fs::remove_dir_all(&self.dir).map_err(|e| {
            Error::output(format!(
                "Failed to remove load package {}: {e}",
                self.dir.display()
            ))
        })
    }
}
