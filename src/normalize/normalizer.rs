//! Page normalizer

use super::flatten::{flatten_record, unique_column};
use crate::error::Result;
use crate::output::{infer_schema, json_to_arrow};
use crate::types::{JsonValue, Record};
use arrow::datatypes::Schema;
use arrow::record_batch::RecordBatch;

/// Column stamped with the load id on every row
pub const LOAD_ID_COLUMN: &str = "_load_id";

/// Default nesting depth flattened into columns
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Normalizes pages for one load
#[derive(Debug, Clone)]
pub struct Normalizer {
    load_id: String,
    max_depth: usize,
}

/// Flat rows of one page together with their inferred schema
#[derive(Debug, Clone)]
pub struct NormalizedPage {
    /// Flattened rows, each a JSON object
    pub rows: Vec<JsonValue>,
    /// Schema inferred from `rows`
    pub schema: Schema,
}

impl NormalizedPage {
    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the page has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Build a RecordBatch conforming to `schema`
    ///
    /// `schema` must be a superset of this page's own schema, as produced by
    /// merging the schemas of every page of a table.
    pub fn to_batch(&self, schema: &Schema) -> Result<RecordBatch> {
        json_to_arrow(&self.rows, Some(schema))
    }
}

impl Normalizer {
    /// Create a normalizer stamping rows with `load_id`
    pub fn new(load_id: impl Into<String>) -> Self {
        Self {
            load_id: load_id.into(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Set how many object levels are expanded into columns
    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth.max(1);
        self
    }

    /// Load id stamped on every row
    pub fn load_id(&self) -> &str {
        &self.load_id
    }

    /// Normalize the records of one page
    ///
    /// A source field that already uses the load id column is kept under a
    /// suffixed name.
    pub fn normalize(&self, records: &[Record]) -> Result<NormalizedPage> {
        let rows: Vec<JsonValue> = records
            .iter()
            .map(|record| {
                let mut row = flatten_record(record, self.max_depth);
                if let Some(existing) = row.remove(LOAD_ID_COLUMN) {
                    let column = unique_column(&row, LOAD_ID_COLUMN.to_string());
                    row.insert(column, existing);
                }
                row.insert(
                    LOAD_ID_COLUMN.to_string(),
                    JsonValue::String(self.load_id.clone()),
                );
                JsonValue::Object(row)
            })
            .collect();

        let schema = infer_schema(&rows)?;
        Ok(NormalizedPage { rows, schema })
    }
}
