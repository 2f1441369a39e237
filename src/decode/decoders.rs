//! Decoder implementations

use crate::error::{Error, Result};
use crate::types::Record;
use serde_json::Value;

/// Extracts the records of one page from a response body
pub trait RecordDecoder: Send + Sync + std::fmt::Debug {
    /// Decode a response body into records
    ///
    /// An empty result means the API has no more data.
    fn decode(&self, body: &str) -> Result<Vec<Record>>;
}

// ============================================================================
// JSON Decoder
// ============================================================================

/// JSON decoder with optional record path extraction
#[derive(Debug, Clone, Default)]
pub struct JsonDecoder {
    /// Dot-separated path to the records array
    record_path: Option<String>,
}

impl JsonDecoder {
    /// Create a decoder that treats the whole body as the page
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a JSON decoder with a record path
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            record_path: Some(path.into()),
        }
    }

    fn extract_records(&self, value: Value) -> Result<Vec<Record>> {
        let target = match &self.record_path {
            Some(path) => match extract_simple_path(&value, path) {
                Some(v) => v.clone(),
                None => return Ok(vec![]),
            },
            None => value,
        };

        Ok(match target {
            Value::Array(arr) => arr,
            Value::Null => vec![],
            Value::Object(ref obj) if obj.is_empty() => vec![],
            other => vec![other],
        })
    }
}

impl RecordDecoder for JsonDecoder {
    fn decode(&self, body: &str) -> Result<Vec<Record>> {
        let value: Value = serde_json::from_str(body)
            .map_err(|e| Error::decode(format!("Failed to parse JSON: {e}")))?;
        self.extract_records(value)
    }
}

/// Walk a dot-separated path (optionally prefixed with `$.`) through objects
fn extract_simple_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let path = path.strip_prefix("$.").unwrap_or(path);
    if path.is_empty() || path == "$" {
        return Some(value);
    }

    path.split('.').try_fold(value, |current, part| match current {
        Value::Object(map) => map.get(part),
        _ => None,
    })
}
