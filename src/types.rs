//! Common types used throughout the pipeline
//!
//! This module contains shared type definitions, type aliases,
//! and small enums used across multiple modules.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// A single record as returned by the API
pub type Record = JsonValue;

// ============================================================================
// Write Disposition
// ============================================================================

/// How a resource's rows are written to its destination table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteDisposition {
    /// Drop and recreate the table with this run's rows
    #[default]
    Replace,
    /// Add this run's rows to the existing table
    Append,
}

impl WriteDisposition {
    /// Name as used in config files and the load summary
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Replace => "replace",
            Self::Append => "append",
        }
    }
}

impl fmt::Display for WriteDisposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Backoff Type
// ============================================================================

/// Type of backoff for retries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffType {
    /// Constant delay between retries
    Constant,
    /// Linear increase in delay
    Linear,
    /// Exponential increase in delay
    #[default]
    Exponential,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_disposition_serde() {
        let mode: WriteDisposition = serde_json::from_str("\"append\"").unwrap();
        assert_eq!(mode, WriteDisposition::Append);

        let json = serde_json::to_string(&WriteDisposition::Replace).unwrap();
        assert_eq!(json, "\"replace\"");
    }

    #[test]
    fn test_write_disposition_default_is_replace() {
        assert_eq!(WriteDisposition::default(), WriteDisposition::Replace);
        assert_eq!(WriteDisposition::Replace.to_string(), "replace");
    }

    #[test]
    fn test_backoff_type_serde() {
        let backoff: BackoffType = serde_yaml::from_str("linear").unwrap();
        assert_eq!(backoff, BackoffType::Linear);
        assert_eq!(BackoffType::default(), BackoffType::Exponential);
    }
}
