//! Normalization module
//!
//! Turns the raw records of a page into flat rows ready for columnar staging.
//!
//! # Overview
//!
//! - Nested objects become `parent__child` columns
//! - Arrays (and objects past the nesting limit) are stored as JSON text
//! - Column names are snake_case identifiers
//! - Every row carries the `_load_id` of the run that produced it

mod flatten;
mod normalizer;

pub use flatten::{flatten_record, normalize_identifier, PATH_SEPARATOR, VALUE_COLUMN};
pub use normalizer::{NormalizedPage, Normalizer, DEFAULT_MAX_DEPTH, LOAD_ID_COLUMN};

#[cfg(test)]
mod tests;
