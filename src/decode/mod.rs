//! Response decoder module
//!
//! Turns an HTTP response body into the records of one page.
//!
//! # Overview
//!
//! The upstream API answers each page request with a JSON array. A decoder
//! may also be pointed at a nested array (e.g. `data.items`) for APIs that
//! wrap their records in an envelope.

mod decoders;

pub use decoders::{JsonDecoder, RecordDecoder};
