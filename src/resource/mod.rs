//! Resource registration
//!
//! A [`Resource`] is one independently schedulable extraction unit: an
//! endpoint, the table its rows land in, and how they are paginated and
//! written. A [`Source`] is the explicit list of resources handed to the
//! pipeline.

mod types;

pub use types::{Resource, Source};
