//! Pagination module
//!
//! Supports: Page Number, Offset, Link Header
//!
//! # Overview
//!
//! A [`Paginator`] decides, from each page's record count and response
//! headers, whether another page exists and how to request it. [`paginate`]
//! drives a paginator against the HTTP client and yields pages lazily.
//!
//! Termination signals are independent: an empty page always ends a run (and
//! is never yielded), while strategies may add their own conditions such as
//! a missing `rel="next"` link.

mod strategies;
mod stream;
mod types;

pub use strategies::{LinkHeaderPaginator, OffsetPaginator, PageNumberPaginator};
pub use stream::paginate;
pub use types::{
    check_stop_condition, find_link, parse_link_header, NextPage, Page, PaginationState,
    Paginator, StopCondition, StopResult,
};

#[cfg(test)]
mod tests;
