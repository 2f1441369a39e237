//! Pagination types and traits
//!
//! Defines the core pagination abstractions used by all strategies.

use crate::types::Record;
use reqwest::header::HeaderMap;
use std::collections::HashMap;

/// One page of records, as returned by a single request
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// Position of this page in its pagination run, starting at 1
    pub number: u32,
    /// URL the page was fetched from, including query parameters
    pub url: String,
    /// Records in API order; never empty
    pub records: Vec<Record>,
}

impl Page {
    /// Number of records on the page
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the page holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Take ownership of the records
    pub fn into_records(self) -> Vec<Record> {
        self.records
    }
}

/// Result of the next page computation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextPage {
    /// More pages available with these parameters
    Continue {
        /// Query parameters for the next request
        query_params: HashMap<String, String>,
        /// Optional new URL (for link header pagination)
        url: Option<String>,
    },
    /// No more pages
    Done,
}

impl NextPage {
    /// Create a continuation with query parameters
    pub fn with_params(params: HashMap<String, String>) -> Self {
        Self::Continue {
            query_params: params,
            url: None,
        }
    }

    /// Create a continuation with a new URL
    pub fn with_url(url: impl Into<String>) -> Self {
        Self::Continue {
            query_params: HashMap::new(),
            url: Some(url.into()),
        }
    }

    /// Check if this is a done result
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Check if this is a continue result
    pub fn is_continue(&self) -> bool {
        matches!(self, Self::Continue { .. })
    }
}

/// Stop conditions for pagination
///
/// Conditions are independent; any one of them ending the run is enough.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StopCondition {
    /// Stop when page is empty (no records)
    #[default]
    EmptyPage,

    /// Stop when a page holds fewer records than the requested page size
    ShortPage,

    /// Stop when the `Link` header has no entry with this relation
    MissingLink {
        /// Relation to look for (usually "next")
        rel: String,
    },
}

impl StopCondition {
    /// Stop when the response carries no `rel="next"` link
    pub fn missing_next_link() -> Self {
        Self::MissingLink {
            rel: "next".to_string(),
        }
    }
}

/// Result of checking a stop condition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopResult {
    /// Continue pagination
    Continue,
    /// Stop pagination
    Stop,
}

impl StopResult {
    /// Check if we should stop
    pub fn should_stop(&self) -> bool {
        matches!(self, Self::Stop)
    }
}

/// Tracks pagination state during one run
///
/// Created fresh for every run and dropped when the run ends; nothing is
/// persisted between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaginationState {
    /// Current page number (for page-based pagination)
    pub page: u32,
    /// Current offset (for offset-based pagination)
    pub offset: u32,
    /// Total records fetched so far
    pub total_fetched: u64,
    /// Is pagination complete?
    pub done: bool,
}

impl PaginationState {
    /// Create a new pagination state
    pub fn new() -> Self {
        Self::default()
    }

    /// Create state with a starting page
    pub fn with_page(page: u32) -> Self {
        Self {
            page,
            ..Default::default()
        }
    }

    /// Mark pagination as complete
    pub fn mark_done(&mut self) {
        self.done = true;
    }

    /// Increment page number
    pub fn next_page(&mut self) {
        self.page += 1;
    }

    /// Add offset
    pub fn add_offset(&mut self, amount: u32) {
        self.offset += amount;
    }

    /// Add to total fetched
    pub fn add_fetched(&mut self, count: u64) {
        self.total_fetched += count;
    }
}

/// Core trait for pagination strategies
///
/// Strategies are stateless; all progress lives in [`PaginationState`], so
/// one strategy value can drive any number of concurrent runs.
pub trait Paginator: Send + Sync + std::fmt::Debug {
    /// State a new run starts from
    fn initial_state(&self) -> PaginationState {
        PaginationState::new()
    }

    /// Query parameters for the request at the given state
    fn request_params(&self, state: &PaginationState) -> HashMap<String, String>;

    /// Process a non-empty page and determine if there's a next one
    fn process_response(
        &self,
        headers: &HeaderMap,
        records_count: usize,
        state: &mut PaginationState,
    ) -> NextPage;
}

/// Check a stop condition against a response
pub fn check_stop_condition(
    condition: &StopCondition,
    headers: &HeaderMap,
    records_count: usize,
    page_size: Option<u32>,
) -> StopResult {
    let stop = match condition {
        StopCondition::EmptyPage => records_count == 0,
        StopCondition::ShortPage => page_size.is_some_and(|size| records_count < size as usize),
        StopCondition::MissingLink { rel } => find_link(headers, rel).is_none(),
    };

    if stop {
        StopResult::Stop
    } else {
        StopResult::Continue
    }
}

/// Find the URL for a link relation across all `Link` headers of a response
pub fn find_link(headers: &HeaderMap, rel: &str) -> Option<String> {
    headers
        .get_all(reqwest::header::LINK)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(|value| parse_link_header(value, rel))
}

/// Parse a `Link` header value and extract the URL for the given rel
///
/// Format: `<url>; rel="next", <url>; rel="prev"`. A `rel` may list several
/// space-separated relation types.
pub fn parse_link_header(header: &str, target_rel: &str) -> Option<String> {
    for part in header.split(',') {
        let mut url = None;
        let mut rels = None;

        for segment in part.split(';') {
            let segment = segment.trim();
            if segment.starts_with('<') && segment.ends_with('>') {
                url = Some(&segment[1..segment.len() - 1]);
            } else if let Some((key, value)) = segment.split_once('=') {
                if key.trim().eq_ignore_ascii_case("rel") {
                    rels = Some(value.trim().trim_matches('"').trim_matches('\''));
                }
            }
        }

        if let (Some(u), Some(r)) = (url, rels) {
            if r.split_whitespace()
                .any(|rel| rel.eq_ignore_ascii_case(target_rel))
            {
                return Some(u.to_string());
            }
        }
    }

    None
}
