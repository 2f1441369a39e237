//! Pagination strategy implementations
//!
//! Each strategy handles a specific pagination pattern.

use super::types::{
    check_stop_condition, find_link, NextPage, PaginationState, Paginator, StopCondition,
};
use reqwest::header::HeaderMap;
use std::collections::HashMap;

/// True when any of the conditions says to stop
fn any_stop(
    conditions: &[StopCondition],
    headers: &HeaderMap,
    records_count: usize,
    page_size: Option<u32>,
) -> bool {
    conditions
        .iter()
        .any(|c| check_stop_condition(c, headers, records_count, page_size).should_stop())
}

// ============================================================================
// Page Number Pagination
// ============================================================================

/// Page number pagination (e.g., traditional web pagination)
///
/// Uses page number parameter to paginate.
/// Common patterns:
/// - `?page=2`
/// - `?page=2&page_size=50`
#[derive(Debug, Clone)]
pub struct PageNumberPaginator {
    /// Query parameter name for page number
    pub page_param: String,
    /// First page number (usually 0 or 1)
    pub start_page: u32,
    /// Optional page size parameter name
    pub page_size_param: Option<String>,
    /// Page size value
    pub page_size: Option<u32>,
    /// Stop conditions, any of which ends the run
    pub stop_conditions: Vec<StopCondition>,
}

impl PageNumberPaginator {
    /// Create a new page number paginator that stops on an empty page
    pub fn new(page_param: impl Into<String>, start_page: u32) -> Self {
        Self {
            page_param: page_param.into(),
            start_page,
            page_size_param: None,
            page_size: None,
            stop_conditions: vec![StopCondition::EmptyPage],
        }
    }

    /// Set page size parameter
    #[must_use]
    pub fn with_page_size(mut self, param: impl Into<String>, size: u32) -> Self {
        self.page_size_param = Some(param.into());
        self.page_size = Some(size);
        self
    }

    /// Add a stop condition
    #[must_use]
    pub fn stop_on(mut self, condition: StopCondition) -> Self {
        if !self.stop_conditions.contains(&condition) {
            self.stop_conditions.push(condition);
        }
        self
    }

    fn params_for(&self, page: u32) -> HashMap<String, String> {
        let mut params = HashMap::new();
        params.insert(self.page_param.clone(), page.to_string());
        if let (Some(param), Some(size)) = (&self.page_size_param, self.page_size) {
            params.insert(param.clone(), size.to_string());
        }
        params
    }
}

impl Paginator for PageNumberPaginator {
    fn initial_state(&self) -> PaginationState {
        PaginationState::with_page(self.start_page)
    }

    fn request_params(&self, state: &PaginationState) -> HashMap<String, String> {
        self.params_for(state.page)
    }

    fn process_response(
        &self,
        headers: &HeaderMap,
        records_count: usize,
        state: &mut PaginationState,
    ) -> NextPage {
        state.add_fetched(records_count as u64);

        if any_stop(&self.stop_conditions, headers, records_count, self.page_size) {
            state.mark_done();
            return NextPage::Done;
        }

        state.next_page();
        NextPage::with_params(self.params_for(state.page))
    }
}

// ============================================================================
// Offset Pagination
// ============================================================================

/// Offset-based pagination (e.g., SQL-style pagination)
///
/// Uses offset and limit parameters to paginate.
/// Common patterns:
/// - `?offset=100&limit=50`
/// - `?skip=100&take=50`
#[derive(Debug, Clone)]
pub struct OffsetPaginator {
    /// Query parameter name for offset
    pub offset_param: String,
    /// Query parameter name for limit
    pub limit_param: String,
    /// Number of records per page
    pub limit_value: u32,
    /// Stop conditions, any of which ends the run
    pub stop_conditions: Vec<StopCondition>,
}

impl OffsetPaginator {
    /// Create a new offset paginator that stops on an empty or short page
    pub fn new(
        offset_param: impl Into<String>,
        limit_param: impl Into<String>,
        limit_value: u32,
    ) -> Self {
        Self {
            offset_param: offset_param.into(),
            limit_param: limit_param.into(),
            limit_value,
            stop_conditions: vec![StopCondition::EmptyPage, StopCondition::ShortPage],
        }
    }

    /// Replace the stop conditions
    #[must_use]
    pub fn with_stop_conditions(mut self, conditions: Vec<StopCondition>) -> Self {
        self.stop_conditions = conditions;
        self
    }
}

impl Paginator for OffsetPaginator {
    fn request_params(&self, state: &PaginationState) -> HashMap<String, String> {
        let mut params = HashMap::new();
        params.insert(self.offset_param.clone(), state.offset.to_string());
        params.insert(self.limit_param.clone(), self.limit_value.to_string());
        params
    }

    fn process_response(
        &self,
        headers: &HeaderMap,
        records_count: usize,
        state: &mut PaginationState,
    ) -> NextPage {
        state.add_fetched(records_count as u64);

        if any_stop(
            &self.stop_conditions,
            headers,
            records_count,
            Some(self.limit_value),
        ) {
            state.mark_done();
            return NextPage::Done;
        }

        state.add_offset(self.limit_value);
        NextPage::with_params(self.request_params(state))
    }
}

// ============================================================================
// Link Header Pagination
// ============================================================================

/// Link header pagination (RFC 8288)
///
/// Extracts next page URL from the Link header.
/// Common in GitHub, GitLab APIs.
/// Format: `Link: <https://api.github.com/...?page=2>; rel="next", ...`
#[derive(Debug, Clone)]
pub struct LinkHeaderPaginator {
    /// Rel value to follow (default: "next")
    pub rel: String,
}

impl Default for LinkHeaderPaginator {
    fn default() -> Self {
        Self {
            rel: "next".to_string(),
        }
    }
}

impl LinkHeaderPaginator {
    /// Create a new link header paginator
    pub fn new(rel: impl Into<String>) -> Self {
        Self { rel: rel.into() }
    }
}

impl Paginator for LinkHeaderPaginator {
    fn request_params(&self, _state: &PaginationState) -> HashMap<String, String> {
        HashMap::new()
    }

    fn process_response(
        &self,
        headers: &HeaderMap,
        records_count: usize,
        state: &mut PaginationState,
    ) -> NextPage {
        state.add_fetched(records_count as u64);

        if let Some(next_url) = find_link(headers, &self.rel) {
            state.next_page();
            return NextPage::with_url(next_url);
        }

        state.mark_done();
        NextPage::Done
    }
}
