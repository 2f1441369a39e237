//! Page stream
//!
//! Drives a [`Paginator`] against the HTTP client and yields pages lazily.
//! One request is in flight at a time and pages come out in request order.
//! An empty page ends the stream without being yielded; a failed request
//! ends it with the error.

use super::types::{NextPage, Page, PaginationState, Paginator};
use crate::decode::RecordDecoder;
use crate::error::Result;
use crate::http::{HttpClient, RequestConfig};
use futures::stream::{self, Stream};
use std::collections::HashMap;
use tracing::debug;
use url::Url;

/// Where the next request of a run goes
struct Cursor {
    url: String,
    params: HashMap<String, String>,
    state: PaginationState,
    number: u32,
}

/// Lazily fetch every page of `url`
///
/// The stream is finite and not restartable: each call begins a new run from
/// the paginator's initial state.
pub fn paginate<'a>(
    client: &'a HttpClient,
    url: impl Into<String>,
    paginator: &'a dyn Paginator,
    decoder: &'a dyn RecordDecoder,
) -> impl Stream<Item = Result<Page>> + 'a {
    let state = paginator.initial_state();
    let cursor = Cursor {
        url: client.build_url(&url.into()),
        params: paginator.request_params(&state),
        state,
        number: 1,
    };

    stream::try_unfold(Some(cursor), move |cursor| async move {
        match cursor {
            Some(cursor) => fetch_page(client, paginator, decoder, cursor).await,
            None => Ok(None),
        }
    })
}

async fn fetch_page(
    client: &HttpClient,
    paginator: &dyn Paginator,
    decoder: &dyn RecordDecoder,
    mut cursor: Cursor,
) -> Result<Option<(Page, Option<Cursor>)>> {
    let request = RequestConfig::new().queries(cursor.params.clone());
    let response = client.get_with_config(&cursor.url, request).await?;

    let page_url = response.url().to_string();
    let headers = response.headers().clone();
    let body = response.text().await?;
    let records = decoder.decode(&body)?;

    if records.is_empty() {
        debug!(url = %page_url, page = cursor.number, "Empty page, pagination complete");
        return Ok(None);
    }

    let number = cursor.number;
    let records_count = records.len();
    debug!(url = %page_url, page = number, records = records_count, "Fetched page");

    let next = match paginator.process_response(&headers, records_count, &mut cursor.state) {
        NextPage::Continue { query_params, url } => {
            if let Some(next_url) = url {
                cursor.url = resolve_link(&page_url, &next_url);
            }
            cursor.params = query_params;
            cursor.number += 1;
            Some(cursor)
        }
        NextPage::Done => {
            debug!(
                url = %page_url,
                total = cursor.state.total_fetched,
                "No next page, pagination complete"
            );
            None
        }
    };

    let page = Page {
        number,
        url: page_url,
        records,
    };

    Ok(Some((page, next)))
}

/// Resolve a link target against the URL of the page that carried it
fn resolve_link(base: &str, target: &str) -> String {
    Url::parse(base)
        .and_then(|b| b.join(target))
        .map_or_else(|_| target.to_string(), |u| u.to_string())
}
