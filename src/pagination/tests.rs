//! Tests for pagination module

use super::*;
use crate::decode::JsonDecoder;
use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpClientConfig};
use futures::{StreamExt, TryStreamExt};
use pretty_assertions::assert_eq;
use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn link_headers(value: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("link", HeaderValue::from_str(value).unwrap());
    headers
}

fn jaffle_paginator() -> PageNumberPaginator {
    PageNumberPaginator::new("page", 1)
        .with_page_size("page_size", 100)
        .stop_on(StopCondition::missing_next_link())
}

// ============================================================================
// NextPage / State Tests
// ============================================================================

#[test]
fn test_next_page_with_url() {
    let next = NextPage::with_url("https://api.example.com/page2");
    assert!(next.is_continue());

    if let NextPage::Continue { query_params, url } = next {
        assert!(query_params.is_empty());
        assert_eq!(url, Some("https://api.example.com/page2".to_string()));
    } else {
        panic!("Expected Continue");
    }
}

#[test]
fn test_next_page_done() {
    let next = NextPage::Done;
    assert!(next.is_done());
    assert!(!next.is_continue());
}

#[test]
fn test_pagination_state_mutations() {
    let mut state = PaginationState::with_page(1);

    state.next_page();
    assert_eq!(state.page, 2);

    state.add_offset(50);
    assert_eq!(state.offset, 50);

    state.add_fetched(100);
    assert_eq!(state.total_fetched, 100);

    state.mark_done();
    assert!(state.done);
}

// ============================================================================
// Link Header Parsing Tests
// ============================================================================

#[test]
fn test_parse_link_header_next() {
    let header = r#"<https://api.example.com/items?page=3>; rel="next", <https://api.example.com/items?page=1>; rel="prev""#;
    assert_eq!(
        parse_link_header(header, "next"),
        Some("https://api.example.com/items?page=3".to_string())
    );
    assert_eq!(
        parse_link_header(header, "prev"),
        Some("https://api.example.com/items?page=1".to_string())
    );
    assert_eq!(parse_link_header(header, "last"), None);
}

#[test]
fn test_parse_link_header_variants() {
    assert_eq!(
        parse_link_header("<https://x/y?page=2>; rel=next", "next"),
        Some("https://x/y?page=2".to_string())
    );
    assert_eq!(
        parse_link_header(r#"<https://x/y?page=2>; REL = "next last""#, "next"),
        Some("https://x/y?page=2".to_string())
    );
    assert_eq!(parse_link_header(r#"<https://x/y>; rel="nextpage""#, "next"), None);
    assert_eq!(parse_link_header("", "next"), None);
}

#[test]
fn test_find_link_across_multiple_headers() {
    let mut headers = HeaderMap::new();
    headers.append("link", HeaderValue::from_static(r#"<https://x/a>; rel="prev""#));
    headers.append("link", HeaderValue::from_static(r#"<https://x/b>; rel="next""#));
    assert_eq!(find_link(&headers, "next"), Some("https://x/b".to_string()));
}

// ============================================================================
// StopCondition Tests
// ============================================================================

#[test]
fn test_stop_condition_empty_page() {
    let headers = HeaderMap::new();
    let condition = StopCondition::EmptyPage;

    assert_eq!(
        check_stop_condition(&condition, &headers, 0, None),
        StopResult::Stop
    );
    assert_eq!(
        check_stop_condition(&condition, &headers, 10, None),
        StopResult::Continue
    );
}

#[test]
fn test_stop_condition_short_page() {
    let headers = HeaderMap::new();
    let condition = StopCondition::ShortPage;

    assert_eq!(
        check_stop_condition(&condition, &headers, 5, Some(10)),
        StopResult::Stop
    );
    assert_eq!(
        check_stop_condition(&condition, &headers, 10, Some(10)),
        StopResult::Continue
    );
    assert_eq!(
        check_stop_condition(&condition, &headers, 5, None),
        StopResult::Continue
    );
}

#[test]
fn test_stop_condition_missing_link() {
    let condition = StopCondition::missing_next_link();

    let with_next = link_headers(r#"<https://x/y?page=2>; rel="next""#);
    assert_eq!(
        check_stop_condition(&condition, &with_next, 10, None),
        StopResult::Continue
    );

    let only_prev = link_headers(r#"<https://x/y?page=1>; rel="prev""#);
    assert_eq!(
        check_stop_condition(&condition, &only_prev, 10, None),
        StopResult::Stop
    );
    assert_eq!(
        check_stop_condition(&condition, &HeaderMap::new(), 10, None),
        StopResult::Stop
    );
}

// ============================================================================
// Page Number Paginator Tests
// ============================================================================

#[test]
fn test_page_number_paginator_initial_params() {
    let paginator = jaffle_paginator();
    let state = paginator.initial_state();
    assert_eq!(state.page, 1);

    let params = paginator.request_params(&state);
    assert_eq!(params.get("page"), Some(&"1".to_string()));
    assert_eq!(params.get("page_size"), Some(&"100".to_string()));
}

#[test]
fn test_page_number_paginator_continues_on_next_link() {
    let paginator = jaffle_paginator();
    let mut state = paginator.initial_state();
    let headers = link_headers(r#"<https://x/customers?page=2>; rel="next""#);

    // A short page still continues while the API advertises a next link
    let next = paginator.process_response(&headers, 3, &mut state);

    assert_eq!(state.page, 2);
    assert_eq!(state.total_fetched, 3);
    match next {
        NextPage::Continue { query_params, url } => {
            assert_eq!(query_params.get("page"), Some(&"2".to_string()));
            assert_eq!(query_params.get("page_size"), Some(&"100".to_string()));
            assert!(url.is_none());
        }
        NextPage::Done => panic!("Expected Continue"),
    }
}

#[test]
fn test_page_number_paginator_stops_without_next_link() {
    let paginator = jaffle_paginator();
    let mut state = paginator.initial_state();

    let next = paginator.process_response(&HeaderMap::new(), 100, &mut state);

    assert!(next.is_done());
    assert!(state.done);
    assert_eq!(state.page, 1);
}

#[test]
fn test_page_number_paginator_without_link_condition_ignores_headers() {
    let paginator = PageNumberPaginator::new("page", 0);
    let mut state = paginator.initial_state();
    assert_eq!(state.page, 0);

    let next = paginator.process_response(&HeaderMap::new(), 10, &mut state);
    assert!(next.is_continue());
    assert_eq!(state.page, 1);
}

#[test]
fn test_page_number_paginator_stop_on_is_idempotent() {
    let paginator = jaffle_paginator().stop_on(StopCondition::missing_next_link());
    assert_eq!(
        paginator.stop_conditions,
        vec![StopCondition::EmptyPage, StopCondition::missing_next_link()]
    );
}

// ============================================================================
// Offset Paginator Tests
// ============================================================================

#[test]
fn test_offset_paginator_continues() {
    let paginator = OffsetPaginator::new("offset", "limit", 50);
    let mut state = paginator.initial_state();

    let params = paginator.request_params(&state);
    assert_eq!(params.get("offset"), Some(&"0".to_string()));
    assert_eq!(params.get("limit"), Some(&"50".to_string()));

    let next = paginator.process_response(&HeaderMap::new(), 50, &mut state);
    assert_eq!(state.offset, 50);
    match next {
        NextPage::Continue { query_params, .. } => {
            assert_eq!(query_params.get("offset"), Some(&"50".to_string()));
        }
        NextPage::Done => panic!("Expected Continue"),
    }
}

#[test]
fn test_offset_paginator_stops_on_partial_page() {
    let paginator = OffsetPaginator::new("offset", "limit", 50);
    let mut state = paginator.initial_state();

    let next = paginator.process_response(&HeaderMap::new(), 20, &mut state);
    assert!(next.is_done());
    assert_eq!(state.total_fetched, 20);
}

#[test]
fn test_offset_paginator_custom_conditions() {
    let paginator = OffsetPaginator::new("skip", "take", 50)
        .with_stop_conditions(vec![StopCondition::EmptyPage]);
    let mut state = paginator.initial_state();

    assert!(paginator
        .process_response(&HeaderMap::new(), 20, &mut state)
        .is_continue());
}

// ============================================================================
// Link Header Paginator Tests
// ============================================================================

#[test]
fn test_link_header_paginator() {
    let paginator = LinkHeaderPaginator::default();
    let mut state = paginator.initial_state();
    assert!(paginator.request_params(&state).is_empty());

    let headers = link_headers(r#"<https://api.github.com/repos?page=2>; rel="next""#);
    let next = paginator.process_response(&headers, 30, &mut state);
    assert_eq!(
        next,
        NextPage::with_url("https://api.github.com/repos?page=2")
    );

    let next = paginator.process_response(&HeaderMap::new(), 30, &mut state);
    assert!(next.is_done());
    assert_eq!(state.total_fetched, 60);
}

// ============================================================================
// Page Stream Tests
// ============================================================================

fn test_client(server: &MockServer) -> HttpClient {
    let config = HttpClientConfig::builder()
        .base_url(server.uri())
        .max_retries(0)
        .no_rate_limit()
        .build();
    HttpClient::with_config(config).unwrap()
}

fn next_link(server: &MockServer, endpoint: &str, page: u32) -> String {
    format!(
        "<{}/{endpoint}?page={page}&page_size=100>; rel=\"next\"",
        server.uri()
    )
}

async fn mount_page(
    server: &MockServer,
    endpoint: &str,
    page: u32,
    body: serde_json::Value,
    has_next: bool,
) {
    let mut response = ResponseTemplate::new(200).set_body_json(body);
    if has_next {
        response = response.insert_header("link", next_link(server, endpoint, page + 1).as_str());
    }

    Mock::given(method("GET"))
        .and(path(format!("/{endpoint}")))
        .and(query_param("page", page.to_string()))
        .and(query_param("page_size", "100"))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

async fn collect_pages(client: &HttpClient, endpoint: &str) -> Result<Vec<Page>> {
    let paginator = jaffle_paginator();
    let decoder = JsonDecoder::new();
    paginate(client, endpoint, &paginator, &decoder)
        .try_collect()
        .await
}

#[tokio::test]
async fn test_stream_customers_two_pages_then_missing_link() {
    let server = MockServer::start().await;
    mount_page(&server, "customers", 1, json!([{"id": 1}, {"id": 2}]), true).await;
    mount_page(&server, "customers", 2, json!([{"id": 3}]), false).await;

    let client = test_client(&server);
    let pages = collect_pages(&client, "customers").await.unwrap();

    assert_eq!(pages.len(), 2);
    assert_eq!(pages[0].number, 1);
    assert_eq!(pages[0].records, vec![json!({"id": 1}), json!({"id": 2})]);
    assert_eq!(pages[1].number, 2);
    assert_eq!(pages[1].records, vec![json!({"id": 3})]);
    assert!(pages[1].url.contains("page=2"));
}

#[tokio::test]
async fn test_stream_products_empty_first_page() {
    let server = MockServer::start().await;
    mount_page(&server, "products", 1, json!([]), true).await;

    let client = test_client(&server);
    let pages = collect_pages(&client, "products").await.unwrap();

    assert!(pages.is_empty());
}

#[tokio::test]
async fn test_stream_n_full_pages_then_empty_page() {
    let server = MockServer::start().await;
    for page in 1..=3 {
        let records: Vec<_> = (0..100).map(|i| json!({"id": page * 1000 + i})).collect();
        mount_page(&server, "orders", page, json!(records), true).await;
    }
    // The empty page still advertises a next link; emptiness alone ends the run
    mount_page(&server, "orders", 4, json!([]), true).await;

    let client = test_client(&server);
    let pages = collect_pages(&client, "orders").await.unwrap();

    assert_eq!(pages.len(), 3);
    for (i, page) in pages.iter().enumerate() {
        assert_eq!(page.number as usize, i + 1);
        assert_eq!(page.len(), 100);
        assert_eq!(page.records[0]["id"], json!((i as u64 + 1) * 1000));
    }
}

#[tokio::test]
async fn test_stream_full_page_without_next_link_stops() {
    let server = MockServer::start().await;
    let records: Vec<_> = (0..100).map(|i| json!({"id": i})).collect();
    mount_page(&server, "customers", 1, json!(records), false).await;

    Mock::given(method("GET"))
        .and(path("/customers"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 999}])))
        .expect(0)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let pages = collect_pages(&client, "customers").await.unwrap();

    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0].len(), 100);
}

#[tokio::test]
async fn test_stream_error_on_page_k_after_earlier_pages() {
    let server = MockServer::start().await;
    mount_page(&server, "orders", 1, json!([{"id": 1}]), true).await;
    mount_page(&server, "orders", 2, json!([{"id": 2}]), true).await;

    Mock::given(method("GET"))
        .and(path("/orders"))
        .and(query_param("page", "3"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let paginator = jaffle_paginator();
    let decoder = JsonDecoder::new();
    let results: Vec<Result<Page>> = paginate(&client, "orders", &paginator, &decoder)
        .collect()
        .await;

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].as_ref().unwrap().records, vec![json!({"id": 1})]);
    assert_eq!(results[1].as_ref().unwrap().records, vec![json!({"id": 2})]);
    match &results[2] {
        Err(Error::HttpStatus { url, status, .. }) => {
            assert_eq!(*status, 503);
            assert!(url.contains("/orders?"), "url was {url}");
            assert!(url.contains("page=3"), "url was {url}");
        }
        other => panic!("Expected HttpStatus error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_stream_malformed_body_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/customers"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let err = collect_pages(&client, "customers").await.unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));
}

#[tokio::test]
async fn test_stream_is_lazy() {
    let server = MockServer::start().await;
    mount_page(&server, "customers", 1, json!([{"id": 1}]), true).await;

    Mock::given(method("GET"))
        .and(path("/customers"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 2}])))
        .expect(0)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let paginator = jaffle_paginator();
    let decoder = JsonDecoder::new();
    let mut pages = Box::pin(paginate(&client, "customers", &paginator, &decoder));

    let first = pages.next().await.unwrap().unwrap();
    assert_eq!(first.records, vec![json!({"id": 1})]);
}

#[tokio::test]
async fn test_stream_follows_relative_link_header() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos"))
        .and(query_param("cursor", "b"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 2}])))
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/repos"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{"id": 1}]))
                .insert_header("link", r#"</repos?cursor=b>; rel="next""#),
        )
        .mount(&server)
        .await;

    let client = test_client(&server);
    let paginator = LinkHeaderPaginator::default();
    let decoder = JsonDecoder::new();
    let pages: Vec<Page> = paginate(&client, "repos", &paginator, &decoder)
        .try_collect()
        .await
        .unwrap();

    assert_eq!(pages.len(), 2);
    assert_eq!(pages[1].records, vec![json!({"id": 2})]);
}
