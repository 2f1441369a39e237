//! HTTP client module
//!
//! Provides the HTTP transport the paginator fetches pages with.
//!
//! # Features
//!
//! - **Automatic Retries**: transient failures (429, 5xx, timeouts) retried with backoff
//! - **Rate Limiting**: optional token bucket rate limiter using governor
//! - **Backoff Strategies**: Constant, linear, and exponential backoff

mod client;
mod rate_limit;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
