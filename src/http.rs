// src/http.rs
// Shared HTTP client for comment-feed requests

use std::time::Duration;

/// Per-request timeout for a single comment-page fetch (spec §5: "e.g. 30s").
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Connect timeout for the comment feed endpoint.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Create the shared HTTP client with appropriate defaults.
///
/// This client should be created once at startup and passed to all
/// modules that need HTTP access. Uses connection pooling internally.
pub fn create_shared_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .connect_timeout(CONNECT_TIMEOUT)
        .pool_max_idle_per_host(4)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}
