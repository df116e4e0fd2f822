//! HTTP client construction and client-identity rotation

use crate::config::FetchConfig;
use rand::seq::IndexedRandom;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::Client;
use std::time::Duration;

/// Browser User-Agent strings rotated across requests
///
/// Identical repeated requests are easy to fingerprint; picking one of a few
/// current desktop browsers per request is enough to blur that signature.
pub const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:109.0) Gecko/20100101 Firefox/121.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.1 Safari/605.1.15",
];

/// Picks a User-Agent uniformly at random from [`USER_AGENTS`]
pub fn random_user_agent() -> &'static str {
    USER_AGENTS
        .choose(&mut rand::rng())
        .copied()
        .unwrap_or(USER_AGENTS[0])
}

/// Headers a desktop browser sends with a top-level page navigation
pub fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
        ),
    );
    headers.insert(
        header::ACCEPT_LANGUAGE,
        HeaderValue::from_static("en-US,en;q=0.5"),
    );
    headers.insert(
        header::ACCEPT_ENCODING,
        HeaderValue::from_static("gzip, deflate, br"),
    );
    headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
    headers.insert(
        header::UPGRADE_INSECURE_REQUESTS,
        HeaderValue::from_static("1"),
    );
    headers
}

/// Builds the HTTP client shared by every request
///
/// The client owns the connection pool, so it is built once and cloned into
/// the resolver and fetcher. Per-request settings (User-Agent, timeout) are
/// applied on each request instead of here, which keeps the client free of
/// request-specific state.
///
/// Redirects are followed (reqwest's default limit of 10) since both short
/// links and product pages bounce through regional hosts.
///
/// # Errors
///
/// Returns `reqwest::Error` if the TLS backend cannot be initialised.
///
/// # Example
///
/// ```no_run
/// use product_snap::config::FetchConfig;
/// use product_snap::fetch::build_http_client;
///
/// let client = build_http_client(&FetchConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &FetchConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .timeout(Duration::from_secs(
            config.request_timeout_secs.max(config.resolve_timeout_secs),
        ))
        .pool_idle_timeout(Duration::from_secs(90))
        .gzip(true)
        .brotli(true)
        .deflate(true)
        .build()
}
