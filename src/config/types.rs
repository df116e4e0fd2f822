use serde::Deserialize;

/// Main configuration structure for Product-Snap
///
/// Every section is optional; a missing section or key falls back to the
/// defaults below, so `Config::default()` is a complete working configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub fetch: FetchConfig,
    pub retry: RetryConfig,
    pub server: ServerConfig,
}

/// Target site recognition
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SiteConfig {
    /// Substrings that identify a product page host
    pub host_markers: Vec<String>,

    /// Substrings that identify a short-link host
    pub short_link_markers: Vec<String>,

    /// Case-insensitive body substrings that identify a challenge page
    pub challenge_markers: Vec<String>,
}

/// HTTP timeouts
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FetchConfig {
    /// Timeout for the product page GET (seconds)
    pub request_timeout_secs: u64,

    /// Timeout for the short-link resolution GET (seconds)
    pub resolve_timeout_secs: u64,

    /// TCP connect timeout shared by both requests (seconds)
    pub connect_timeout_secs: u64,
}

/// Retry orchestration and request pacing
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RetryConfig {
    /// Hard ceiling on attempts per request, whatever the caller asks for
    pub max_attempts: u32,

    /// Attempts used when the caller gives no hint
    pub default_attempts: u32,

    /// Backoff before attempt n+1 is `backoff_base_ms * 2^n`
    pub backoff_base_ms: u64,

    /// Upper bound of the random jitter added to each backoff (milliseconds)
    pub jitter_max_ms: u64,

    /// Lower bound of the randomized delay before every fetch (milliseconds)
    pub pacing_min_ms: u64,

    /// Upper bound of the randomized delay before every fetch (milliseconds)
    pub pacing_max_ms: u64,
}

/// HTTP API settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ServerConfig {
    /// Socket address to listen on
    pub bind_addr: String,

    /// Number of products the store keeps before evicting the oldest
    pub store_capacity: usize,

    /// Overall deadline for one API extraction request (seconds)
    pub request_deadline_secs: u64,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            host_markers: vec!["amazon.".to_string()],
            short_link_markers: vec!["amzn.to".to_string()],
            challenge_markers: vec!["captcha".to_string(), "robot check".to_string()],
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 15,
            resolve_timeout_secs: 10,
            connect_timeout_secs: 10,
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            default_attempts: 2,
            backoff_base_ms: 1000,
            jitter_max_ms: 1000,
            pacing_min_ms: 500,
            pacing_max_ms: 1500,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".to_string(),
            store_capacity: 10,
            request_deadline_secs: 60,
        }
    }
}
