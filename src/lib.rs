//! Product-Snap: resilient product data extraction
//!
//! This crate fetches an Amazon product page and extracts its title and
//! primary high-resolution image URL, tolerating short links, throttling,
//! challenge pages, and layout churn. Around the extraction pipeline it ships
//! a small capped product store, a JSON HTTP API, and a CLI.

pub mod config;
pub mod extract;
pub mod fetch;
pub mod pipeline;
pub mod server;
pub mod store;
pub mod url;

use std::fmt;
use thiserror::Error;

/// Main error type for a single extraction request
///
/// Each variant corresponds to one [`ErrorKind`]. The boundary layer maps the
/// kind to a transport status via [`ExtractionError::status_code`].
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Please provide a valid Amazon product URL (got '{url}')")]
    InvalidUrl { url: String },

    #[error("Failed to resolve short URL {url}: {reason}")]
    ResolutionFailed { url: String, reason: String },

    #[error("Amazon is temporarily blocking requests ({reason}). Please try again later.")]
    FetchBlocked { status: u16, reason: String },

    #[error("Request timeout while fetching {url}")]
    FetchTimeout { url: String },

    #[error("Failed to fetch product page {url}: {reason}")]
    FetchFailed {
        url: String,
        status: Option<u16>,
        reason: String,
    },

    #[error("Could not find product image at {url}. The page structure may have changed or the product may not have images.")]
    NoImageFound { url: String },

    #[error("Extraction of {url} was cancelled before completion (request timeout)")]
    Cancelled { url: String },
}

/// Discriminant of [`ExtractionError`], used for logging and status mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidUrl,
    ResolutionFailed,
    FetchBlocked,
    FetchTimeout,
    FetchFailed,
    NoImageFound,
    Cancelled,
}

impl ExtractionError {
    /// Returns the kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidUrl { .. } => ErrorKind::InvalidUrl,
            Self::ResolutionFailed { .. } => ErrorKind::ResolutionFailed,
            Self::FetchBlocked { .. } => ErrorKind::FetchBlocked,
            Self::FetchTimeout { .. } => ErrorKind::FetchTimeout,
            Self::FetchFailed { .. } => ErrorKind::FetchFailed,
            Self::NoImageFound { .. } => ErrorKind::NoImageFound,
            Self::Cancelled { .. } => ErrorKind::Cancelled,
        }
    }

    /// Returns true if another attempt could plausibly succeed
    ///
    /// An invalid URL is structurally wrong and a cancelled request has no
    /// time left, so neither is retried. Everything else is.
    pub fn is_retriable(&self) -> bool {
        !matches!(self.kind(), ErrorKind::InvalidUrl | ErrorKind::Cancelled)
    }

    /// Maps the error to the HTTP status the boundary layer responds with
    ///
    /// | Kind | Status |
    /// |------|--------|
    /// | InvalidUrl | 400 |
    /// | FetchBlocked | 429 |
    /// | FetchTimeout, Cancelled | 408 |
    /// | everything else | 500 |
    pub fn status_code(&self) -> u16 {
        match self.kind() {
            ErrorKind::InvalidUrl => 400,
            ErrorKind::FetchBlocked => 429,
            ErrorKind::FetchTimeout | ErrorKind::Cancelled => 408,
            ErrorKind::ResolutionFailed | ErrorKind::FetchFailed | ErrorKind::NoImageFound => 500,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::InvalidUrl => "invalid_url",
            Self::ResolutionFailed => "resolution_failed",
            Self::FetchBlocked => "fetch_blocked",
            Self::FetchTimeout => "fetch_timeout",
            Self::FetchFailed => "fetch_failed",
            Self::NoImageFound => "no_image_found",
            Self::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid address in config: {0}")]
    InvalidAddress(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Result type alias for extraction operations
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use extract::{ProductData, UNKNOWN_TITLE};
pub use pipeline::{ProductQuery, Scraper};
pub use store::{MemoryStore, ProductStore, StoredProduct};
