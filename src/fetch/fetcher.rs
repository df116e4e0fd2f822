//! Product page fetcher
//!
//! This module issues the single GET for a product page and classifies the
//! response. It never retries; retry policy lives in the pipeline.

use crate::fetch::client::{browser_headers, random_user_agent};
use crate::ExtractionError;
use reqwest::{header, Client, StatusCode};
use std::fmt;
use std::time::Duration;

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchOutcome {
    /// 2xx response with its body
    Success {
        /// Page body content
        body: String,
        /// HTTP status code
        status: u16,
    },

    /// The site signalled throttling (HTTP 503)
    Blocked {
        /// The HTTP status code
        status: u16,
        /// Human-readable description
        reason: String,
    },

    /// Anything else that went wrong; may succeed on a later attempt
    TransientFailure {
        /// What went wrong
        cause: FailureCause,
    },
}

/// Why a fetch failed transiently
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureCause {
    /// The request exceeded its timeout
    Timeout,
    /// Non-2xx status other than 503
    Status(u16),
    /// Connection refused, reset, TLS failure, unreadable body
    Network(String),
}

impl fmt::Display for FailureCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => f.write_str("request timed out"),
            Self::Status(status) => write!(f, "HTTP status {}", status),
            Self::Network(error) => f.write_str(error),
        }
    }
}

impl FetchOutcome {
    /// Converts the outcome into `(body, status)` or the matching pipeline error
    ///
    /// | Outcome | Error |
    /// |---------|-------|
    /// | `Blocked` | `FetchBlocked` |
    /// | `TransientFailure(Timeout)` | `FetchTimeout` |
    /// | other `TransientFailure` | `FetchFailed` |
    pub fn into_body(self, url: &str) -> Result<(String, u16), ExtractionError> {
        match self {
            Self::Success { body, status } => Ok((body, status)),
            Self::Blocked { status, reason } => {
                Err(ExtractionError::FetchBlocked { status, reason })
            }
            Self::TransientFailure {
                cause: FailureCause::Timeout,
            } => Err(ExtractionError::FetchTimeout {
                url: url.to_string(),
            }),
            Self::TransientFailure { cause } => {
                let status = match &cause {
                    FailureCause::Status(status) => Some(*status),
                    _ => None,
                };
                Err(ExtractionError::FetchFailed {
                    url: url.to_string(),
                    status,
                    reason: cause.to_string(),
                })
            }
        }
    }
}

/// Issues product page GETs with a rotating client identity
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    timeout: Duration,
}

impl Fetcher {
    /// Creates a fetcher sharing the given (pooled) client
    pub fn new(client: Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// Fetches a URL and classifies the response
    ///
    /// # Response Classification
    ///
    /// | Condition | Outcome |
    /// |-----------|---------|
    /// | HTTP 2xx | `Success` |
    /// | HTTP 503 | `Blocked` |
    /// | Other non-2xx | `TransientFailure(Status)` |
    /// | Timeout | `TransientFailure(Timeout)` |
    /// | Connection / body error | `TransientFailure(Network)` |
    pub async fn fetch(&self, url: &str) -> FetchOutcome {
        let user_agent = random_user_agent();
        tracing::debug!(url, user_agent, "fetching product page");

        let response = match self
            .client
            .get(url)
            .headers(browser_headers())
            .header(header::USER_AGENT, user_agent)
            .timeout(self.timeout)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return classify_error(&e),
        };

        let status = response.status();

        if status == StatusCode::SERVICE_UNAVAILABLE {
            return FetchOutcome::Blocked {
                status: status.as_u16(),
                reason: format!("HTTP {}", status.as_u16()),
            };
        }

        if !status.is_success() {
            return FetchOutcome::TransientFailure {
                cause: FailureCause::Status(status.as_u16()),
            };
        }

        match response.text().await {
            Ok(body) => FetchOutcome::Success {
                body,
                status: status.as_u16(),
            },
            Err(e) => classify_error(&e),
        }
    }
}

/// Classifies a reqwest error into a transient failure cause
fn classify_error(error: &reqwest::Error) -> FetchOutcome {
    let cause = if error.is_timeout() {
        FailureCause::Timeout
    } else if error.is_connect() {
        FailureCause::Network(format!("connection failed: {}", error))
    } else {
        FailureCause::Network(error.to_string())
    };

    FetchOutcome::TransientFailure { cause }
}
