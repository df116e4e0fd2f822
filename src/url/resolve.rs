//! Short-link resolution

use crate::config::SiteConfig;
use crate::fetch::random_user_agent;
use crate::url::{classify_url, ResolvedTarget, UrlClass};
use crate::ExtractionError;
use reqwest::{header, Client};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Validates raw URLs and follows short links to their product page
#[derive(Debug, Clone)]
pub struct Resolver {
    client: Client,
    site: SiteConfig,
    timeout: Duration,
}

impl Resolver {
    /// Creates a resolver sharing the given (pooled) client
    pub fn new(client: Client, site: SiteConfig, timeout: Duration) -> Self {
        Self {
            client,
            site,
            timeout,
        }
    }

    /// Resolves a raw URL to its canonical product URL
    ///
    /// Product URLs pass through unchanged. Short links cost one GET that
    /// follows redirects; the final URL of that request becomes canonical.
    ///
    /// # Errors
    ///
    /// - [`ExtractionError::InvalidUrl`]: not a target-site URL; no request made
    /// - [`ExtractionError::ResolutionFailed`]: the redirect request failed or timed out
    /// - [`ExtractionError::Cancelled`]: `cancel` fired while the request was in flight
    pub async fn resolve(
        &self,
        raw_url: &str,
        cancel: &CancellationToken,
    ) -> Result<ResolvedTarget, ExtractionError> {
        let (class, candidate) = classify_url(raw_url, &self.site)?;

        match class {
            UrlClass::Product => Ok(ResolvedTarget {
                canonical_url: candidate.text,
            }),
            UrlClass::ShortLink => self.follow_short_link(&candidate.text, cancel).await,
        }
    }

    async fn follow_short_link(
        &self,
        url: &str,
        cancel: &CancellationToken,
    ) -> Result<ResolvedTarget, ExtractionError> {
        tracing::debug!(url, "resolving short link");

        let request = self
            .client
            .get(url)
            .header(header::USER_AGENT, random_user_agent())
            .timeout(self.timeout)
            .send();

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                return Err(ExtractionError::Cancelled { url: url.to_string() });
            }
            result = request => result.map_err(|e| {
                let reason = if e.is_timeout() {
                    format!("timed out after {}s", self.timeout.as_secs())
                } else {
                    e.to_string()
                };
                tracing::warn!(url, reason = %reason, "short link resolution failed");
                ExtractionError::ResolutionFailed {
                    url: url.to_string(),
                    reason,
                }
            })?,
        };

        if !response.status().is_success() {
            tracing::warn!(
                url,
                status = response.status().as_u16(),
                "short link ended on a non-success status"
            );
        }

        let canonical_url = response.url().to_string();
        tracing::info!(short = url, canonical = %canonical_url, "short link resolved");

        Ok(ResolvedTarget { canonical_url })
    }
}
