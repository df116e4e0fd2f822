//! Extraction pipeline
//!
//! One extraction request runs the stages below, and the whole sequence is
//! retried under the attempt budget:
//!
//! 1. Resolve the raw URL (short links are followed)
//! 2. Randomized pacing delay
//! 3. Fetch the product page
//! 4. Challenge-page detection on the body
//! 5. Title and image extraction
//!
//! Every wait in the pipeline races a [`CancellationToken`], so a request
//! deadline stops the work instead of letting it run to completion unseen.

mod pacing;
mod retry;

pub use pacing::{backoff_delay, pacing_delay, pause, random_between};
pub use retry::{clamp_attempts, retry_with_backoff};

use crate::config::{Config, RetryConfig};
use crate::extract::{extract_from_markup, ProductData};
use crate::fetch::{build_http_client, Detector, Fetcher, Verdict};
use crate::url::Resolver;
use crate::ExtractionError;
use reqwest::Client;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// A single extraction request, as supplied by the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductQuery {
    pub raw_url: String,
}

impl ProductQuery {
    pub fn new(raw_url: impl Into<String>) -> Self {
        Self {
            raw_url: raw_url.into(),
        }
    }
}

/// Runs extraction requests against the target site
///
/// Cloning is cheap: the HTTP connection pool is shared between clones, so a
/// server can hand one scraper to every request handler.
#[derive(Debug, Clone)]
pub struct Scraper {
    resolver: Resolver,
    fetcher: Fetcher,
    detector: Detector,
    policy: RetryConfig,
}

impl Scraper {
    /// Builds a scraper with its own pooled HTTP client
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let client = build_http_client(&config.fetch)?;
        Ok(Self::with_client(client, config))
    }

    /// Builds a scraper around an existing client
    pub fn with_client(client: Client, config: &Config) -> Self {
        let resolver = Resolver::new(
            client.clone(),
            config.site.clone(),
            Duration::from_secs(config.fetch.resolve_timeout_secs),
        );
        let fetcher = Fetcher::new(
            client,
            Duration::from_secs(config.fetch.request_timeout_secs),
        );

        Self {
            resolver,
            fetcher,
            detector: Detector::new(&config.site.challenge_markers),
            policy: config.retry.clone(),
        }
    }

    /// Attempt budget used when the caller gives no hint
    pub fn default_attempts(&self) -> u32 {
        self.policy.default_attempts
    }

    /// Runs one extraction request with no deadline
    pub async fn run(
        &self,
        query: &ProductQuery,
        max_attempts: u32,
    ) -> Result<ProductData, ExtractionError> {
        self.run_with_cancel(query, max_attempts, &CancellationToken::new())
            .await
    }

    /// Runs one extraction request, stopping early if `cancel` fires
    ///
    /// `max_attempts` is clamped to `1..=retry.max-attempts`. The error of the
    /// final attempt is returned unchanged.
    pub async fn run_with_cancel(
        &self,
        query: &ProductQuery,
        max_attempts: u32,
        cancel: &CancellationToken,
    ) -> Result<ProductData, ExtractionError> {
        let url = query.raw_url.as_str();
        tracing::info!(url, max_attempts, "starting extraction");

        let product = retry_with_backoff(max_attempts, &self.policy, cancel, url, move |attempt| {
            self.attempt(url, attempt, cancel)
        })
        .await?;

        tracing::info!(
            url,
            title = %product.title,
            image_url = %product.image_url,
            "extraction succeeded"
        );
        Ok(product)
    }

    /// Runs one extraction request under an overall deadline
    ///
    /// When the deadline expires the in-flight attempt is cancelled and the
    /// request fails with [`ExtractionError::Cancelled`] (or whatever error the
    /// attempt had already produced).
    pub async fn run_with_deadline(
        &self,
        query: &ProductQuery,
        max_attempts: u32,
        deadline: Duration,
    ) -> Result<ProductData, ExtractionError> {
        let cancel = CancellationToken::new();
        let run = self.run_with_cancel(query, max_attempts, &cancel);
        tokio::pin!(run);

        tokio::select! {
            result = &mut run => result,
            _ = tokio::time::sleep(deadline) => {
                tracing::warn!(
                    url = %query.raw_url,
                    deadline_secs = deadline.as_secs(),
                    "request deadline expired; cancelling extraction"
                );
                cancel.cancel();
                run.await
            }
        }
    }

    async fn attempt(
        &self,
        raw_url: &str,
        attempt: u32,
        cancel: &CancellationToken,
    ) -> Result<ProductData, ExtractionError> {
        tracing::debug!(url = raw_url, attempt, "extraction attempt");

        let target = self.resolver.resolve(raw_url, cancel).await?;
        let url = target.canonical_url.as_str();

        pause(pacing_delay(&self.policy), cancel, url).await?;

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                return Err(ExtractionError::Cancelled { url: url.to_string() });
            }
            outcome = self.fetcher.fetch(url) => outcome,
        };
        let (body, status) = outcome.into_body(url)?;

        if let Verdict::Adversarial { marker } = self.detector.classify(&body) {
            tracing::warn!(url, status, marker = %marker, "challenge page detected");
            return Err(ExtractionError::FetchBlocked {
                status,
                reason: format!("challenge page detected (marker '{}')", marker),
            });
        }

        extract_from_markup(&body, url)
    }
}
