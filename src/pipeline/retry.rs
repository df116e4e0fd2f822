//! Bounded retry with exponential back-off and jitter.
//!
//! [`retry_with_backoff`] reruns a whole extraction attempt. Non-retriable
//! errors ([`ExtractionError::InvalidUrl`], [`ExtractionError::Cancelled`])
//! are returned immediately; everything else is retried until the attempt
//! budget runs out, and the last error is returned unchanged.

use crate::config::{RetryConfig, ATTEMPT_CEILING};
use crate::pipeline::pacing::{backoff_delay, pause};
use crate::ExtractionError;
use std::future::Future;
use tokio_util::sync::CancellationToken;

/// Clamps a caller-requested attempt count into `1..=ceiling`
pub fn clamp_attempts(requested: u32, ceiling: u32) -> u32 {
    requested.clamp(1, ceiling.max(1))
}

/// Runs `operation` up to `max_attempts` times
///
/// The count is clamped to the policy's `max_attempts`, and never exceeds
/// [`ATTEMPT_CEILING`] even for a policy that skipped validation.
///
/// `operation` receives the 1-based attempt number. Back-off schedule with
/// the default policy:
///
/// | Failed attempt | Sleep before next attempt |
/// |----------------|---------------------------|
/// | 1              | 2 000 ms + 0–1 000 ms     |
/// | 2              | 4 000 ms + 0–1 000 ms     |
/// | 3              | none (budget exhausted)   |
///
/// The back-off sleep is interrupted by `cancel`.
pub async fn retry_with_backoff<T, F, Fut>(
    max_attempts: u32,
    policy: &RetryConfig,
    cancel: &CancellationToken,
    url: &str,
    mut operation: F,
) -> Result<T, ExtractionError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, ExtractionError>>,
{
    let max_attempts = clamp_attempts(
        max_attempts,
        policy.max_attempts.min(ATTEMPT_CEILING),
    );
    let mut attempt = 1u32;

    loop {
        match operation(attempt).await {
            Ok(value) => {
                if attempt > 1 {
                    tracing::info!(url, attempt, "extraction succeeded after retry");
                }
                return Ok(value);
            }
            Err(err) => {
                if !err.is_retriable() || attempt >= max_attempts {
                    tracing::warn!(
                        url,
                        attempt,
                        max_attempts,
                        kind = %err.kind(),
                        error = %err,
                        "extraction failed; giving up"
                    );
                    return Err(err);
                }

                let delay = backoff_delay(attempt, policy);
                tracing::warn!(
                    url,
                    attempt,
                    max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    kind = %err.kind(),
                    error = %err,
                    "extraction attempt failed; retrying after back-off"
                );
                pause(delay, cancel, url).await?;
                attempt += 1;
            }
        }
    }
}
