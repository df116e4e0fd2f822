//! Induced delays: pre-fetch pacing and retry backoff
//!
//! Both delays race the request's cancellation token, so an expired deadline
//! interrupts a sleep instead of waiting it out.

use crate::config::RetryConfig;
use crate::ExtractionError;
use rand::Rng;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Uniformly random duration in `[min_ms, max_ms]`
pub fn random_between(min_ms: u64, max_ms: u64) -> Duration {
    if max_ms <= min_ms {
        return Duration::from_millis(min_ms);
    }
    Duration::from_millis(rand::rng().random_range(min_ms..=max_ms))
}

/// Delay inserted before every page fetch
pub fn pacing_delay(policy: &RetryConfig) -> Duration {
    random_between(policy.pacing_min_ms, policy.pacing_max_ms)
}

/// Backoff after failed attempt number `attempt` (1-based)
///
/// `backoff_base_ms * 2^attempt` plus jitter in `[0, jitter_max_ms]`. With
/// the defaults that is 2–3 s after the first failure and 4–5 s after the
/// second.
pub fn backoff_delay(attempt: u32, policy: &RetryConfig) -> Duration {
    let exponential = policy
        .backoff_base_ms
        .saturating_mul(1u64 << attempt.min(16));
    Duration::from_millis(exponential) + random_between(0, policy.jitter_max_ms)
}

/// Sleeps for `duration` unless `cancel` fires first
///
/// # Errors
///
/// Returns [`ExtractionError::Cancelled`] if the token is (or becomes) cancelled.
pub async fn pause(
    duration: Duration,
    cancel: &CancellationToken,
    url: &str,
) -> Result<(), ExtractionError> {
    if cancel.is_cancelled() {
        return Err(ExtractionError::Cancelled {
            url: url.to_string(),
        });
    }

    if duration.is_zero() {
        return Ok(());
    }

    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(ExtractionError::Cancelled { url: url.to_string() }),
        _ = tokio::time::sleep(duration) => Ok(()),
    }
}
