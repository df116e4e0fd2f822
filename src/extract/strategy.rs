//! Ordered "first success wins" evaluation
//!
//! Every fallback chain in the extractor is a table of strategy descriptors.
//! Adding a strategy means adding a row; the runner below is the only place
//! that walks a chain.

/// A strategy descriptor that can name itself in logs
pub trait Describe {
    fn describe(&self) -> String;
}

impl Describe for &str {
    fn describe(&self) -> String {
        (*self).to_string()
    }
}

/// Runs `attempt` over `strategies` in order and returns the first `Some`
///
/// Later strategies are not evaluated once one succeeds.
pub fn first_success<S, T, F>(chain: &str, strategies: &[S], mut attempt: F) -> Option<T>
where
    S: Describe,
    F: FnMut(&S) -> Option<T>,
{
    for strategy in strategies {
        if let Some(value) = attempt(strategy) {
            tracing::debug!(chain, strategy = %strategy.describe(), "strategy matched");
            return Some(value);
        }
        tracing::trace!(chain, strategy = %strategy.describe(), "strategy yielded nothing");
    }

    tracing::debug!(chain, "every strategy exhausted");
    None
}
