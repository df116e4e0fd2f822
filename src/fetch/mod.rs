//! Fetch module for product page retrieval
//!
//! This module contains everything that touches the network for a page:
//! - Building the shared, pooled HTTP client
//! - Rotating browser client identities
//! - Single-shot page fetching with response classification
//! - Challenge-page detection on fetched bodies

mod client;
mod detector;
mod fetcher;

pub use client::{browser_headers, build_http_client, random_user_agent, USER_AGENTS};
pub use detector::{Detector, Verdict};
pub use fetcher::{FailureCause, FetchOutcome, Fetcher};
