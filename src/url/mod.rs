//! URL handling module for Product-Snap
//!
//! This module decides whether a user-supplied URL belongs to the target site
//! family and turns short links into canonical product URLs.

mod matcher;
mod normalize;
mod resolve;

use crate::config::SiteConfig;
use crate::ExtractionError;

// Re-export main functions
pub use matcher::matches_marker;
pub use normalize::{normalize_url, CandidateUrl};
pub use resolve::Resolver;

/// How a candidate URL relates to the target site
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlClass {
    /// A product page URL, used as-is
    Product,
    /// A short link that must be followed to find the product page
    ShortLink,
}

/// The canonical product URL for one fetch attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    pub canonical_url: String,
}

/// Classifies a raw URL against the configured site markers
///
/// Short-link markers are checked first so a short link is always followed
/// even if its host also happens to carry a product marker. No network call
/// is made here; anything unrecognised fails with
/// [`ExtractionError::InvalidUrl`].
///
/// # Examples
///
/// ```
/// use product_snap::config::SiteConfig;
/// use product_snap::url::{classify_url, UrlClass};
///
/// let site = SiteConfig::default();
/// let (class, _) = classify_url("https://amzn.to/3xYz", &site).unwrap();
/// assert_eq!(class, UrlClass::ShortLink);
///
/// assert!(classify_url("https://example.com/item", &site).is_err());
/// ```
pub fn classify_url(
    raw_url: &str,
    site: &SiteConfig,
) -> Result<(UrlClass, CandidateUrl), ExtractionError> {
    let candidate = normalize_url(raw_url).map_err(|e| {
        tracing::debug!(url = raw_url, error = %e, "rejecting unparseable URL");
        ExtractionError::InvalidUrl {
            url: raw_url.to_string(),
        }
    })?;

    let host = candidate.host();

    if matches_marker(&host, &site.short_link_markers) {
        return Ok((UrlClass::ShortLink, candidate));
    }

    if matches_marker(&host, &site.host_markers) {
        return Ok((UrlClass::Product, candidate));
    }

    tracing::debug!(url = raw_url, host = %host, "host is not part of the target site");
    Err(ExtractionError::InvalidUrl {
        url: raw_url.to_string(),
    })
}
