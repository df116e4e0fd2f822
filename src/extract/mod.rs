//! Extraction engine
//!
//! Turns a fetched product page into [`ProductData`]:
//! - Title via an ordered selector chain (falls back to a sentinel)
//! - Image via structural selectors, inline script mining, then a raw-text sweep
//! - Size-token cleanup on the chosen image URL
//!
//! A missing title is cosmetic; a missing image fails the extraction, since
//! the image is the whole point of the record.

mod cleanup;
mod document;
mod image;
mod strategy;
mod title;

pub use cleanup::{cleanup_image_url, decode_unicode_escapes};
pub use document::{Node, ParsedDocument};
pub use image::{
    find_image_url, is_absolute_http, ImageStrategy, ScriptPattern, SelectorStrategy,
    IMAGE_ATTRIBUTES, IMAGE_CHAIN, IMAGE_SELECTORS, SCRIPT_PATTERNS,
};
pub use strategy::{first_success, Describe};
pub use title::{extract_title, TITLE_SELECTORS, UNKNOWN_TITLE};

use crate::ExtractionError;
use serde::{Deserialize, Serialize};

/// Structured product data extracted from one page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductData {
    /// Product title, or [`UNKNOWN_TITLE`]; never empty
    pub title: String,

    /// Absolute, scheme-qualified URL of the primary image
    pub image_url: String,

    /// Canonical product page URL the data came from
    pub amazon_url: String,
}

/// Runs both extraction chains over a parsed document
///
/// # Errors
///
/// Returns [`ExtractionError::NoImageFound`] if every image strategy fails.
pub fn extract(
    document: &ParsedDocument,
    raw_body: &str,
    canonical_url: &str,
) -> Result<ProductData, ExtractionError> {
    let title = extract_title(document);

    let image_url = find_image_url(document, raw_body)
        .map(|url| cleanup_image_url(&url))
        .ok_or_else(|| ExtractionError::NoImageFound {
            url: canonical_url.to_string(),
        })?;

    Ok(ProductData {
        title,
        image_url,
        amazon_url: canonical_url.to_string(),
    })
}

/// Parses `markup` and extracts from it in one synchronous step
///
/// The parsed document is dropped before this returns, so callers in async
/// code never hold it across an await point.
pub fn extract_from_markup(
    markup: &str,
    canonical_url: &str,
) -> Result<ProductData, ExtractionError> {
    let document = ParsedDocument::parse(markup);
    extract(&document, markup, canonical_url)
}
