use crate::extract::document::ParsedDocument;
use crate::extract::strategy::first_success;

/// Title returned when no selector yields text
pub const UNKNOWN_TITLE: &str = "Unknown Product";

/// Title selectors, most specific first
///
/// The dedicated title element first, then class names used by alternate
/// page templates, then structural guesses.
pub const TITLE_SELECTORS: &[&str] = &[
    "#productTitle",
    ".product-title",
    "[data-automation-id='product-title']",
    "h1.a-size-large",
    "h1 span",
];

/// Extracts the product title, falling back to [`UNKNOWN_TITLE`]
///
/// Whitespace is trimmed and runs of inner whitespace (Amazon wraps long
/// titles across lines) collapse to single spaces. Never returns an empty
/// string.
pub fn extract_title(document: &ParsedDocument) -> String {
    first_success("title", TITLE_SELECTORS, |selector| {
        let node = document.select_first(selector)?;
        let text = collapse_whitespace(&node.text());
        (!text.is_empty()).then_some(text)
    })
    .unwrap_or_else(|| UNKNOWN_TITLE.to_string())
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
