//! Primary image extraction
//!
//! Three strategies, tried in order:
//! 1. Structural selectors over known image elements and attributes
//! 2. Regex mining of inline `<script>` data blobs
//! 3. A raw-text sweep of the whole body for media-host image URLs
//!
//! Each level is itself a table, so a new selector, attribute, or pattern is
//! one more row.

use crate::extract::cleanup::decode_unicode_escapes;
use crate::extract::document::ParsedDocument;
use crate::extract::strategy::{first_success, Describe};
use regex::Regex;
use std::sync::LazyLock;

/// Attributes checked on each image element, high-resolution overrides first
pub const IMAGE_ATTRIBUTES: &[&str] = &["data-old-hires", "data-a-hires", "src", "data-src"];

/// An element selector and the attributes that may hold its image URL
#[derive(Debug, Clone, Copy)]
pub struct SelectorStrategy {
    pub selector: &'static str,
    pub attributes: &'static [&'static str],
}

/// Elements known to host the primary product image
pub const IMAGE_SELECTORS: &[SelectorStrategy] = &[
    SelectorStrategy {
        selector: "#landingImage",
        attributes: IMAGE_ATTRIBUTES,
    },
    SelectorStrategy {
        selector: "#imgBlkFront",
        attributes: IMAGE_ATTRIBUTES,
    },
    SelectorStrategy {
        selector: "#ebooksImgBlkFront",
        attributes: IMAGE_ATTRIBUTES,
    },
    SelectorStrategy {
        selector: ".a-dynamic-image",
        attributes: IMAGE_ATTRIBUTES,
    },
    SelectorStrategy {
        selector: "[data-old-hires]",
        attributes: IMAGE_ATTRIBUTES,
    },
    SelectorStrategy {
        selector: ".a-image-wrapper img",
        attributes: IMAGE_ATTRIBUTES,
    },
];

/// A regex over inline script text and the transform applied to its capture
pub struct ScriptPattern {
    pub name: &'static str,
    pub regex: Regex,
    pub post: fn(&str) -> String,
}

/// Patterns for image URLs embedded in inline script data, in priority order
pub static SCRIPT_PATTERNS: LazyLock<Vec<ScriptPattern>> = LazyLock::new(|| {
    [
        ("large", r#""large":"([^"]+)""#),
        ("hiRes", r#""hiRes":"([^"]+)""#),
        ("main", r#""main":\{"[^"]+":"([^"]+)""#),
        ("colorImages", r#"colorImages[^{]*\{[^{]*"large":"([^"]+)""#),
    ]
    .into_iter()
    .map(|(name, pattern)| ScriptPattern {
        name,
        regex: Regex::new(pattern).expect("valid regex"),
        post: decode_unicode_escapes,
    })
    .collect()
});

/// Image URLs on the media-hosting domain anywhere in the raw body
static MEDIA_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)https://[^"'\s]*\.media-amazon\.com[^"'\s]*\.(?:jpg|jpeg|png|webp)"#)
        .expect("valid regex")
});

/// Marker carried by resized (often thumbnail) variants
const THUMBNAIL_MARKER: &str = "._AC_";

/// Sub-tokens that make a resized variant an explicit large rendition
const LARGE_SIZE_MARKERS: &[&str] = &["._AC_SL", "._AC_UL"];

/// The top-level image strategies, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageStrategy {
    StructuralSelectors,
    EmbeddedScript,
    RawTextSweep,
}

pub const IMAGE_CHAIN: &[ImageStrategy] = &[
    ImageStrategy::StructuralSelectors,
    ImageStrategy::EmbeddedScript,
    ImageStrategy::RawTextSweep,
];

impl Describe for ImageStrategy {
    fn describe(&self) -> String {
        match self {
            Self::StructuralSelectors => "structural-selectors",
            Self::EmbeddedScript => "embedded-script",
            Self::RawTextSweep => "raw-text-sweep",
        }
        .to_string()
    }
}

impl Describe for SelectorStrategy {
    fn describe(&self) -> String {
        self.selector.to_string()
    }
}

impl Describe for ScriptPattern {
    fn describe(&self) -> String {
        self.name.to_string()
    }
}

impl ImageStrategy {
    /// Runs this strategy; `None` means "try the next one"
    pub fn run(&self, document: &ParsedDocument, raw_body: &str) -> Option<String> {
        match self {
            Self::StructuralSelectors => from_selectors(document),
            Self::EmbeddedScript => from_scripts(document),
            Self::RawTextSweep => from_raw_text(raw_body),
        }
    }
}

/// Finds the primary image URL (before size cleanup)
pub fn find_image_url(document: &ParsedDocument, raw_body: &str) -> Option<String> {
    first_success("image", IMAGE_CHAIN, |strategy| {
        strategy.run(document, raw_body)
    })
}

/// True for absolute URLs on a network scheme
pub fn is_absolute_http(url: &str) -> bool {
    let lower = url.get(..8).unwrap_or(url).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Strategy 1: first absolute URL among the known elements' attributes
///
/// Only the first element each selector matches is inspected.
fn from_selectors(document: &ParsedDocument) -> Option<String> {
    first_success("image-selector", IMAGE_SELECTORS, |strategy| {
        let node = document.select_first(strategy.selector)?;
        strategy.attributes.iter().find_map(|attr| {
            node.attr(attr)
                .map(str::trim)
                .filter(|value| is_absolute_http(value))
                .map(str::to_string)
        })
    })
}

/// Strategy 2: first pattern hit in any inline script, script by script
fn from_scripts(document: &ParsedDocument) -> Option<String> {
    document.select_all("script").into_iter().find_map(|script| {
        let content = script.text();
        first_success("image-script", SCRIPT_PATTERNS.as_slice(), |pattern| {
            let captured = pattern.regex.captures(&content)?.get(1)?.as_str();
            let url = (pattern.post)(captured);
            is_absolute_http(&url).then_some(url)
        })
    })
}

/// Strategy 3: first media-host image URL that is not a thumbnail variant
fn from_raw_text(raw_body: &str) -> Option<String> {
    MEDIA_URL_RE
        .find_iter(raw_body)
        .map(|m| m.as_str())
        .find(|url| !is_thumbnail(url))
        .map(str::to_string)
}

/// True for resized variants without an explicit large-size sub-token
fn is_thumbnail(url: &str) -> bool {
    url.contains(THUMBNAIL_MARKER) && !LARGE_SIZE_MARKERS.iter().any(|m| url.contains(m))
}
