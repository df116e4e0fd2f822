//! Queryable document adapter over `scraper`
//!
//! The extraction strategies only need four capabilities: select the first
//! match of a CSS selector, select all elements of a tag, read an attribute,
//! and read text content. This adapter exposes exactly those, so the strategy
//! tables never touch `scraper` types directly.

use scraper::{ElementRef, Html, Selector};

/// A parsed HTML document
///
/// Owned by a single extraction call. `scraper::Html` is not `Send`, so a
/// document never crosses an await point or a thread boundary.
pub struct ParsedDocument {
    html: Html,
}

/// An element inside a [`ParsedDocument`]
#[derive(Clone, Copy)]
pub struct Node<'a> {
    element: ElementRef<'a>,
}

impl ParsedDocument {
    /// Parses markup leniently; malformed HTML still yields a document
    pub fn parse(markup: &str) -> Self {
        Self {
            html: Html::parse_document(markup),
        }
    }

    /// Returns the first element matching a CSS selector
    ///
    /// An unparseable selector matches nothing.
    pub fn select_first(&self, selector: &str) -> Option<Node<'_>> {
        let selector = parse_selector(selector)?;
        self.html
            .select(&selector)
            .next()
            .map(|element| Node { element })
    }

    /// Returns every element with the given tag name, in document order
    pub fn select_all(&self, tag: &str) -> Vec<Node<'_>> {
        match parse_selector(tag) {
            Some(selector) => self
                .html
                .select(&selector)
                .map(|element| Node { element })
                .collect(),
            None => Vec::new(),
        }
    }
}

impl<'a> Node<'a> {
    /// Reads an attribute value
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.element.value().attr(name)
    }

    /// Concatenated text content of the element and its descendants
    pub fn text(&self) -> String {
        self.element.text().collect()
    }
}

fn parse_selector(selector: &str) -> Option<Selector> {
    match Selector::parse(selector) {
        Ok(selector) => Some(selector),
        Err(e) => {
            tracing::warn!(selector, error = ?e, "ignoring invalid selector");
            None
        }
    }
}
