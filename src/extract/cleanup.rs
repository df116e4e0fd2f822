//! Image URL post-processing

use regex::Regex;
use std::sync::LazyLock;

/// Size-restriction directive such as `._SX300_` or `._SL1500_`, plus the
/// extension dot that follows it when the directive ends the file name
static SIZE_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\._[A-Z]{2}\d+_\.?").expect("valid regex"));

/// Strips size-restriction tokens so the URL requests the original asset
///
/// `https://m.media-amazon.com/images/I/71abc._SX300_.jpg` becomes
/// `https://m.media-amazon.com/images/I/71abc.jpg`. The rewrite repeats until
/// no token remains (removing one token can expose another), which makes it
/// idempotent. Each pass shortens the string, so the loop terminates.
///
/// # Examples
///
/// ```
/// use product_snap::extract::cleanup_image_url;
///
/// let url = "https://m.media-amazon.com/images/I/71abc._SX300_.jpg";
/// assert_eq!(cleanup_image_url(url), "https://m.media-amazon.com/images/I/71abc.jpg");
/// assert_eq!(cleanup_image_url(&cleanup_image_url(url)), cleanup_image_url(url));
/// ```
pub fn cleanup_image_url(url: &str) -> String {
    let mut current = url.to_string();
    while SIZE_TOKEN_RE.is_match(&current) {
        current = SIZE_TOKEN_RE.replace_all(&current, ".").into_owned();
    }
    current
}

/// Decodes `\uXXXX` escapes left in URLs lifted out of inline JSON
///
/// `https:\u002F\u002Fm.media-amazon.com` becomes `https://m.media-amazon.com`.
/// Escaped surrogate pairs are combined; a lone surrogate becomes U+FFFD.
/// Anything that is not a complete four-hex-digit escape is copied through.
pub fn decode_unicode_escapes(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut units: Vec<u16> = Vec::new();
    let mut rest = input;

    while !rest.is_empty() {
        if let Some(unit) = parse_escape(rest) {
            units.push(unit);
            rest = &rest[6..];
            continue;
        }

        flush_units(&mut units, &mut output);

        let mut chars = rest.chars();
        if let Some(c) = chars.next() {
            output.push(c);
        }
        rest = chars.as_str();
    }

    flush_units(&mut units, &mut output);
    output
}

/// Parses a leading `\uXXXX` escape into its UTF-16 code unit
fn parse_escape(s: &str) -> Option<u16> {
    let hex = s.strip_prefix("\\u")?.get(..4)?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    u16::from_str_radix(hex, 16).ok()
}

fn flush_units(units: &mut Vec<u16>, output: &mut String) {
    if units.is_empty() {
        return;
    }
    output.extend(
        char::decode_utf16(units.drain(..)).map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER)),
    );
}
