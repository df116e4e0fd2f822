use crate::{UrlError, UrlResult};
use url::Url;

/// A user-supplied URL that parsed as an absolute HTTP(S) address
#[derive(Debug, Clone)]
pub struct CandidateUrl {
    /// The URL text as it will be requested
    pub text: String,

    /// Parsed form, used for host inspection
    pub parsed: Url,
}

impl CandidateUrl {
    /// Returns the lowercase host
    pub fn host(&self) -> String {
        self.parsed
            .host_str()
            .map(|h| h.to_lowercase())
            .unwrap_or_default()
    }
}

/// Turns raw user input into a requestable URL
///
/// # Normalization Steps
///
/// 1. Trim surrounding whitespace; reject empty input
/// 2. Prefix `https://` when no scheme is given (pasted `www.amazon.com/dp/...`)
/// 3. Parse; reject if malformed, non-HTTP(S), or hostless
///
/// Otherwise the text is left as the user gave it: path, query, and fragment
/// all pass through, since product pages are addressed by them.
///
/// # Examples
///
/// ```
/// use product_snap::url::normalize_url;
///
/// let url = normalize_url("  www.amazon.com/dp/B000  ").unwrap();
/// assert_eq!(url.text, "https://www.amazon.com/dp/B000");
/// ```
pub fn normalize_url(raw: &str) -> UrlResult<CandidateUrl> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(UrlError::Parse("empty URL".to_string()));
    }

    let text = if has_scheme(trimmed) {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    let parsed = Url::parse(&text).map_err(|e| UrlError::Parse(e.to_string()))?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            parsed.scheme()
        )));
    }

    match parsed.host_str() {
        Some(host) if !host.is_empty() => {}
        _ => return Err(UrlError::MissingDomain),
    }

    Ok(CandidateUrl { text, parsed })
}

/// True if the input starts with `<scheme>:` per RFC 3986
fn has_scheme(input: &str) -> bool {
    match input.find(':') {
        Some(idx) if idx > 0 => {
            let scheme = &input[..idx];
            let mut chars = scheme.chars();
            chars.next().is_some_and(|c| c.is_ascii_alphabetic())
                && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
                // "host:port/path" has digits after the colon, not "//"
                && input[idx + 1..].starts_with("//")
        }
        _ => false,
    }
}
