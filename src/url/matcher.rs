/// Checks whether a host carries one of the given site markers
///
/// Matching is a case-insensitive substring test, so the marker `"amazon."`
/// covers every regional storefront (`www.amazon.com`, `amazon.co.uk`,
/// `smile.amazon.de`) without enumerating them.
///
/// # Examples
///
/// ```
/// use product_snap::url::matches_marker;
///
/// let markers = vec!["amazon.".to_string()];
/// assert!(matches_marker("www.amazon.co.uk", &markers));
/// assert!(matches_marker("WWW.AMAZON.COM", &markers));
/// assert!(!matches_marker("example.com", &markers));
/// ```
pub fn matches_marker(host: &str, markers: &[String]) -> bool {
    let host = host.to_lowercase();
    markers
        .iter()
        .any(|marker| !marker.is_empty() && host.contains(&marker.to_lowercase()))
}
