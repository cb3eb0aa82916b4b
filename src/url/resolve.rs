use url::Url;

/// Resolves an href/src/data-url value against the page it was found on
///
/// Returns None when the value should be ignored:
/// - empty or whitespace-only values
/// - fragment-only links (same page anchors)
/// - javascript:, mailto:, tel: and data: schemes
/// - anything that does not resolve to an HTTP(S) URL
///
/// # Examples
///
/// ```
/// use url::Url;
/// use zonerama_scraper::url::resolve_link;
///
/// let base = Url::parse("https://eu.zonerama.com/Someone/1234").unwrap();
/// assert_eq!(
///     resolve_link("/Someone/Album/42", &base).as_deref(),
///     Some("https://eu.zonerama.com/Someone/Album/42")
/// );
/// ```
pub fn resolve_link(raw: &str, base_url: &Url) -> Option<String> {
    let raw = raw.trim();

    if raw.is_empty() || raw.starts_with('#') {
        return None;
    }

    if raw.starts_with("javascript:")
        || raw.starts_with("mailto:")
        || raw.starts_with("tel:")
        || raw.starts_with("data:")
    {
        return None;
    }

    let absolute = base_url.join(raw).ok()?;
    match absolute.scheme() {
        "http" | "https" => Some(absolute.to_string()),
        _ => None,
    }
}

/// Returns the authority (host plus explicit port) of a page URL
///
/// Image links are built against the host that served the page, so regional
/// mirrors keep pointing at themselves.
pub fn page_authority(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    }
}
