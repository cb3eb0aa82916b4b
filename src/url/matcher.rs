/// Checks if a host matches a pattern from `allowed-hosts`
///
/// Two kinds of patterns are supported:
/// 1. Exact: "zonerama.com" matches only "zonerama.com"
/// 2. Wildcard: "*.zonerama.com" matches "zonerama.com" itself and any
///    subdomain such as "eu.zonerama.com"
///
/// Comparison is ASCII case-insensitive.
///
/// # Examples
///
/// ```
/// use zonerama_scraper::url::host_matches;
///
/// assert!(host_matches("*.zonerama.com", "eu.zonerama.com"));
/// assert!(host_matches("*.zonerama.com", "ZONERAMA.com"));
/// assert!(!host_matches("*.zonerama.com", "notzonerama.com"));
/// assert!(!host_matches("zonerama.com", "eu.zonerama.com"));
/// ```
pub fn host_matches(pattern: &str, host: &str) -> bool {
    let host = host.to_ascii_lowercase();
    let pattern = pattern.to_ascii_lowercase();

    match pattern.strip_prefix("*.") {
        Some(base) => host == base || host.ends_with(&format!(".{}", base)),
        None => host == pattern,
    }
}

/// Returns true when any of the patterns accepts the host
pub fn host_allowed<S: AsRef<str>>(patterns: &[S], host: &str) -> bool {
    patterns
        .iter()
        .any(|pattern| host_matches(pattern.as_ref(), host))
}
