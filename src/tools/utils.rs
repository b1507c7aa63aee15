use crate::error::{BrowserError, Result};
use crate::report::is_absolute_http_url;

/// Schemes passed through untouched. Only http(s) survive validation.
const KNOWN_SCHEMES: &[&str] = &["http://", "https://", "file://", "data:", "about:", "chrome://", "javascript:"];

/// Add a missing scheme to a user-supplied target
///
/// `localhost` and loopback addresses get `http://`, anything else that looks
/// like a host gets `https://`.
pub fn normalize_url(url: &str) -> String {
    let trimmed = url.trim();

    let lowered = trimmed.to_ascii_lowercase();
    if KNOWN_SCHEMES.iter().any(|scheme| lowered.starts_with(scheme)) {
        return trimmed.to_string();
    }

    // Protocol-relative
    if let Some(rest) = trimmed.strip_prefix("//") {
        return format!("https://{}", rest);
    }

    if lowered.starts_with("localhost") || lowered.starts_with("127.0.0.1") || lowered.starts_with("[::1]") {
        return format!("http://{}", trimmed);
    }

    if trimmed.is_empty() || trimmed.starts_with('/') || trimmed.contains(char::is_whitespace) {
        return trimmed.to_string();
    }

    format!("https://{}", trimmed)
}

/// Normalize `url` and reject anything that is not an absolute http(s) URL
pub fn resolve_target(url: &str) -> Result<String> {
    let normalized = normalize_url(url);
    if is_absolute_http_url(&normalized) {
        Ok(normalized)
    } else {
        Err(BrowserError::InvalidUrl(url.trim().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_url_complete() {
        assert_eq!(normalize_url("https://example.com"), "https://example.com");
        assert_eq!(normalize_url("http://example.com/path"), "http://example.com/path");
        assert_eq!(normalize_url("HTTPS://Example.com"), "HTTPS://Example.com");
    }

    #[test]
    fn test_normalize_url_missing_protocol() {
        assert_eq!(normalize_url("example.com"), "https://example.com");
        assert_eq!(normalize_url("example.com/watch?v=1"), "https://example.com/watch?v=1");
        assert_eq!(normalize_url("//cdn.example.com/a.mp4"), "https://cdn.example.com/a.mp4");
    }

    #[test]
    fn test_normalize_url_localhost() {
        assert_eq!(normalize_url("localhost:3000"), "http://localhost:3000");
        assert_eq!(normalize_url("127.0.0.1:8080/page"), "http://127.0.0.1:8080/page");
    }

    #[test]
    fn test_normalize_url_whitespace() {
        assert_eq!(normalize_url("  example.com  "), "https://example.com");
    }

    #[test]
    fn test_resolve_target() {
        assert_eq!(resolve_target("example.com").unwrap(), "https://example.com");
        assert!(matches!(resolve_target("about:blank"), Err(BrowserError::InvalidUrl(_))));
        assert!(matches!(resolve_target("data:text/html,<p>"), Err(BrowserError::InvalidUrl(_))));
        assert!(matches!(resolve_target("/relative"), Err(BrowserError::InvalidUrl(_))));
        assert!(matches!(resolve_target("two words"), Err(BrowserError::InvalidUrl(_))));
        assert!(matches!(resolve_target(""), Err(BrowserError::InvalidUrl(_))));
    }

    #[test]
    fn test_resolve_target_rejects_malformed_hosts() {
        for input in ["https://exa mple.com", "http://[::1", "https://%%%"] {
            assert!(
                matches!(resolve_target(input), Err(BrowserError::InvalidUrl(_))),
                "{input} should be rejected"
            );
        }
    }
}
