//! Best-effort discovery of media URLs inside response text.
//!
//! This is a text heuristic, not a JSON parse. It sits behind [`UrlSniffer`]
//! so a structural scanner can replace it without touching the bridge.

use crate::media::classify::media_extensions;
use once_cell::sync::Lazy;
use regex::Regex;

/// Finds media URLs embedded in arbitrary text
pub trait UrlSniffer: Send + Sync {
    /// Return every media URL found in `text`, in order of appearance
    fn find_urls(&self, text: &str) -> Vec<String>;
}

static MEDIA_URL_IN_TEXT: Lazy<Regex> = Lazy::new(|| {
    let pattern = format!(
        r#"(?i)(https?://[^\s"'<>\\?#]+\.(?:{})(?:\?[^\s"'<>\\#]*)?)(?:[\s"'<>\\#,;)\]}}]|$)"#,
        media_extensions().join("|")
    );
    Regex::new(&pattern).unwrap_or_else(|e| panic!("invalid media URL pattern {pattern}: {e}"))
});

static UNICODE_AMPERSAND: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\\u0026").unwrap_or_else(|e| panic!("invalid escape pattern: {e}")));

/// Regex-based sniffer used by default
///
/// JSON-escaped slashes (`\/`) and ampersands (`\u0026`) are unescaped before
/// matching. A query string directly following the extension is kept, and the
/// URL must end at a delimiter so `a.png.example.com` is not cut short.
#[derive(Debug, Clone)]
pub struct RegexSniffer {
    pattern: Regex,
}

impl RegexSniffer {
    pub fn new() -> Self {
        Self {
            pattern: MEDIA_URL_IN_TEXT.clone(),
        }
    }

    /// Use a custom pattern. The first capture group is reported when the
    /// pattern has one, otherwise the whole match.
    pub fn with_pattern(pattern: Regex) -> Self {
        Self { pattern }
    }
}

impl Default for RegexSniffer {
    fn default() -> Self {
        Self::new()
    }
}

impl UrlSniffer for RegexSniffer {
    fn find_urls(&self, text: &str) -> Vec<String> {
        let unescaped = text.replace(r"\/", "/");
        let unescaped = UNICODE_AMPERSAND.replace_all(&unescaped, "&");

        self.pattern
            .captures_iter(&unescaped)
            .filter_map(|caps| caps.get(1).or_else(|| caps.get(0)))
            .map(|m| m.as_str().to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finds_urls_in_json() {
        let text = r#"{"items":[{"src":"https://cdn.example/v/clip.mp4"},{"thumb":"https://img.example/t.JPG"}],"next":"https://api.example/page/2"}"#;
        let urls = RegexSniffer::new().find_urls(text);
        assert_eq!(
            urls,
            vec!["https://cdn.example/v/clip.mp4", "https://img.example/t.JPG"]
        );
    }

    #[test]
    fn test_keeps_query_string() {
        let text = r#"{"u":"https://cdn.example/a.m3u8?token=abc&exp=1"}"#;
        let urls = RegexSniffer::new().find_urls(text);
        assert_eq!(urls, vec!["https://cdn.example/a.m3u8?token=abc&exp=1"]);
    }

    #[test]
    fn test_unescapes_json_slashes_and_ampersands() {
        let text = r#"{"u":"https:\/\/video.example\/x\/y.webm?a=1\u0026b=2"}"#;
        let urls = RegexSniffer::new().find_urls(text);
        assert_eq!(urls, vec!["https://video.example/x/y.webm?a=1&b=2"]);
    }

    #[test]
    fn test_ignores_extension_prefixes() {
        let text = r#"["https://a.png.example.com/page", "https://b.example/x.mp4abc", "https://c.example/ok.gif"]"#;
        let urls = RegexSniffer::new().find_urls(text);
        assert_eq!(urls, vec!["https://c.example/ok.gif"]);
    }

    #[test]
    fn test_finds_every_classified_extension() {
        let text = r#"{"tracks":["https://a.example/t.flac","https://a.example/t.opus","https://a.example/t.m4a"],
            "clips":["https://v.example/c.mkv","https://v.example/c.mov?dl=1"],"art":"https://i.example/a.avif"}"#;
        let urls = RegexSniffer::new().find_urls(text);
        assert_eq!(
            urls,
            vec![
                "https://a.example/t.flac",
                "https://a.example/t.opus",
                "https://a.example/t.m4a",
                "https://v.example/c.mkv",
                "https://v.example/c.mov?dl=1",
                "https://i.example/a.avif"
            ]
        );
    }

    #[test]
    fn test_custom_pattern() {
        let sniffer = RegexSniffer::with_pattern(Regex::new(r"https://only\.example/\S+").unwrap());
        let urls = sniffer.find_urls("see https://only.example/a and https://other.example/b.mp4");
        assert_eq!(urls, vec!["https://only.example/a"]);
    }
}
