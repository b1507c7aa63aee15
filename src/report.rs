//! Presentation helpers for callers that relay results to people
//!
//! These format an extraction outcome the way a chat front-end shows it: a
//! short numbered summary, the full JSON inline or as an attachment depending
//! on size, and a few images worth previewing.

use crate::error::Result;
use crate::media::{MediaKind, MediaResult};
use url::Url;

/// Results listed in a summary by default
pub const DEFAULT_SUMMARY_LIMIT: usize = 40;

/// JSON shorter than this is sent inline
pub const DEFAULT_INLINE_LIMIT: usize = 4000;

/// Images offered as previews
pub const DEFAULT_PREVIEW_COUNT: usize = 3;

/// File name used when results are delivered as an attachment
pub const ATTACHMENT_FILE_NAME: &str = "media-results.json";

const URL_DISPLAY_MAX: usize = 120;
const URL_DISPLAY_KEEP: usize = 110;

/// Whether `text` is an absolute http(s) URL worth handing to the extractor
pub fn is_absolute_http_url(text: &str) -> bool {
    let trimmed = text.trim();
    let Ok(parsed) = Url::parse(trimmed) else {
        return false;
    };
    if !matches!(parsed.scheme(), "http" | "https") {
        return false;
    }

    // The parser skips extra slashes, so `http:///path` would get host "path"
    let has_authority = matches!(trimmed.split_once("://"), Some((_, rest)) if !rest.starts_with('/'));
    has_authority && parsed.host_str().is_some_and(|host| !host.is_empty())
}

/// Shorten long URLs for display
pub fn shorten_url(url: &str) -> String {
    if url.chars().count() > URL_DISPLAY_MAX {
        let mut short: String = url.chars().take(URL_DISPLAY_KEEP).collect();
        short.push('…');
        short
    } else {
        url.to_string()
    }
}

/// Numbered summary of the first `limit` results
pub fn render_summary(target: &str, results: &[MediaResult], limit: usize) -> String {
    if results.is_empty() {
        return format!("No media links found for:\n{}", target);
    }

    let lines: Vec<String> = results
        .iter()
        .take(limit)
        .enumerate()
        .map(|(i, result)| {
            format!(
                "{}. [{}] ({})\n   {}",
                i + 1,
                result.kind.as_str().to_uppercase(),
                result.source,
                shorten_url(&result.url)
            )
        })
        .collect();

    let mut summary = format!("Results for: {}\n\n{}", target, lines.join("\n\n"));
    if results.len() > limit {
        summary.push_str(&format!("\n\n... and {} more", results.len() - limit));
    }
    summary
}

/// How the full result list should be delivered
#[derive(Debug, Clone, PartialEq)]
pub enum Delivery {
    /// Short enough to send as a message
    Inline(String),

    /// Too long for a message; send as a file
    Attachment {
        file_name: String,
        contents: String,
        caption: String,
    },
}

/// Serialize `results` as pretty JSON and choose inline or attachment delivery
pub fn plan_delivery(results: &[MediaResult], inline_limit: usize) -> Result<Delivery> {
    let json = serde_json::to_string_pretty(results)?;

    if json.chars().count() < inline_limit {
        Ok(Delivery::Inline(json))
    } else {
        Ok(Delivery::Attachment {
            file_name: ATTACHMENT_FILE_NAME.to_string(),
            contents: json,
            caption: format!("Full results ({} items)", results.len()),
        })
    }
}

/// The first `count` image results, in result order
pub fn preview_candidates(results: &[MediaResult], count: usize) -> Vec<&MediaResult> {
    results
        .iter()
        .filter(|r| r.kind == MediaKind::Image)
        .take(count)
        .collect()
}

/// Caption shown under a previewed image
pub fn preview_caption(result: &MediaResult) -> String {
    format!("{} - {}", result.kind, result.source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::{CaptureRecord, normalize};

    fn results(urls: &[&str]) -> Vec<MediaResult> {
        normalize(urls.iter().map(|u| CaptureRecord::new(*u, "network-response")))
    }

    #[test]
    fn test_absolute_http_url() {
        assert!(is_absolute_http_url("https://example.com/watch?v=1"));
        assert!(is_absolute_http_url("HTTP://EXAMPLE.COM"));
        assert!(is_absolute_http_url("  https://example.com  "));
        assert!(!is_absolute_http_url("example.com"));
        assert!(!is_absolute_http_url("ftp://example.com"));
        assert!(!is_absolute_http_url("https://"));
        assert!(!is_absolute_http_url("http:///path"));
        assert!(!is_absolute_http_url(""));
    }

    #[test]
    fn test_malformed_urls_are_not_absolute() {
        assert!(!is_absolute_http_url("https://exa mple.com"));
        assert!(!is_absolute_http_url("http://[::1"));
        assert!(!is_absolute_http_url("https://%%%"));
        assert!(!is_absolute_http_url("http:example.com"));
        assert!(is_absolute_http_url("http://[::1]:8080/"));
    }

    #[test]
    fn test_shorten_url() {
        let short = "https://cdn.example/a.png";
        assert_eq!(shorten_url(short), short);

        let long = format!("https://cdn.example/{}", "x".repeat(150));
        let shortened = shorten_url(&long);
        assert_eq!(shortened.chars().count(), 111);
        assert!(shortened.ends_with('…'));

        let exactly_max = "y".repeat(120);
        assert_eq!(shorten_url(&exactly_max), exactly_max);
    }

    #[test]
    fn test_render_summary() {
        let results = results(&["https://cdn.example/a.png", "https://cdn.example/b.mp3"]);
        let summary = render_summary("https://page.example", &results, DEFAULT_SUMMARY_LIMIT);

        assert!(summary.starts_with("Results for: https://page.example\n\n"));
        assert!(summary.contains("1. [IMAGE] (network-response)\n   https://cdn.example/a.png"));
        assert!(summary.contains("2. [AUDIO] (network-response)\n   https://cdn.example/b.mp3"));
        assert!(!summary.contains("more"));
    }

    #[test]
    fn test_render_summary_limit() {
        let urls: Vec<String> = (0..5).map(|i| format!("https://cdn.example/{}.jpg", i)).collect();
        let refs: Vec<&str> = urls.iter().map(String::as_str).collect();
        let summary = render_summary("https://page.example", &results(&refs), 2);

        assert!(summary.contains("2. [IMAGE]"));
        assert!(!summary.contains("3. [IMAGE]"));
        assert!(summary.ends_with("... and 3 more"));
    }

    #[test]
    fn test_render_summary_empty() {
        assert_eq!(
            render_summary("https://page.example", &[], DEFAULT_SUMMARY_LIMIT),
            "No media links found for:\nhttps://page.example"
        );
    }

    #[test]
    fn test_plan_delivery_inline() {
        let results = results(&["https://cdn.example/a.png"]);
        match plan_delivery(&results, DEFAULT_INLINE_LIMIT).unwrap() {
            Delivery::Inline(json) => {
                let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
                assert_eq!(parsed[0]["type"], "image");
                assert_eq!(parsed[0]["url"], "https://cdn.example/a.png");
            }
            other => panic!("expected inline delivery, got {:?}", other),
        }
    }

    #[test]
    fn test_plan_delivery_attachment() {
        let urls: Vec<String> = (0..60).map(|i| format!("https://cdn.example/image-{}.webp", i)).collect();
        let refs: Vec<&str> = urls.iter().map(String::as_str).collect();

        match plan_delivery(&results(&refs), DEFAULT_INLINE_LIMIT).unwrap() {
            Delivery::Attachment {
                file_name,
                contents,
                caption,
            } => {
                assert_eq!(file_name, "media-results.json");
                assert_eq!(caption, "Full results (60 items)");
                assert!(contents.len() >= DEFAULT_INLINE_LIMIT);
            }
            other => panic!("expected attachment, got {:?}", other),
        }
    }

    #[test]
    fn test_preview_candidates() {
        let results = results(&[
            "https://cdn.example/v.mp4",
            "https://cdn.example/1.png",
            "https://cdn.example/2.gif",
            "https://cdn.example/a.mp3",
            "https://cdn.example/3.jpg",
            "https://cdn.example/4.webp",
        ]);
        let previews = preview_candidates(&results, DEFAULT_PREVIEW_COUNT);
        let urls: Vec<&str> = previews.iter().map(|r| r.url.as_str()).collect();

        assert_eq!(
            urls,
            vec!["https://cdn.example/1.png", "https://cdn.example/2.gif", "https://cdn.example/3.jpg"]
        );
        assert_eq!(preview_caption(previews[0]), "image - network-response");
    }
}
