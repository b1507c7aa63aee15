//! Classification rules shared by the host-side normalizer and the injected
//! page script.
//!
//! The page script is generated from these constants (see
//! [`crate::capture::script`]), so the browser and the host always agree on
//! what counts as a media URL or media content type.

use crate::media::record::MediaKind;
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use url::Url;

pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "m3u8", "mkv", "mov", "m4v", "mpd"];
pub const AUDIO_EXTENSIONS: &[&str] = &["mp3", "aac", "ogg", "opus", "wav", "flac", "m4a"];
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "webp", "avif"];

/// Streaming-manifest MIME types. Written in the common subset of Rust and
/// JavaScript regex syntax.
pub const MANIFEST_CONTENT_TYPE_PATTERN: &str = r"m3u8|mpegurl|application/vnd\.apple\.mpegurl|dash\+xml";

/// Hostname fragments of high-value media hosts; matching URLs sort first
pub const PRIORITY_DOMAINS: &[&str] = &[
    "youtube.com",
    "youtu.be",
    "scontent",
    "cdninstagram",
    "fbcdn.net",
    "facebook.com",
    "twitter.com",
    "twimg.com",
    "soundcloud.com",
    "vimeo.com",
    "googlevideo.com",
    "play.google.com",
];

/// Query parameters carrying byte ranges of a partial fetch
const BYTE_RANGE_PARAMS: &[&str] = &["bytestart", "byteend"];

/// Build an extension pattern for the given list. The extension must be
/// followed by the end of the string or a `?`, `#` or `&`.
fn extension_pattern(extensions: &[&str]) -> String {
    format!(r"\.(?:{})(?:$|[?#&])", extensions.join("|"))
}

/// Every known media extension: video, then audio, then image
pub fn media_extensions() -> Vec<&'static str> {
    VIDEO_EXTENSIONS
        .iter()
        .chain(AUDIO_EXTENSIONS)
        .chain(IMAGE_EXTENSIONS)
        .copied()
        .collect()
}

/// Pattern matching any known media extension, shared with the page script
pub fn media_extension_pattern() -> String {
    extension_pattern(&media_extensions())
}

fn case_insensitive(pattern: &str) -> Regex {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .unwrap_or_else(|e| panic!("invalid built-in pattern {pattern}: {e}"))
}

static MEDIA_EXT_RE: Lazy<Regex> = Lazy::new(|| case_insensitive(&media_extension_pattern()));
static VIDEO_EXT_RE: Lazy<Regex> = Lazy::new(|| case_insensitive(&extension_pattern(VIDEO_EXTENSIONS)));
static AUDIO_EXT_RE: Lazy<Regex> = Lazy::new(|| case_insensitive(&extension_pattern(AUDIO_EXTENSIONS)));
static IMAGE_EXT_RE: Lazy<Regex> = Lazy::new(|| case_insensitive(&extension_pattern(IMAGE_EXTENSIONS)));
static MANIFEST_RE: Lazy<Regex> = Lazy::new(|| case_insensitive(MANIFEST_CONTENT_TYPE_PATTERN));

/// True when the URL ends in (or carries before its query) a known media extension
pub fn has_media_extension(url: &str) -> bool {
    MEDIA_EXT_RE.is_match(url)
}

/// True for streaming-manifest MIME types (HLS, DASH)
pub fn is_manifest_content_type(content_type: &str) -> bool {
    MANIFEST_RE.is_match(content_type)
}

/// True when a content type identifies media worth recording
pub fn is_media_content_type(content_type: &str) -> bool {
    let lower = content_type.to_ascii_lowercase();
    lower.contains("video")
        || lower.contains("audio")
        || lower.contains("image")
        || is_manifest_content_type(&lower)
}

/// Kind implied by a MIME type prefix
pub fn kind_from_content_type(content_type: &str) -> Option<MediaKind> {
    let lower = content_type.trim().to_ascii_lowercase();
    if lower.starts_with("image") {
        Some(MediaKind::Image)
    } else if lower.starts_with("audio") {
        Some(MediaKind::Audio)
    } else if lower.starts_with("video") || is_manifest_content_type(&lower) {
        Some(MediaKind::Video)
    } else {
        None
    }
}

/// Kind implied by the URL's file extension
pub fn kind_from_extension(url: &str) -> Option<MediaKind> {
    if VIDEO_EXT_RE.is_match(url) {
        Some(MediaKind::Video)
    } else if AUDIO_EXT_RE.is_match(url) {
        Some(MediaKind::Audio)
    } else if IMAGE_EXT_RE.is_match(url) {
        Some(MediaKind::Image)
    } else {
        None
    }
}

/// MIME type declared in a `data:` URI header, if any
pub fn data_uri_media_type(url: &str) -> Option<&str> {
    let rest = url.strip_prefix("data:")?;
    let header = rest.split(',').next()?;
    let media_type = header.split(';').next()?.trim();
    (!media_type.is_empty()).then_some(media_type)
}

/// Infer the kind of a resource.
///
/// Precedence: explicit hint, content type, `data:` URI media type, URL
/// extension, then [`MediaKind::Media`].
pub fn infer_kind(url: &str, hint: Option<&str>, content_type: Option<&str>) -> MediaKind {
    hint.and_then(MediaKind::from_hint)
        .or_else(|| content_type.and_then(kind_from_content_type))
        .or_else(|| data_uri_media_type(url).and_then(kind_from_content_type))
        .or_else(|| kind_from_extension(url))
        .unwrap_or(MediaKind::Media)
}

/// True when the URL contains one of the [`PRIORITY_DOMAINS`]
pub fn is_priority_url(url: &str) -> bool {
    PRIORITY_DOMAINS.iter().any(|domain| url.contains(domain))
}

/// Remove byte-range query parameters so partial fetches of one stream
/// collapse to a single URL.
///
/// Strips `bytestart`, `byteend` and numeric `range=N-M` parameters. `data:`
/// URIs, unparseable URLs and URLs without such parameters come back unchanged.
/// Remaining parameters keep their original encoding.
pub fn strip_byte_range(url: &str) -> String {
    if url.starts_with("data:") {
        return url.to_string();
    }

    let Ok(mut parsed) = Url::parse(url) else {
        return url.to_string();
    };
    let Some(query) = parsed.query() else {
        return url.to_string();
    };

    let params: Vec<&str> = query.split('&').filter(|param| !param.is_empty()).collect();
    let kept: Vec<&str> = params.iter().copied().filter(|param| !is_byte_range_param(param)).collect();
    if kept.len() == params.len() {
        return url.to_string();
    }

    let kept = kept.join("&");
    parsed.set_query(if kept.is_empty() { None } else { Some(&kept) });
    parsed.to_string()
}

fn is_byte_range_param(param: &str) -> bool {
    let (key, value) = param.split_once('=').unwrap_or((param, ""));
    let key = key.to_ascii_lowercase();

    if BYTE_RANGE_PARAMS.contains(&key.as_str()) {
        return !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit());
    }

    if key == "range" {
        return value
            .split_once('-')
            .is_some_and(|(start, end)| is_digits(start) && is_digits(end));
    }

    false
}

fn is_digits(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_inference() {
        assert_eq!(infer_kind("https://a.example/clip.mp4", None, None), MediaKind::Video);
        assert_eq!(infer_kind("https://a.example/photo.jpg", None, None), MediaKind::Image);
        assert_eq!(infer_kind("https://a.example/song.mp3", None, None), MediaKind::Audio);
        assert_eq!(infer_kind("https://a.example/file.xyz", None, None), MediaKind::Media);
        assert_eq!(infer_kind("https://a.example/page", None, None), MediaKind::Media);
    }

    #[test]
    fn test_extension_with_query_and_case() {
        assert_eq!(
            infer_kind("https://a.example/CLIP.MP4?token=1", None, None),
            MediaKind::Video
        );
        assert_eq!(infer_kind("https://a.example/x.png#frag", None, None), MediaKind::Image);
        assert_eq!(infer_kind("https://a.example/x.mp4.html", None, None), MediaKind::Media);
    }

    #[test]
    fn test_inference_precedence() {
        // explicit hint beats content type and extension
        assert_eq!(
            infer_kind("https://a.example/x.mp3", Some("image"), Some("video/mp4")),
            MediaKind::Image
        );
        // content type beats extension
        assert_eq!(
            infer_kind("https://a.example/x.mp3", None, Some("video/mp4")),
            MediaKind::Video
        );
        // a tag name that is not a kind falls through
        assert_eq!(
            infer_kind("https://a.example/x.mp3", Some("source"), None),
            MediaKind::Audio
        );
    }

    #[test]
    fn test_manifest_content_type_is_video() {
        assert_eq!(
            kind_from_content_type("application/vnd.apple.mpegurl"),
            Some(MediaKind::Video)
        );
        assert_eq!(kind_from_content_type("application/dash+xml"), Some(MediaKind::Video));
        assert!(is_media_content_type("application/x-mpegURL"));
        assert!(!is_media_content_type("application/json"));
        assert!(!is_media_content_type("text/html; charset=utf-8"));
    }

    #[test]
    fn test_data_uri_kind() {
        assert_eq!(data_uri_media_type("data:image/png;base64,AAAA"), Some("image/png"));
        assert_eq!(data_uri_media_type("data:,hello"), None);
        assert_eq!(infer_kind("data:audio/ogg;base64,AAAA", None, None), MediaKind::Audio);
    }

    #[test]
    fn test_priority_urls() {
        assert!(is_priority_url("https://rr3---sn.googlevideo.com/videoplayback?x=1"));
        assert!(is_priority_url("https://scontent.cdninstagram.com/v/t51.jpg"));
        assert!(!is_priority_url("https://cdn.example/a.mp4"));
    }

    #[test]
    fn test_strip_byte_range() {
        assert_eq!(
            strip_byte_range("https://v.example/seg.mp4?efg=abc&bytestart=0&byteend=999"),
            "https://v.example/seg.mp4?efg=abc"
        );
        assert_eq!(
            strip_byte_range("https://v.example/seg.mp4?efg=abc&bytestart=1000&byteend=1999"),
            "https://v.example/seg.mp4?efg=abc"
        );
        assert_eq!(
            strip_byte_range("https://v.example/seg.mp4?bytestart=0&byteend=10&b=2"),
            "https://v.example/seg.mp4?b=2"
        );
        assert_eq!(
            strip_byte_range("https://v.example/seg.mp4?bytestart=0&byteend=10"),
            "https://v.example/seg.mp4"
        );
    }

    #[test]
    fn test_strip_range_param() {
        assert_eq!(
            strip_byte_range("https://r1.googlevideo.com/videoplayback?id=7&range=0-65535&sig=A%2CB"),
            "https://r1.googlevideo.com/videoplayback?id=7&sig=A%2CB"
        );
        // non-numeric ranges are not byte ranges
        assert_eq!(
            strip_byte_range("https://a.example/x?range=week"),
            "https://a.example/x?range=week"
        );
    }

    #[test]
    fn test_strip_byte_range_untouched() {
        assert_eq!(strip_byte_range("https://a.example/x.png"), "https://a.example/x.png");
        assert_eq!(
            strip_byte_range("https://a.example/x.png?w=10#top"),
            "https://a.example/x.png?w=10#top"
        );
        assert_eq!(
            strip_byte_range("data:image/png;base64,a?bytestart=1"),
            "data:image/png;base64,a?bytestart=1"
        );
    }

    #[test]
    fn test_strip_byte_range_keeps_fragment() {
        assert_eq!(
            strip_byte_range("https://v.example/s.mp4?a=1&bytestart=0&byteend=9#t=5"),
            "https://v.example/s.mp4?a=1#t=5"
        );
        assert_eq!(
            strip_byte_range("https://v.example/s.mp4?bytestart=0&byteend=9#t=5"),
            "https://v.example/s.mp4#t=5"
        );
    }

    #[test]
    fn test_strip_byte_range_unparseable_passthrough() {
        assert_eq!(
            strip_byte_range("/relative/seg.mp4?bytestart=0&byteend=9"),
            "/relative/seg.mp4?bytestart=0&byteend=9"
        );
        assert_eq!(
            strip_byte_range("https://exa mple.com/seg.mp4?bytestart=0"),
            "https://exa mple.com/seg.mp4?bytestart=0"
        );
    }

    #[test]
    fn test_shared_pattern_is_plain_syntax() {
        let pattern = media_extension_pattern();
        assert!(pattern.starts_with(r"\.(?:mp4|"));
        assert!(!pattern.contains("(?i)"));
        assert!(has_media_extension("https://a.example/x.webp"));
        assert!(!has_media_extension("https://a.example/x.json"));
    }
}
