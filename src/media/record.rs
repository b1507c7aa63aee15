use serde::{Deserialize, Serialize};
use std::fmt;

/// Media category assigned to a normalized result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Audio,
    Video,
    /// Fallback when nothing identifies the resource
    Media,
}

impl MediaKind {
    /// Parse an explicit type hint. Only the three concrete kinds are accepted;
    /// tag names and anything else yield `None`.
    pub fn from_hint(hint: &str) -> Option<Self> {
        match hint.trim().to_ascii_lowercase().as_str() {
            "image" => Some(Self::Image),
            "audio" => Some(Self::Audio),
            "video" => Some(Self::Video),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Audio => "audio",
            Self::Video => "video",
            Self::Media => "media",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A raw observation of a possible media resource
///
/// Several records may describe the same resource; identity only exists after
/// normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureRecord {
    /// Resource URL, possibly a `data:` URI
    pub url: String,

    /// Declared type hint (image/audio/video or a tag name)
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind_hint: Option<String>,

    /// MIME type reported for the resource
    #[serde(default, rename = "contentType", skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,

    /// Where the observation came from (e.g. "network-response", "dom-scan")
    pub source: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl CaptureRecord {
    /// Create a new record with the given URL and provenance
    pub fn new(url: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            kind_hint: None,
            content_type: None,
            source: source.into(),
            title: None,
        }
    }

    /// Builder method: set the type hint
    pub fn with_kind_hint(mut self, hint: impl Into<String>) -> Self {
        self.kind_hint = Some(hint.into());
        self
    }

    /// Builder method: set the content type. Empty strings are ignored.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        let content_type = content_type.into();
        if !content_type.trim().is_empty() {
            self.content_type = Some(content_type);
        }
        self
    }

    /// Builder method: set the title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// A normalized, classified media resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaResult {
    pub url: String,

    #[serde(rename = "type")]
    pub kind: MediaKind,

    /// Provenance tag of the first observation
    pub source: String,

    pub content_type: Option<String>,

    /// Page title, stamped after extraction
    pub title: Option<String>,
}
