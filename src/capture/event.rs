use serde::{Deserialize, Serialize};

/// Prefix marking console lines written by the instrumentation script
pub const CAPTURE_PREFIX: &str = "CAPTURE_MEDIA::";

/// A message sent from the page context to the host over the console
///
/// Wire format: `CAPTURE_PREFIX` followed by the JSON object, tagged by its
/// `type` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum CaptureEvent {
    /// A fetch/XHR response that looked like media
    Url {
        url: String,
        #[serde(default, rename = "contentType", skip_serializing_if = "Option::is_none")]
        content_type: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        note: Option<String>,
    },

    /// A small media body captured inline as a data URI
    #[serde(rename = "dataurl")]
    DataUrl {
        data: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        url: Option<String>,
        #[serde(default, rename = "contentType", skip_serializing_if = "Option::is_none")]
        content_type: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        note: Option<String>,
    },

    /// Media sources currently present in the DOM
    DomCollection {
        #[serde(default)]
        items: Vec<DomItem>,
    },

    /// A JSON response preview to be scanned for media URLs
    MaybeJson {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        url: Option<String>,
        #[serde(default)]
        preview: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        note: Option<String>,
    },
}

/// One media source found in the DOM
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomItem {
    #[serde(default)]
    pub url: String,

    /// Kind hint derived from the element ("video", "audio", "image")
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl CaptureEvent {
    /// Serialize to a prefixed console line
    pub fn encode(&self) -> serde_json::Result<String> {
        Ok(format!("{}{}", CAPTURE_PREFIX, serde_json::to_string(self)?))
    }

    /// Parse a console line.
    ///
    /// Returns `None` for lines without the prefix and for malformed payloads.
    pub fn decode(line: &str) -> Option<Self> {
        let payload = line.strip_prefix(CAPTURE_PREFIX)?;
        match serde_json::from_str(payload) {
            Ok(event) => Some(event),
            Err(e) => {
                log::debug!("Dropping malformed capture payload: {}", e);
                None
            }
        }
    }
}
