//! Media classification and normalization
//!
//! This module turns raw capture records into the externally visible result
//! list. It includes:
//! - CaptureRecord / MediaResult / MediaKind: the data model
//! - classify: URL and content-type rules shared with the page script
//! - normalize: dedup, kind inference and priority ordering

pub mod classify;
pub mod normalize;
pub mod record;

pub use classify::{infer_kind, is_priority_url, strip_byte_range, PRIORITY_DOMAINS};
pub use normalize::{normalize, stamp_title};
pub use record::{CaptureRecord, MediaKind, MediaResult};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_export() {
        let results = normalize(vec![CaptureRecord::new("https://cdn.example/a.mp3", "fetch")]);
        assert_eq!(results[0].kind, MediaKind::Audio);
    }

    #[test]
    fn test_priority_domains_export() {
        assert!(PRIORITY_DOMAINS.contains(&"googlevideo.com"));
    }
}
