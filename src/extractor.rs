use crate::browser::{BrowserManager, ExtractionSession, LaunchOptions, ScrapeOptions};
use crate::capture::{RegexSniffer, UrlSniffer};
use crate::error::Result;
use crate::media::{MediaKind, MediaResult, normalize, stamp_title};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

/// Outcome of one extraction run
#[derive(Debug, Clone, Serialize)]
pub struct PageMedia {
    pub url: String,
    pub title: String,
    pub results: Vec<MediaResult>,
}

impl PageMedia {
    pub fn count(&self) -> usize {
        self.results.len()
    }

    /// Count of results per kind, in `image, audio, video, media` order
    pub fn kind_counts(&self) -> [(MediaKind, usize); 4] {
        kind_counts(&self.results)
    }
}

pub(crate) fn kind_counts(results: &[MediaResult]) -> [(MediaKind, usize); 4] {
    let mut counts = [
        (MediaKind::Image, 0),
        (MediaKind::Audio, 0),
        (MediaKind::Video, 0),
        (MediaKind::Media, 0),
    ];
    for result in results {
        if let Some(entry) = counts.iter_mut().find(|(kind, _)| *kind == result.kind) {
            entry.1 += 1;
        }
    }
    counts
}

/// Extracts the media a web page loads or references
///
/// Shares one lazily launched browser across calls. Every call gets its own
/// page and capture buffer, so concurrent calls from different threads do not
/// see each other's observations.
pub struct MediaExtractor {
    manager: BrowserManager,
    sniffer: Arc<dyn UrlSniffer>,
}

impl MediaExtractor {
    pub fn new(options: LaunchOptions) -> Self {
        Self {
            manager: BrowserManager::new(options),
            sniffer: Arc::new(RegexSniffer::new()),
        }
    }

    /// Builder method: replace the URL sniffer used on JSON bodies
    pub fn with_sniffer(mut self, sniffer: impl UrlSniffer + 'static) -> Self {
        self.sniffer = Arc::new(sniffer);
        self
    }

    pub fn manager(&self) -> &BrowserManager {
        &self.manager
    }

    /// Extract the media of `url`, ordered with priority hosts first
    ///
    /// Fails only when no page could be opened or instrumented. A page that
    /// never loads yields whatever was captured before the timeout, possibly
    /// nothing.
    pub fn scrape_url(&self, url: &str, options: &ScrapeOptions) -> Result<Vec<MediaResult>> {
        Ok(self.extract(url, options)?.results)
    }

    /// Like [`scrape_url`](Self::scrape_url), keeping the page title alongside
    pub fn extract(&self, url: &str, options: &ScrapeOptions) -> Result<PageMedia> {
        let started = Instant::now();

        let lease = self.manager.open_page()?;
        let session = ExtractionSession::open(lease, self.sniffer.clone(), options)?;

        session.navigate(url);
        session.scan_dom();
        session.settle(options.wait);

        let title = session.title();
        let records = session.finish();
        let captured = records.len();

        let mut results = normalize(records);
        stamp_title(&mut results, &title);

        log::info!(
            "Extracted {} media ({} raw captures) from {} in {:?}",
            results.len(),
            captured,
            url,
            started.elapsed()
        );

        Ok(PageMedia {
            url: url.to_string(),
            title,
            results,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::CaptureRecord;

    #[test]
    fn test_kind_counts() {
        let results = normalize(vec![
            CaptureRecord::new("https://a.example/1.png", "fetch"),
            CaptureRecord::new("https://a.example/2.png", "fetch"),
            CaptureRecord::new("https://a.example/3.mp4", "fetch"),
            CaptureRecord::new("https://a.example/blob", "fetch"),
        ]);
        let page = PageMedia {
            url: "https://a.example/".to_string(),
            title: "A".to_string(),
            results,
        };

        assert_eq!(page.count(), 4);
        assert_eq!(
            page.kind_counts(),
            [
                (MediaKind::Image, 2),
                (MediaKind::Audio, 0),
                (MediaKind::Video, 1),
                (MediaKind::Media, 1)
            ]
        );
    }

    #[test]
    fn test_extractor_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MediaExtractor>();
    }

    #[test]
    fn test_construction_does_not_launch() {
        let extractor = MediaExtractor::new(LaunchOptions::default());
        assert!(!extractor.manager().is_launched());
    }
}
