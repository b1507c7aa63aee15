use crate::browser::config::ScrapeOptions;
use crate::browser::manager::PageLease;
use crate::capture::{CaptureBridge, CaptureBuffer, UrlSniffer, script};
use crate::error::Result;
use crate::media::CaptureRecord;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Title reported when the page has none or it cannot be read
pub const UNKNOWN_TITLE: &str = "Unknown";

const IDLE_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// One extraction run on its own page
///
/// Owns the tab lease and the capture bridge feeding this run's buffer.
/// Listeners registered on the tab only ever see this session's bridge.
pub struct ExtractionSession {
    lease: PageLease,
    bridge: CaptureBridge,
    timeout: Duration,
    idle_window: Duration,
}

impl ExtractionSession {
    /// Instrument `lease`'s tab and attach the capture listeners.
    ///
    /// Must be called before navigation. On error the lease is dropped, which
    /// closes the tab.
    pub fn open(lease: PageLease, sniffer: Arc<dyn UrlSniffer>, options: &ScrapeOptions) -> Result<Self> {
        let bridge =
            CaptureBridge::new(CaptureBuffer::new(), sniffer).include_inline_data(options.include_inline_data);

        script::install(lease.tab())?;
        bridge.attach(lease.tab())?;

        Ok(Self {
            lease,
            bridge,
            timeout: options.timeout,
            idle_window: options.idle_window,
        })
    }

    pub fn bridge(&self) -> &CaptureBridge {
        &self.bridge
    }

    /// Navigate and wait for the load to finish and the network to go quiet.
    ///
    /// Both waits share one deadline. Navigation failures are logged and
    /// extraction carries on with whatever was captured.
    pub fn navigate(&self, url: &str) {
        let deadline = Instant::now() + self.timeout;
        let tab = self.lease.tab();
        tab.set_default_timeout(self.timeout);

        if let Err(e) = tab.navigate_to(url).and_then(|t| t.wait_until_navigated()) {
            log::warn!("Navigation to {} did not complete: {}", url, e);
        }

        self.wait_for_network_idle(deadline);
    }

    fn wait_for_network_idle(&self, deadline: Instant) {
        let buffer = self.bridge.buffer();
        loop {
            let now = Instant::now();
            if buffer.idle_for() >= self.idle_window || now >= deadline {
                return;
            }
            std::thread::sleep(IDLE_POLL_INTERVAL.min(deadline - now));
        }
    }

    /// Add the media sources present in the current DOM
    pub fn scan_dom(&self) {
        match script::scan_dom(self.lease.tab()) {
            Ok(records) => {
                log::debug!("DOM scan found {} sources", records.len());
                self.bridge.buffer().extend(records);
            }
            Err(e) => log::debug!("DOM scan skipped: {}", e),
        }
    }

    /// Give late page scripts time to report
    pub fn settle(&self, wait: Duration) {
        if !wait.is_zero() {
            std::thread::sleep(wait);
        }
    }

    /// Document title, or [`UNKNOWN_TITLE`]
    pub fn title(&self) -> String {
        let title = match self.lease.tab().evaluate("document.title", false) {
            Ok(result) => result.value.and_then(|v| v.as_str().map(str::to_string)),
            Err(e) => {
                log::debug!("Failed to read title: {}", e);
                None
            }
        };

        title_or_unknown(title)
    }

    /// Close the page and hand back everything captured
    pub fn finish(self) -> Vec<CaptureRecord> {
        let Self { lease, bridge, .. } = self;
        lease.close();
        bridge.buffer().drain()
    }
}

fn title_or_unknown(title: Option<String>) -> String {
    match title {
        Some(t) if !t.trim().is_empty() => t,
        _ => UNKNOWN_TITLE.to_string(),
    }
}
