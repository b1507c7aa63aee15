use std::path::PathBuf;
use std::time::Duration;

/// Options for launching the shared browser
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    /// Run without a visible window (default: true)
    pub headless: bool,

    /// Browser window width in pixels
    pub window_width: u32,

    /// Browser window height in pixels
    pub window_height: u32,

    /// Path to a Chrome/Chromium binary (auto-detected when `None`)
    pub chrome_path: Option<PathBuf>,

    /// Persistent profile directory
    pub user_data_dir: Option<PathBuf>,

    /// Enable the Chrome sandbox
    pub sandbox: bool,

    /// Accept invalid TLS certificates on navigated sites (default: true)
    pub ignore_certificate_errors: bool,

    /// How long the DevTools connection may stay silent before it is dropped
    pub idle_timeout: Duration,

    /// Pages a browser may open before it is replaced once idle (0 = never)
    pub max_pages_per_browser: usize,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            headless: true,
            window_width: 1280,
            window_height: 800,
            chrome_path: None,
            user_data_dir: Some(std::env::temp_dir().join("chrome-user-data")),
            sandbox: true,
            ignore_certificate_errors: true,
            idle_timeout: Duration::from_secs(60 * 60),
            max_pages_per_browser: 500,
        }
    }
}

impl LaunchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set headless mode
    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Builder method: set window size
    pub fn window_size(mut self, width: u32, height: u32) -> Self {
        self.window_width = width;
        self.window_height = height;
        self
    }

    /// Builder method: set Chrome binary path
    pub fn chrome_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.chrome_path = Some(path.into());
        self
    }

    /// Builder method: set profile directory
    pub fn user_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.user_data_dir = Some(dir.into());
        self
    }

    /// Builder method: set sandbox mode
    pub fn sandbox(mut self, sandbox: bool) -> Self {
        self.sandbox = sandbox;
        self
    }

    /// Builder method: accept or reject invalid certificates
    pub fn ignore_certificate_errors(mut self, ignore: bool) -> Self {
        self.ignore_certificate_errors = ignore;
        self
    }

    /// Builder method: set the DevTools idle timeout
    pub fn idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }

    /// Builder method: set the page ceiling per browser process
    pub fn max_pages_per_browser(mut self, max: usize) -> Self {
        self.max_pages_per_browser = max;
        self
    }
}

/// Per-request extraction options
#[derive(Debug, Clone, PartialEq)]
pub struct ScrapeOptions {
    /// Upper bound for navigation and network settling
    pub timeout: Duration,

    /// Extra delay after the DOM scan for late page scripts
    pub wait: Duration,

    /// Network quiet period that counts as idle
    pub idle_window: Duration,

    /// Keep `data:` URIs captured from small response bodies
    pub include_inline_data: bool,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(45_000),
            wait: Duration::from_millis(2_000),
            idle_window: Duration::from_millis(500),
            include_inline_data: true,
        }
    }
}

impl ScrapeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the navigation timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builder method: set the settle delay
    pub fn wait(mut self, wait: Duration) -> Self {
        self.wait = wait;
        self
    }

    /// Builder method: set the network idle window
    pub fn idle_window(mut self, window: Duration) -> Self {
        self.idle_window = window;
        self
    }

    /// Builder method: keep or drop inline `data:` captures
    pub fn include_inline_data(mut self, include: bool) -> Self {
        self.include_inline_data = include;
        self
    }

    /// Build from optional millisecond overrides, as received from tool calls
    pub fn from_millis(timeout_ms: Option<u64>, wait_ms: Option<u64>) -> Self {
        let mut options = Self::default();
        if let Some(ms) = timeout_ms {
            options.timeout = Duration::from_millis(ms);
        }
        if let Some(ms) = wait_ms {
            options.wait = Duration::from_millis(ms);
        }
        options
    }
}
