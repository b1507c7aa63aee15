use crate::browser::config::LaunchOptions;
use crate::error::{BrowserError, Result};
use headless_chrome::{Browser, Tab};
use once_cell::sync::OnceCell;
use std::ffi::OsStr;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

/// One browser process and the pages opened on it
struct BrowserSlot {
    generation: u64,
    cell: OnceCell<Browser>,
    opened: AtomicUsize,
    active: AtomicUsize,
}

impl BrowserSlot {
    fn new(generation: u64) -> Self {
        Self {
            generation,
            cell: OnceCell::new(),
            opened: AtomicUsize::new(0),
            active: AtomicUsize::new(0),
        }
    }

    /// A slot is exhausted once it has served `max_pages` pages and none are open
    fn is_exhausted(&self, max_pages: usize) -> bool {
        max_pages > 0
            && self.opened.load(Ordering::Acquire) >= max_pages
            && self.active.load(Ordering::Acquire) == 0
    }
}

/// Owner of the shared browser
///
/// The browser is launched on first use and reused by every request made
/// through this manager. Concurrent first callers block on the same launch.
/// After `max_pages_per_browser` pages, the browser is replaced as soon as no
/// page is open on it.
pub struct BrowserManager {
    options: LaunchOptions,
    slot: RwLock<Arc<BrowserSlot>>,
    generations: AtomicU64,
}

impl BrowserManager {
    pub fn new(options: LaunchOptions) -> Self {
        Self {
            options,
            slot: RwLock::new(Arc::new(BrowserSlot::new(0))),
            generations: AtomicU64::new(0),
        }
    }

    pub fn options(&self) -> &LaunchOptions {
        &self.options
    }

    /// Number of the current browser generation, starting at 0
    pub fn generation(&self) -> u64 {
        self.current_slot().generation
    }

    /// Whether the current generation has a running browser
    pub fn is_launched(&self) -> bool {
        self.current_slot().cell.get().is_some()
    }

    fn current_slot(&self) -> Arc<BrowserSlot> {
        self.slot.read().unwrap_or_else(|p| p.into_inner()).clone()
    }

    /// Swap in a fresh generation unless another caller already replaced `stale`
    fn replace_slot(&self, stale: &Arc<BrowserSlot>) -> Arc<BrowserSlot> {
        let mut guard = self.slot.write().unwrap_or_else(|p| p.into_inner());
        if Arc::ptr_eq(&guard, stale) {
            let generation = self.generations.fetch_add(1, Ordering::AcqRel) + 1;
            log::info!(
                "Retiring browser generation {} after {} pages",
                stale.generation,
                stale.opened.load(Ordering::Acquire)
            );
            *guard = Arc::new(BrowserSlot::new(generation));
        }
        guard.clone()
    }

    fn launched(&self, slot: &BrowserSlot) -> Result<Browser> {
        slot.cell
            .get_or_try_init(|| launch(&self.options, slot.generation))
            .cloned()
    }

    /// Get the shared browser, launching it if needed
    pub fn browser(&self) -> Result<Browser> {
        let slot = self.current_slot();
        self.launched(&slot)
    }

    /// Open a new page on the shared browser
    pub fn open_page(&self) -> Result<PageLease> {
        let mut slot = self.current_slot();
        if slot.is_exhausted(self.options.max_pages_per_browser) {
            slot = self.replace_slot(&slot);
        }

        let browser = self.launched(&slot)?;

        match browser.new_tab() {
            Ok(tab) => {
                slot.opened.fetch_add(1, Ordering::AcqRel);
                slot.active.fetch_add(1, Ordering::AcqRel);
                Ok(PageLease {
                    tab,
                    slot,
                    closed: false,
                })
            }
            Err(e) => {
                // The process is likely gone; relaunch on the next request
                self.replace_slot(&slot);
                Err(BrowserError::TabOperationFailed(format!("Failed to create tab: {}", e)))
            }
        }
    }

    /// Drop the current browser once its open pages are closed. The next
    /// request launches a new one.
    pub fn recycle(&self) {
        let slot = self.current_slot();
        self.replace_slot(&slot);
    }
}

fn launch(options: &LaunchOptions, generation: u64) -> Result<Browser> {
    let mut launch_opts = headless_chrome::LaunchOptions::default();

    // Ignore default arguments to prevent detection by anti-bot services
    launch_opts.ignore_default_args.push(OsStr::new("--enable-automation"));
    launch_opts.args.push(OsStr::new("--disable-blink-features=AutomationControlled"));

    launch_opts.idle_browser_timeout = options.idle_timeout;
    launch_opts.headless = options.headless;
    launch_opts.window_size = Some((options.window_width, options.window_height));
    launch_opts.ignore_certificate_errors = options.ignore_certificate_errors;
    launch_opts.sandbox = options.sandbox;

    if let Some(path) = &options.chrome_path {
        launch_opts.path = Some(path.clone());
    }

    if let Some(dir) = &options.user_data_dir {
        launch_opts.user_data_dir = Some(dir.clone());
    }

    let browser = Browser::new(launch_opts).map_err(|e| BrowserError::LaunchFailed(e.to_string()))?;

    log::info!(
        "Launched browser generation {} ({})",
        generation,
        if options.headless { "headless" } else { "headed" }
    );

    Ok(browser)
}

/// A tab borrowed from the shared browser
///
/// The tab is closed when the lease is closed or dropped, whichever happens
/// first. Close errors are ignored.
pub struct PageLease {
    tab: Arc<Tab>,
    slot: Arc<BrowserSlot>,
    closed: bool,
}

impl PageLease {
    pub fn tab(&self) -> &Arc<Tab> {
        &self.tab
    }

    /// Generation of the browser this page belongs to
    pub fn generation(&self) -> u64 {
        self.slot.generation
    }

    pub fn close(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;

        if let Err(e) = self.tab.close(false) {
            log::debug!("Failed to close tab: {}", e);
        }
        self.slot.active.fetch_sub(1, Ordering::AcqRel);
    }
}

impl Drop for PageLease {
    fn drop(&mut self) {
        self.release();
    }
}
