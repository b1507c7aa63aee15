pub mod config;
pub mod manager;
pub mod session;

pub use config::{LaunchOptions, ScrapeOptions};
pub use manager::{BrowserManager, PageLease};
pub use session::{ExtractionSession, UNKNOWN_TITLE};
