//! # media-sniff
//!
//! Extract every video, audio and image resource a web page loads or references, using a
//! headless Chrome driven over the Chrome DevTools Protocol (CDP).
//!
//! ## How it works
//!
//! Each extraction opens a fresh page on a shared, lazily launched browser and watches it
//! through three channels:
//!
//! - **Page instrumentation**: a script injected before any page script reports `fetch`
//!   and `XMLHttpRequest` responses and the media elements of the DOM over `console.log`
//! - **Network responses**: every response the page receives is classified on the host
//! - **DOM snapshot**: a one-shot scan once the network has gone quiet
//!
//! Observations are merged, classified as image, audio or video, deduplicated and ordered
//! with well-known media hosts first.
//!
//! ## MCP Server
//!
//! ```bash
//! # Run headless browser
//! cargo run --bin mcp-server --features mcp-server
//!
//! # Run with visible browser (useful for debugging)
//! cargo run --bin mcp-server --features mcp-server -- --headed
//! ```
//!
//! ## Library Usage
//!
//! ```rust,no_run
//! use media_sniff::{LaunchOptions, MediaExtractor, ScrapeOptions};
//!
//! # fn main() -> media_sniff::Result<()> {
//! let extractor = MediaExtractor::new(LaunchOptions::default());
//!
//! for item in extractor.scrape_url("https://example.com", &ScrapeOptions::default())? {
//!     println!("[{}] {} ({})", item.kind, item.url, item.source);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Classification works without a browser:
//!
//! ```rust
//! use media_sniff::media::{normalize, CaptureRecord, MediaKind};
//!
//! let results = normalize(vec![
//!     CaptureRecord::new("https://cdn.example.com/clip.mp4?bytestart=0", "fetch"),
//!     CaptureRecord::new("https://cdn.example.com/cover.webp", "dom-scan"),
//! ]);
//! assert_eq!(results[0].kind, MediaKind::Video);
//! assert_eq!(results[1].kind, MediaKind::Image);
//! ```
//!
//! ## Module Overview
//!
//! - [`extractor`]: `MediaExtractor::scrape_url`, the entry point
//! - [`browser`]: shared browser lifecycle and per-request sessions
//! - [`capture`]: page instrumentation and the capture channel
//! - [`media`]: data model, classification and normalization
//! - [`report`]: summaries and delivery planning for chat-style front-ends
//! - [`tools`]: schema-described tools (`extract_media`, `classify_media`)
//! - [`error`]: Error types and result aliases
//! - [`mcp`]: Model Context Protocol server (requires `mcp-handler` feature)

pub mod browser;
pub mod capture;
pub mod error;
pub mod extractor;
pub mod media;
pub mod report;
pub mod tools;

#[cfg(feature = "mcp-handler")]
pub mod mcp;

pub use browser::{BrowserManager, LaunchOptions, ScrapeOptions};
pub use error::{BrowserError, Result};
pub use extractor::{MediaExtractor, PageMedia};
pub use media::{CaptureRecord, MediaKind, MediaResult};
pub use tools::{Tool, ToolContext, ToolRegistry, ToolResult};

#[cfg(feature = "mcp-handler")]
pub use mcp::MediaServer;
#[cfg(feature = "mcp-handler")]
pub use rmcp::ServiceExt;
