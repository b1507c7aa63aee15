//! Page instrumentation and the host-side capture channel
//!
//! The page side is a script injected before any page script runs. It reports
//! over `console.log` with a fixed prefix, the only channel that crosses from
//! the page to the host without a pre-registered binding. The host side
//! decodes those lines, inspects network responses itself and collects
//! everything into a per-session [`CaptureBuffer`].

pub mod bridge;
pub mod buffer;
pub mod event;
pub mod script;
pub mod sniff;

pub use bridge::{CaptureBridge, ResponseObservation};
pub use buffer::CaptureBuffer;
pub use event::{CaptureEvent, DomItem, CAPTURE_PREFIX};
pub use script::{DOM_SOURCE, INSTRUMENT_SCRIPT};
pub use sniff::{RegexSniffer, UrlSniffer};
