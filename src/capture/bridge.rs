use crate::capture::buffer::CaptureBuffer;
use crate::capture::event::CaptureEvent;
use crate::capture::script::DOM_SOURCE;
use crate::capture::sniff::UrlSniffer;
use crate::error::{BrowserError, Result};
use crate::media::CaptureRecord;
use crate::media::classify::{has_media_extension, is_media_content_type, strip_byte_range};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use headless_chrome::Tab;
use headless_chrome::protocol::cdp::Network::GetResponseBodyReturnObject;
use headless_chrome::protocol::cdp::Network::ResourceType;
use headless_chrome::protocol::cdp::Network::events::ResponseReceivedEventParams;
use headless_chrome::protocol::cdp::types::Event;
use std::sync::Arc;

/// Name under which the response handler is registered on a tab
const RESPONSE_HANDLER_NAME: &str = "media-sniff-capture";

/// A network response as seen by the host
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseObservation {
    pub url: String,
    pub mime_type: String,
    /// Whether the request was issued through XMLHttpRequest
    pub is_xhr: bool,
}

impl ResponseObservation {
    pub fn new(url: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            mime_type: mime_type.into(),
            is_xhr: false,
        }
    }

    /// Builder method: mark the response as an XHR response
    pub fn xhr(mut self) -> Self {
        self.is_xhr = true;
        self
    }
}

/// Host-side receiver for everything a page reports
///
/// Console lines from the instrumentation script and host-level network
/// responses both end up as [`CaptureRecord`]s in the session's buffer.
/// Handlers never fail: malformed payloads and unreadable bodies are dropped.
#[derive(Clone)]
pub struct CaptureBridge {
    buffer: CaptureBuffer,
    sniffer: Arc<dyn UrlSniffer>,
    include_inline_data: bool,
}

impl CaptureBridge {
    pub fn new(buffer: CaptureBuffer, sniffer: Arc<dyn UrlSniffer>) -> Self {
        Self {
            buffer,
            sniffer,
            include_inline_data: true,
        }
    }

    /// Builder method: keep or drop `data:` URIs
    pub fn include_inline_data(mut self, include: bool) -> Self {
        self.include_inline_data = include;
        self
    }

    pub fn buffer(&self) -> &CaptureBuffer {
        &self.buffer
    }

    fn record(&self, mut record: CaptureRecord) {
        if !self.include_inline_data && record.url.starts_with("data:") {
            return;
        }
        // Range chunks of one stream must share a dedup key
        record.url = strip_byte_range(&record.url);
        self.buffer.push(record);
    }

    /// Handle one console line. Returns `true` when the line was a capture event.
    pub fn handle_console_text(&self, text: &str) -> bool {
        match CaptureEvent::decode(text) {
            Some(event) => {
                self.handle_event(event);
                true
            }
            None => false,
        }
    }

    /// Dispatch a decoded capture event into the buffer
    pub fn handle_event(&self, event: CaptureEvent) {
        match event {
            CaptureEvent::Url {
                url,
                content_type,
                note,
            } => {
                let record = CaptureRecord::new(url, note.unwrap_or_else(|| "detected".to_string()))
                    .with_content_type(content_type.unwrap_or_default());
                self.record(record);
            }
            CaptureEvent::DataUrl {
                data,
                content_type,
                note,
                ..
            } => {
                // The inline data URI itself stands in for the resource URL
                let record = CaptureRecord::new(data, note.unwrap_or_else(|| "detected".to_string()))
                    .with_content_type(content_type.unwrap_or_default());
                self.record(record);
            }
            CaptureEvent::DomCollection { items } => {
                for item in items {
                    let source = item.note.unwrap_or_else(|| DOM_SOURCE.to_string());
                    let mut record = CaptureRecord::new(item.url, source);
                    record.kind_hint = item.kind;
                    self.record(record);
                }
            }
            CaptureEvent::MaybeJson { preview, .. } => {
                for url in self.sniffer.find_urls(&preview) {
                    self.record(CaptureRecord::new(url, "json-preview"));
                }
            }
        }
    }

    /// Classify a network response as soon as its headers arrive.
    ///
    /// Runs for every response, including ones that later fail or are still
    /// streaming when the page closes. Also marks network activity.
    pub fn handle_response(&self, observation: &ResponseObservation) {
        self.buffer.touch();

        let url = observation.url.as_str();
        let content_type = observation.mime_type.as_str();

        if !content_type.is_empty() && is_media_content_type(content_type) {
            self.record(CaptureRecord::new(url, "network-response").with_content_type(content_type));
        } else if has_media_extension(url) {
            self.record(CaptureRecord::new(url, "network-response-ext"));
        }
    }

    /// Scan the complete body of a finished response for embedded media URLs.
    ///
    /// Only XHR responses with a JSON content type are read, and `body` is
    /// not invoked for anything else. Responses already classified as media
    /// by [`handle_response`](Self::handle_response) are skipped.
    pub fn handle_response_body<F>(&self, observation: &ResponseObservation, body: F)
    where
        F: FnOnce() -> Option<String>,
    {
        self.buffer.touch();

        if !is_json_feed(observation) {
            return;
        }

        match body() {
            Some(text) => {
                for found in self.sniffer.find_urls(&text) {
                    self.record(CaptureRecord::new(found, "xhr-json"));
                }
            }
            None => log::debug!("Could not read JSON body of {}", observation.url),
        }
    }

    /// Register the console and network listener and the body handler on `tab`.
    ///
    /// Must run before navigation starts, or early responses are missed.
    pub fn attach(&self, tab: &Arc<Tab>) -> Result<()> {
        tab.enable_runtime()
            .map_err(|e| BrowserError::InstrumentationFailed(format!("Failed to enable runtime: {}", e)))?;

        let event_bridge = self.clone();
        tab.add_event_listener(Arc::new(move |event: &Event| match event {
            Event::RuntimeConsoleAPICalled(called) => {
                for arg in &called.params.args {
                    if let Some(serde_json::Value::String(text)) = &arg.value {
                        event_bridge.handle_console_text(text);
                    }
                }
            }
            Event::NetworkResponseReceived(received) => {
                event_bridge.handle_response(&observe(&received.params));
            }
            Event::NetworkLoadingFailed(_) => event_bridge.buffer().touch(),
            _ => {}
        }))
        .map_err(|e| BrowserError::InstrumentationFailed(format!("Failed to add event listener: {}", e)))?;

        // Also enables the Network domain the listener above depends on.
        // headless_chrome calls this handler once loading has finished.
        let body_bridge = self.clone();
        tab.register_response_handling(
            RESPONSE_HANDLER_NAME,
            Box::new(
                move |params: ResponseReceivedEventParams,
                      fetch_body: &dyn Fn() -> anyhow::Result<GetResponseBodyReturnObject>| {
                    body_bridge.handle_response_body(&observe(&params), || match fetch_body() {
                        Ok(body) => decode_body(body),
                        Err(e) => {
                            log::debug!("Failed to fetch response body: {}", e);
                            None
                        }
                    });
                },
            ),
        )
        .map_err(|e| BrowserError::InstrumentationFailed(format!("Failed to register response handler: {}", e)))?;

        Ok(())
    }
}

fn observe(params: &ResponseReceivedEventParams) -> ResponseObservation {
    ResponseObservation {
        url: params.response.url.clone(),
        mime_type: params.response.mime_type.clone(),
        is_xhr: matches!(params.Type, ResourceType::Xhr),
    }
}

/// XHR with a JSON body that is not itself a media response
fn is_json_feed(observation: &ResponseObservation) -> bool {
    let content_type = observation.mime_type.to_ascii_lowercase();
    observation.is_xhr
        && content_type.contains("json")
        && !is_media_content_type(&content_type)
        && !has_media_extension(&observation.url)
}

fn decode_body(body: GetResponseBodyReturnObject) -> Option<String> {
    if !body.base_64_encoded {
        return Some(body.body);
    }

    let bytes = STANDARD.decode(body.body.as_bytes()).ok()?;
    Some(String::from_utf8_lossy(&bytes).into_owned())
}
