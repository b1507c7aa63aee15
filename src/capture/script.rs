use crate::capture::event::CAPTURE_PREFIX;
use crate::error::{BrowserError, Result};
use crate::media::CaptureRecord;
use crate::media::classify::{MANIFEST_CONTENT_TYPE_PATTERN, media_extension_pattern};
use headless_chrome::Tab;
use headless_chrome::protocol::cdp::Page;
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::sync::Arc;

/// Bodies below this size are captured inline as data URIs (200 KiB)
pub const INLINE_BODY_LIMIT: usize = 200 * 1024;

/// Characters of a JSON response forwarded for URL sniffing
pub const JSON_PREVIEW_LIMIT: usize = 10_000;

/// Provenance tag of records read from the DOM
pub const DOM_SOURCE: &str = "dom-scan";

/// The page instrumentation with the shared classification rules filled in
pub static INSTRUMENT_SCRIPT: Lazy<String> = Lazy::new(build_instrument_script);

fn js_string(value: &str) -> String {
    // serde_json string output is a valid JavaScript string literal
    serde_json::Value::String(value.to_string()).to_string()
}

fn build_instrument_script() -> String {
    include_str!("instrument.js")
        .replace("__CAPTURE_PREFIX__", &js_string(CAPTURE_PREFIX))
        .replace("__MEDIA_EXT_PATTERN__", &js_string(&media_extension_pattern()))
        .replace("__MANIFEST_PATTERN__", &js_string(MANIFEST_CONTENT_TYPE_PATTERN))
        .replace("__INLINE_LIMIT__", &INLINE_BODY_LIMIT.to_string())
        .replace("__PREVIEW_LIMIT__", &JSON_PREVIEW_LIMIT.to_string())
        .replace("__DOM_NOTE__", &js_string(DOM_SOURCE))
}

/// Register the instrumentation to run before any script of every future
/// document loaded in `tab`
pub fn install(tab: &Arc<Tab>) -> Result<()> {
    tab.call_method(Page::AddScriptToEvaluateOnNewDocument {
        source: INSTRUMENT_SCRIPT.clone(),
        world_name: None,
        include_command_line_api: None,
        run_immediately: None,
    })
    .map_err(|e| BrowserError::InstrumentationFailed(format!("Failed to add instrumentation script: {}", e)))?;

    Ok(())
}

/// Item returned by the one-shot DOM scan
#[derive(Debug, Deserialize)]
struct ScanItem {
    url: String,
    #[serde(default, rename = "type")]
    kind: Option<String>,
}

/// Collect media sources present in the current DOM of `tab`
pub fn scan_dom(tab: &Arc<Tab>) -> Result<Vec<CaptureRecord>> {
    let js_code = include_str!("dom_scan.js");

    let result = tab
        .evaluate(js_code, false)
        .map_err(|e| BrowserError::EvaluationFailed(format!("DOM scan failed: {}", e)))?;

    let json_value = result
        .value
        .ok_or_else(|| BrowserError::EvaluationFailed("No value returned from DOM scan".to_string()))?;

    // The script returns a JSON string
    let json_str: String = serde_json::from_value(json_value)?;
    parse_scan(&json_str)
}

fn parse_scan(json_str: &str) -> Result<Vec<CaptureRecord>> {
    let items: Vec<ScanItem> = serde_json::from_str(json_str)?;

    Ok(items
        .into_iter()
        .map(|item| {
            let mut record = CaptureRecord::new(item.url, DOM_SOURCE);
            record.kind_hint = item.kind;
            record
        })
        .collect())
}
