use crate::browser::ScrapeOptions;
use crate::error::Result;
use crate::tools::utils::resolve_target;
use crate::tools::{Tool, ToolContext, ToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the extract_media tool
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ExtractMediaParams {
    /// Page URL to extract media from
    pub url: String,

    /// Navigation and network idle timeout in milliseconds (default: 45000)
    #[serde(default)]
    pub timeout_ms: Option<u64>,

    /// Extra wait after the page settles, in milliseconds (default: 2000)
    #[serde(default)]
    pub wait_ms: Option<u64>,

    /// Keep small media bodies inlined as data: URIs (default: true)
    #[serde(default)]
    pub include_inline_data: Option<bool>,
}

impl ExtractMediaParams {
    pub fn scrape_options(&self) -> ScrapeOptions {
        let options = ScrapeOptions::from_millis(self.timeout_ms, self.wait_ms);
        match self.include_inline_data {
            Some(include) => options.include_inline_data(include),
            None => options,
        }
    }
}

/// Tool that loads a page and lists its media
#[derive(Default)]
pub struct ExtractMediaTool;

impl Tool for ExtractMediaTool {
    type Params = ExtractMediaParams;

    fn name(&self) -> &str {
        "extract_media"
    }

    fn description(&self) -> &str {
        "Load a web page in a headless browser and list every video, audio and image URL it loads or references"
    }

    fn execute_typed(&self, params: ExtractMediaParams, context: &mut ToolContext) -> Result<ToolResult> {
        let url = resolve_target(&params.url)?;
        let page = context.extractor.extract(&url, &params.scrape_options())?;

        Ok(ToolResult::success_with(serde_json::json!({
            "url": page.url,
            "title": page.title,
            "count": page.results.len(),
            "results": page.results,
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::LaunchOptions;
    use crate::error::BrowserError;
    use crate::extractor::MediaExtractor;
    use std::time::Duration;

    #[test]
    fn test_params_defaults() {
        let params: ExtractMediaParams =
            serde_json::from_value(serde_json::json!({"url": "https://example.com"})).unwrap();
        assert_eq!(params.scrape_options(), ScrapeOptions::default());
    }

    #[test]
    fn test_params_overrides() {
        let params: ExtractMediaParams = serde_json::from_value(serde_json::json!({
            "url": "https://example.com",
            "timeout_ms": 60000,
            "wait_ms": 2500,
            "include_inline_data": false
        }))
        .unwrap();

        let options = params.scrape_options();
        assert_eq!(options.timeout, Duration::from_secs(60));
        assert_eq!(options.wait, Duration::from_millis(2500));
        assert!(!options.include_inline_data);
    }

    #[test]
    fn test_tool_metadata() {
        let tool = ExtractMediaTool;
        assert_eq!(tool.name(), "extract_media");
        let schema = tool.parameters_schema();
        assert!(schema["properties"]["url"].is_object());
    }

    #[test]
    fn test_rejects_non_http_target_before_launch() {
        let extractor = MediaExtractor::new(LaunchOptions::default());
        let mut context = ToolContext::new(&extractor);
        let params = ExtractMediaParams {
            url: "about:blank".to_string(),
            timeout_ms: None,
            wait_ms: None,
            include_inline_data: None,
        };

        let err = ExtractMediaTool.execute_typed(params, &mut context).unwrap_err();
        assert!(matches!(err, BrowserError::InvalidUrl(_)));
        assert!(!extractor.manager().is_launched());
    }
}
