use crate::error::{BrowserError, Result};
use crate::media::{CaptureRecord, normalize};
use crate::tools::{Tool, ToolContext, ToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the classify_media tool
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ClassifyMediaParams {
    /// URLs to classify
    pub urls: Vec<String>,
}

/// Tool that classifies, deduplicates and orders media URLs without a browser
#[derive(Default)]
pub struct ClassifyMediaTool;

impl Tool for ClassifyMediaTool {
    type Params = ClassifyMediaParams;

    fn name(&self) -> &str {
        "classify_media"
    }

    fn description(&self) -> &str {
        "Classify media URLs as image, audio or video, drop duplicates and put well-known media hosts first"
    }

    fn execute_typed(&self, params: ClassifyMediaParams, _context: &mut ToolContext) -> Result<ToolResult> {
        if params.urls.is_empty() {
            return Err(BrowserError::InvalidParams("urls must not be empty".to_string()));
        }

        let results = normalize(
            params
                .urls
                .into_iter()
                .map(|url| CaptureRecord::new(url.trim(), "input")),
        );

        Ok(ToolResult::success_with(serde_json::json!({
            "count": results.len(),
            "results": results,
        })))
    }
}
