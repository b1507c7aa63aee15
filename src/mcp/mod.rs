//! MCP (Model Context Protocol) server for media extraction
//!
//! This module exposes the tool registry through rmcp. Extraction blocks on
//! the browser, so it runs on tokio's blocking pool.

pub mod handler;
pub use handler::MediaServer;

use crate::error::BrowserError;
use crate::tools::{ClassifyMediaParams, ExtractMediaParams, ToolContext, ToolResult as InternalToolResult};
use rmcp::{
    ErrorData as McpError,
    handler::server::wrapper::Parameters,
    model::{CallToolResult, Content},
    tool, tool_router,
};

/// Convert internal ToolResult to MCP CallToolResult
fn convert_result(result: InternalToolResult) -> Result<CallToolResult, McpError> {
    if result.success {
        let text = if let Some(data) = result.data {
            serde_json::to_string_pretty(&data).unwrap_or_else(|_| data.to_string())
        } else {
            "Success".to_string()
        };
        Ok(CallToolResult::success(vec![Content::text(text)]))
    } else {
        let error_msg = result.error.unwrap_or_else(|| "Unknown error".to_string());
        Err(McpError::internal_error(error_msg, None))
    }
}

fn convert_error(error: BrowserError) -> McpError {
    match error {
        BrowserError::InvalidUrl(_) | BrowserError::InvalidParams(_) => {
            McpError::invalid_params(error.to_string(), None)
        }
        other => McpError::internal_error(other.to_string(), None),
    }
}

#[tool_router]
impl MediaServer {
    /// Extract media URLs from a web page
    #[tool(
        description = "Load a web page in a headless browser and list every video, audio and image URL it loads or references. Results from well-known media hosts come first."
    )]
    async fn extract_media(&self, params: Parameters<ExtractMediaParams>) -> Result<CallToolResult, McpError> {
        let extractor = self.extractor();
        let registry = self.registry();
        let tool_params =
            serde_json::to_value(&params.0).map_err(|e| McpError::invalid_params(e.to_string(), None))?;

        let result = tokio::task::spawn_blocking(move || {
            let mut context = ToolContext::new(&extractor);
            registry.execute("extract_media", tool_params, &mut context)
        })
        .await
        .map_err(|e| McpError::internal_error(format!("Extraction task failed: {}", e), None))?
        .map_err(convert_error)?;

        convert_result(result)
    }

    /// Classify a list of media URLs
    #[tool(description = "Classify media URLs as image, audio or video without loading them, dropping duplicates")]
    fn classify_media(&self, params: Parameters<ClassifyMediaParams>) -> Result<CallToolResult, McpError> {
        let extractor = self.extractor();
        let mut context = ToolContext::new(&extractor);

        let tool_params = serde_json::json!({ "urls": params.0.urls });

        let result = self
            .registry()
            .execute("classify_media", tool_params, &mut context)
            .map_err(convert_error)?;

        convert_result(result)
    }
}
