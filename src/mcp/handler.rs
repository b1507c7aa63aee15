use crate::browser::LaunchOptions;
use crate::extractor::MediaExtractor;
use crate::tools::ToolRegistry;
use rmcp::{
    ServerHandler,
    handler::server::router::tool::ToolRouter,
    model::{ServerCapabilities, ServerInfo},
    tool_handler,
};
use std::sync::Arc;

/// MCP server wrapping a shared [`MediaExtractor`]
///
/// Clones share the extractor, so every connection of a multi-client
/// transport uses the same browser.
#[derive(Clone)]
pub struct MediaServer {
    extractor: Arc<MediaExtractor>,
    registry: Arc<ToolRegistry>,
    tool_router: ToolRouter<Self>,
}

impl MediaServer {
    /// Create a server that launches its browser with `options` on first use
    pub fn with_options(options: LaunchOptions) -> Self {
        Self::from_extractor(Arc::new(MediaExtractor::new(options)))
    }

    pub fn from_extractor(extractor: Arc<MediaExtractor>) -> Self {
        Self {
            extractor,
            registry: Arc::new(ToolRegistry::with_defaults()),
            tool_router: Self::tool_router(),
        }
    }

    pub fn extractor(&self) -> Arc<MediaExtractor> {
        self.extractor.clone()
    }

    pub fn registry(&self) -> Arc<ToolRegistry> {
        self.registry.clone()
    }
}

impl Default for MediaServer {
    fn default() -> Self {
        Self::with_options(LaunchOptions::default())
    }
}

#[tool_handler]
impl ServerHandler for MediaServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Media extraction server. Use extract_media with a page URL to list the video, audio and image \
                 resources the page loads; use classify_media to type a list of URLs without a browser."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_lists_tools() {
        let server = MediaServer::default();
        let names: Vec<String> = server
            .tool_router
            .list_all()
            .into_iter()
            .map(|tool| tool.name.to_string())
            .collect();

        assert!(names.contains(&"extract_media".to_string()));
        assert!(names.contains(&"classify_media".to_string()));
    }

    #[test]
    fn test_clones_share_extractor() {
        let server = MediaServer::default();
        let clone = server.clone();
        assert!(Arc::ptr_eq(&server.extractor(), &clone.extractor()));
        assert!(!server.extractor().manager().is_launched());
    }

    #[test]
    fn test_server_info_enables_tools() {
        let info = MediaServer::default().get_info();
        assert!(info.capabilities.tools.is_some());
        assert!(info.instructions.is_some());
    }
}
