use thiserror::Error;

/// Errors surfaced by the extraction pipeline
///
/// Only failures that prevent an extraction run from starting are returned to
/// callers. Navigation, title reads, page close and malformed capture payloads
/// are recovered inside the run and never become a `BrowserError`.
#[derive(Debug, Error)]
pub enum BrowserError {
    /// The browser process could not be started
    #[error("Failed to launch browser: {0}")]
    LaunchFailed(String),

    /// Creating, configuring or closing a tab failed
    #[error("Tab operation failed: {0}")]
    TabOperationFailed(String),

    /// Navigation to the target URL failed
    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    /// JavaScript evaluation in the page failed
    #[error("JavaScript evaluation failed: {0}")]
    EvaluationFailed(String),

    /// The instrumentation script or page listeners could not be installed
    #[error("Failed to instrument page: {0}")]
    InstrumentationFailed(String),

    /// The target is not an absolute http(s) URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Tool parameters did not match the tool's schema
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    /// No tool registered under the given name
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// A tool ran but could not complete
    #[error("Tool '{tool}' failed: {reason}")]
    ToolExecutionFailed { tool: String, reason: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, BrowserError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BrowserError::ToolExecutionFailed {
            tool: "extract_media".to_string(),
            reason: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "Tool 'extract_media' failed: boom");

        let err = BrowserError::LaunchFailed("no chrome".to_string());
        assert_eq!(err.to_string(), "Failed to launch browser: no chrome");
    }

    #[test]
    fn test_serde_error_conversion() {
        let parse: std::result::Result<serde_json::Value, _> = serde_json::from_str("{");
        let err: BrowserError = parse.unwrap_err().into();
        assert!(matches!(err, BrowserError::Serialization(_)));
    }
}
