use std::path::PathBuf;
use thiserror::Error;

/// drugcheck-arch error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Config validation error: {0}")]
    ConfigValidation(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Duplicate node id: {0}")]
    DuplicateNode(String),

    #[error("Duplicate cluster id: {0}")]
    DuplicateCluster(String),

    #[error("Unknown cluster: {0}")]
    UnknownCluster(String),

    #[error("Edge {from} -> {to} references undeclared node {missing}")]
    UnknownNode {
        from: String,
        to: String,
        missing: String,
    },

    #[error("Layout engine `{engine}` is not available: {reason}")]
    EngineUnavailable { engine: String, reason: String },

    #[error("Layout engine failed: {0}")]
    Render(String),

    #[error("Output path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("Invalid output {path}: {message}")]
    InvalidOutput { path: PathBuf, message: String },
}

/// Result type alias for drugcheck-arch operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a config validation error
    pub fn config_validation(msg: impl Into<String>) -> Self {
        Error::ConfigValidation(msg.into())
    }

    /// Create an unknown-node error for an edge
    pub fn unknown_node(
        from: impl Into<String>,
        to: impl Into<String>,
        missing: impl Into<String>,
    ) -> Self {
        Error::UnknownNode {
            from: from.into(),
            to: to.into(),
            missing: missing.into(),
        }
    }

    /// Create an engine-unavailable error
    pub fn engine_unavailable(engine: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::EngineUnavailable {
            engine: engine.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid-output error
    pub fn invalid_output(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Error::InvalidOutput {
            path: path.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("IO error"));
    }

    #[test]
    fn test_unknown_node_display() {
        let err = Error::unknown_node("User", "Ghost", "Ghost");
        assert_eq!(
            err.to_string(),
            "Edge User -> Ghost references undeclared node Ghost"
        );
    }

    #[test]
    fn test_engine_unavailable_display() {
        let err = Error::engine_unavailable("dot", "not found on PATH");
        assert_eq!(
            err.to_string(),
            "Layout engine `dot` is not available: not found on PATH"
        );
    }

    #[test]
    fn test_config_validation_display() {
        let err = Error::config_validation("dpi must be at least 1");
        assert_eq!(err.to_string(), "Config validation error: dpi must be at least 1");
    }

    #[test]
    fn test_invalid_output_display() {
        let err = Error::invalid_output("/tmp/out.png", "missing PNG signature");
        assert!(err.to_string().contains("/tmp/out.png"));
        assert!(err.to_string().contains("missing PNG signature"));
    }

    #[test]
    fn test_render_error_display() {
        let err = Error::Render("syntax error in line 3".to_string());
        assert_eq!(err.to_string(), "Layout engine failed: syntax error in line 3");
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }
}
