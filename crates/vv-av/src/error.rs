//! Error types for vv-av.

use std::io;
use std::path::PathBuf;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while running external media tools.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required external tool is not available.
    #[error("tool not found: {tool}")]
    ToolNotFound { tool: String },

    /// An external tool failed to spawn or exited non-zero.
    #[error("tool execution failed: {tool}: {message}")]
    ToolFailed { tool: String, message: String },

    /// A local file operation around a tool run failed.
    #[error("I/O error during {op} of {}: {source}", path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// Create a tool not found error.
    pub fn tool_not_found(tool: impl Into<String>) -> Self {
        Self::ToolNotFound { tool: tool.into() }
    }

    /// Create a tool execution failed error.
    pub fn tool_failed(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ToolFailed {
            tool: tool.into(),
            message: message.into(),
        }
    }

    pub fn io(op: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            op,
            path: path.into(),
            source,
        }
    }
}

impl From<Error> for vv_core::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::ToolNotFound { tool } => {
                vv_core::Error::external(tool.clone(), format!("{tool} not found; is it installed and in PATH?"))
            }
            Error::ToolFailed { tool, message } => vv_core::Error::external(tool, message),
            Error::Io { op, path, source } => {
                vv_core::Error::io(op, path.display().to_string(), source)
            }
        }
    }
}
