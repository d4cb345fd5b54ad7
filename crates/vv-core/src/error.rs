//! Unified error type for vidvault.
//!
//! All crates funnel their failures into [`Error`]. Callers mostly need to
//! tell "does not exist" apart from "bad request" and from everything else.

use std::fmt;
use std::io;

/// Unified error type covering all failure modes in vidvault.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested entity could not be found (unknown or soft-deleted).
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of entity (e.g. "video").
        entity: String,
        /// The identifier that was looked up.
        id: String,
    },

    /// The filter asked for an unsupported sort field or direction.
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    /// A storage operation failed.
    #[error("IO error during {op} of {path:?}: {source}")]
    Io {
        /// The attempted operation (e.g. "open", "create", "remove").
        op: &'static str,
        /// The path the operation was addressed to.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// An external tool (ffmpeg) failed to spawn or exited non-zero.
    #[error("External process failure [{tool}]: {message}")]
    ExternalProcess {
        /// Name of the tool that failed.
        tool: String,
        /// Human-readable error description.
        message: String,
    },

    /// A relational store operation failed.
    #[error("Database error: {0}")]
    Database(String),

    /// A record could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Catch-all for unexpected internal errors.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Map this error to an appropriate HTTP status code.
    pub fn http_status(&self) -> u16 {
        match self {
            Error::NotFound { .. } => 404,
            Error::InvalidFilter(_) => 400,
            Error::Io { .. } if self.is_not_found() => 404,
            Error::Io { .. } => 500,
            Error::ExternalProcess { .. } => 502,
            Error::Database(_) => 500,
            Error::Serialization(_) => 500,
            Error::Internal(_) => 500,
        }
    }

    /// Whether this error means "the thing does not exist".
    ///
    /// Storage errors are classified only into does-not-exist vs. everything
    /// else; this is that classification.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::NotFound { .. } => true,
            Error::Io { source, .. } => source.kind() == io::ErrorKind::NotFound,
            _ => false,
        }
    }

    /// Convenience constructor for [`Error::NotFound`].
    pub fn not_found(entity: impl Into<String>, id: impl fmt::Display) -> Self {
        Error::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Convenience constructor for a missing video.
    pub fn video_not_found(id: u64) -> Self {
        Self::not_found("video", id)
    }

    /// Convenience constructor for [`Error::Io`].
    pub fn io(op: &'static str, path: impl Into<String>, source: io::Error) -> Self {
        Error::Io {
            op,
            path: path.into(),
            source,
        }
    }

    /// Convenience constructor for [`Error::ExternalProcess`].
    pub fn external(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Error::ExternalProcess {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Convenience constructor for [`Error::Database`].
    pub fn database(msg: impl fmt::Display) -> Self {
        Error::Database(msg.to_string())
    }

    /// Convenience constructor for [`Error::InvalidFilter`].
    pub fn invalid_filter(msg: impl Into<String>) -> Self {
        Error::InvalidFilter(msg.into())
    }

    /// Convenience constructor for [`Error::Internal`].
    pub fn internal(msg: impl Into<String>) -> Self {
        Error::Internal(msg.into())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

/// Result type alias using the unified Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_error_display() {
        let err = Error::video_not_found(7);
        assert_eq!(err.to_string(), "video not found: 7");

        let err = Error::invalid_filter("unsupported sort field \"size\"");
        assert_eq!(
            err.to_string(),
            "Invalid filter: unsupported sort field \"size\""
        );

        let err = Error::external("ffmpeg", "exited with status 1");
        assert_eq!(
            err.to_string(),
            "External process failure [ffmpeg]: exited with status 1"
        );
    }

    #[test]
    fn test_io_error_names_operation() {
        let err = Error::io(
            "open",
            "3/video.mp4",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("open"), "{msg}");
        assert!(msg.contains("3/video.mp4"), "{msg}");
    }

    #[test]
    fn test_not_found_classification() {
        assert!(Error::video_not_found(1).is_not_found());
        assert!(Error::io("stat", "x", io::Error::from(io::ErrorKind::NotFound)).is_not_found());
        assert!(!Error::io("stat", "x", io::Error::from(io::ErrorKind::Other)).is_not_found());
        assert!(!Error::invalid_filter("nope").is_not_found());
    }

    #[test]
    fn test_http_status() {
        assert_eq!(Error::video_not_found(1).http_status(), 404);
        assert_eq!(Error::invalid_filter("x").http_status(), 400);
        assert_eq!(Error::external("ffmpeg", "boom").http_status(), 502);
        assert_eq!(Error::database("locked").http_status(), 500);
    }

    #[test]
    fn test_from_serde_json() {
        let err: Error = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert_matches!(err, Error::Serialization(_));
    }
}
