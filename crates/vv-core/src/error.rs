//! Unified error type for vidvault.
//!
//! All crates funnel their failures into [`Error`], which carries enough context
//! for API handlers to derive an HTTP status code via [`Error::http_status`].

use std::fmt;

/// Unified error type covering all failure modes in vidvault.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested entity could not be found.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of entity (e.g. "video", "file").
        entity: String,
        /// The identifier that was looked up.
        id: String,
    },

    /// The `Range` header could not be satisfied against the file.
    #[error("Range not satisfiable: {reason}")]
    RangeNotSatisfiable {
        /// Why the header was rejected.
        reason: String,
        /// Actual size of the file in bytes, echoed in `Content-Range`.
        file_size: u64,
    },

    /// Request data failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The request body exceeded the configured limit.
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// A database operation failed.
    #[error("Database error: {source}")]
    Database {
        /// The underlying database error.
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// An I/O operation failed.
    #[error("IO error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Catch-all for unexpected internal errors.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Map this error to an appropriate HTTP status code.
    pub fn http_status(&self) -> u16 {
        match self {
            Error::NotFound { .. } => 404,
            Error::RangeNotSatisfiable { .. } => 416,
            Error::Validation(_) => 400,
            Error::PayloadTooLarge(_) => 413,
            Error::Database { .. } => 500,
            Error::Io { .. } => 500,
            Error::Internal(_) => 500,
        }
    }

    /// Convenience constructor for [`Error::NotFound`].
    pub fn not_found(entity: impl Into<String>, id: impl fmt::Display) -> Self {
        Error::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Convenience constructor for [`Error::Database`].
    pub fn database(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Error::Database {
            source: source.into(),
        }
    }

    /// Convenience constructor for [`Error::RangeNotSatisfiable`].
    pub fn range_not_satisfiable(reason: impl Into<String>, file_size: u64) -> Self {
        Error::RangeNotSatisfiable {
            reason: reason.into(),
            file_size,
        }
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_display() {
        let err = Error::not_found("video", "abc-123");
        assert_eq!(err.to_string(), "video not found: abc-123");
        assert_eq!(err.http_status(), 404);
    }

    #[test]
    fn range_not_satisfiable_display() {
        let err = Error::range_not_satisfiable("start 900 is beyond end of file", 100);
        assert_eq!(
            err.to_string(),
            "Range not satisfiable: start 900 is beyond end of file"
        );
        assert_eq!(err.http_status(), 416);
        assert!(matches!(
            err,
            Error::RangeNotSatisfiable { file_size: 100, .. }
        ));
    }

    #[test]
    fn validation_display() {
        let err = Error::Validation("title is required".into());
        assert_eq!(err.to_string(), "Validation error: title is required");
        assert_eq!(err.http_status(), 400);
    }

    #[test]
    fn payload_too_large_status() {
        let err = Error::PayloadTooLarge("limit is 1 MB".into());
        assert_eq!(err.http_status(), 413);
    }

    #[test]
    fn database_display() {
        let err = Error::database("connection refused");
        assert!(err.to_string().contains("connection refused"));
        assert_eq!(err.http_status(), 500);
    }

    #[test]
    fn io_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err = Error::from(io_err);
        assert!(matches!(err, Error::Io { .. }));
        assert_eq!(err.http_status(), 500);
    }

    #[test]
    fn internal_display() {
        let err = Error::Internal("unexpected state".into());
        assert_eq!(err.to_string(), "Internal error: unexpected state");
        assert_eq!(err.http_status(), 500);
    }
}
