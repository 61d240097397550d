//! Error types for the Ledgr client core
//!
//! Provides one error enum per boundary using thiserror.

use reqwest::StatusCode;
use thiserror::Error;

// == Storage Error Enum ==
/// Failures of a durable storage backend.
///
/// These never reach callers of the cache: the cache converts them into
/// "absent" on reads and into a no-op on writes.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Reading or writing the backing file failed
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Value could not be encoded or a stored entry could not be decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Write would exceed the configured byte quota
    #[error("Quota exceeded: {used} of {quota} bytes")]
    QuotaExceeded { used: usize, quota: usize },

    /// Storage is disabled or its lock is poisoned
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

// == API Error Enum ==
/// Failures of an HTTP call against the Ledgr backend.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Transport-level failure (connect, timeout, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status
    #[error("Request failed with status {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// Response body was not the expected JSON shape
    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

// == Raster Error Enum ==
/// Failures reported by a rasterizer.
#[derive(Error, Debug)]
pub enum RasterError {
    /// Canvas was tainted by cross-origin content that could not be fetched
    #[error("Canvas tainted by cross-origin content: {0}")]
    Tainted(String),

    /// Any other rendering failure
    #[error("Rendering failed: {0}")]
    Render(String),
}

// == Writer Error ==
/// Failure reported by a document writer.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct WriterError {
    pub message: String,
}

impl WriterError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for WriterError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

// == Export Error Enum ==
/// Failures of the document export pipeline.
#[derive(Error, Debug)]
pub enum ExportError {
    /// Region is not mounted or has no area
    #[error("Export target unavailable: {0}")]
    TargetUnavailable(String),

    /// Rasterizer failed or produced an empty bitmap
    #[error("Rasterization failed: {0}")]
    RasterizationFailed(String),

    /// Document writer failed while building or saving
    #[error("Document writer failed: {0}")]
    WriterFailed(String),

    /// Another export is still in flight
    #[error("An export is already in progress")]
    Busy,
}

impl From<RasterError> for ExportError {
    fn from(e: RasterError) -> Self {
        ExportError::RasterizationFailed(e.to_string())
    }
}

impl From<WriterError> for ExportError {
    fn from(e: WriterError) -> Self {
        ExportError::WriterFailed(e.message)
    }
}

impl ExportError {
    /// Message shown to the user for any export failure.
    pub fn user_message(&self) -> &'static str {
        match self {
            ExportError::Busy => "Export already in progress",
            _ => "Error generating PDF",
        }
    }
}

// == Result Type Aliases ==
/// Result of a storage backend operation.
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Result of an API call.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Result of an export.
pub type ExportResult<T> = std::result::Result<T, ExportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota_error_message() {
        let err = StorageError::QuotaExceeded {
            used: 10,
            quota: 5,
        };
        assert_eq!(err.to_string(), "Quota exceeded: 10 of 5 bytes");
    }

    #[test]
    fn test_export_errors_share_user_message() {
        let errors = [
            ExportError::TargetUnavailable("gone".to_string()),
            ExportError::RasterizationFailed("tainted".to_string()),
            ExportError::WriterFailed("disk".to_string()),
        ];
        for err in errors {
            assert_eq!(err.user_message(), "Error generating PDF");
        }
    }
}
