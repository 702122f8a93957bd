//! Error types for the fileconv-client library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`ValidationError`] — **Pre-request**: the pending selection is not
//!   complete (no file, too few files, empty page ranges). Raised before any
//!   network call; its `Display` text is the exact message shown to the user.
//!
//! * [`FileConvError`] — **Everything else**: reading an upload from disk,
//!   the HTTP round trip, writing a downloaded artifact, bad configuration.
//!
//! Request failures never reach the user verbatim. The workflows collapse
//! them to one generic message per workflow (see
//! [`crate::operation::ImageOperationKind::failure_message`]) and only log the
//! underlying [`FileConvError`].

use std::path::PathBuf;
use thiserror::Error;

/// A pending selection that cannot be submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Image workflow without a selected file.
    #[error("Please select a file")]
    NoImageSelected,

    /// Merge with zero or one file.
    #[error("Please select at least two PDF files to merge")]
    TooFewPdfsToMerge,

    /// Split without a selected file.
    #[error("Please select a PDF file to split")]
    NoPdfToSplit,

    /// Split by page ranges with an empty range expression.
    #[error("Please enter page ranges")]
    EmptyPageRanges,

    /// Split by count with an empty or non-numeric count.
    #[error("Please enter a valid page count")]
    InvalidPageCount,
}

/// All fatal errors returned by the fileconv-client library.
#[derive(Debug, Error)]
pub enum FileConvError {
    // ── Selection errors ──────────────────────────────────────────────────
    /// The pending selection failed client-side validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    // ── Upload errors ─────────────────────────────────────────────────────
    /// Upload file was not found at the given path.
    #[error("File not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists but could not be read.
    #[error("Failed to read '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Request errors ────────────────────────────────────────────────────
    /// The request could not be sent or the response body could not be read.
    #[error("Request to '{url}' failed: {reason}")]
    RequestFailed { url: String, reason: String },

    /// The backend answered with a non-2xx status.
    #[error("Backend returned HTTP {status} for '{url}'")]
    HttpStatus { url: String, status: u16 },

    // ── Output errors ─────────────────────────────────────────────────────
    /// Could not create or write a downloaded artifact.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl FileConvError {
    /// True for failures of the HTTP round trip itself.
    ///
    /// These are the errors a workflow hides behind its generic message.
    pub fn is_request_failure(&self) -> bool {
        matches!(
            self,
            FileConvError::RequestFailed { .. } | FileConvError::HttpStatus { .. }
        )
    }
}
