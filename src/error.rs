//! Error types for the export pipeline.
//!
//! Errors fall into two groups: those that end a run (`ExportError`) and those that only
//! cost a single record (`TransformError`). The pagination driver decides which is which.

use thiserror::Error;

/// Result alias used across the library.
pub type Result<T> = std::result::Result<T, ExportError>;

/// Errors that terminate an export run or one of its setup steps.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Invalid command-line or prompted input.
    #[error("configuration error: {0}")]
    Config(String),

    /// The remote site could not be reached or rejected the session.
    #[error("failed to connect to {site}: {message}")]
    Connection { site: String, message: String },

    /// A listing call against the library failed.
    #[error("failed to fetch items from '{library}': {message}")]
    Fetch { library: String, message: String },

    /// Releasing the remote session failed. Logged, never fatal.
    #[error("failed to disconnect: {0}")]
    Disconnect(String),

    /// The output workbook could not be built or saved.
    #[error("failed to write spreadsheet: {0}")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A single source record could not be turned into an output row.
///
/// Carries the file name when it was already extracted so the log line can point at the
/// offending file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to process file '{}': {}", .file_name.as_deref().unwrap_or("<unknown>"), .cause)]
pub struct TransformError {
    pub file_name: Option<String>,
    pub cause: String,
}

impl TransformError {
    pub fn new(file_name: Option<String>, cause: impl Into<String>) -> Self {
        Self {
            file_name,
            cause: cause.into(),
        }
    }
}
