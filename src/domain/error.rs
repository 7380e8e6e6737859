//! Error types for the verse navigation coordinator.
//!
//! This module defines the centralized error type [`BrowserError`] and a type alias
//! [`Result`] used throughout the crate. All errors are implemented using the
//! `thiserror` crate for automatic `Error` trait implementation.
//!
//! A response that arrives for a superseded request is deliberately *not* an
//! error: it is dropped at the application boundary and only traced.

use thiserror::Error;

/// The main error type for coordinator operations.
///
/// # Examples
///
/// ```
/// use versenav::BrowserError;
///
/// fn select() -> Result<(), BrowserError> {
///     Err(BrowserError::InvalidBook { code: "Xyz".to_string() })
/// }
///
/// assert!(select().is_err());
/// ```
#[derive(Debug, Error)]
pub enum BrowserError {
    /// The selected book code is not part of the active translation's catalog.
    ///
    /// The selection is aborted and the tab state is left unchanged.
    #[error("Invalid book: {code} is not available in the current translation")]
    InvalidBook {
        /// Book code that was requested.
        code: String,
    },

    /// Tag id and title lists differ in length.
    ///
    /// This is a contract violation by the caller, not a recoverable user error.
    #[error("Inconsistent tag selection: {ids} ids but {titles} titles")]
    InconsistentSelection {
        /// Number of ids supplied.
        ids: usize,
        /// Number of titles supplied.
        titles: usize,
    },

    /// Writing the exported document to its sink failed.
    ///
    /// The export action stays retryable; no application state was modified.
    #[error("Export failed: {0}")]
    ExportIo(#[source] std::io::Error),

    /// Settings storage operation failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Communication with the collaborator worker failed.
    #[error("Worker communication error: {0}")]
    Worker(String),
}

/// A specialized `Result` type for coordinator operations.
pub type Result<T> = std::result::Result<T, BrowserError>;
