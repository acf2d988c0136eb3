//! Content store trait abstraction.

use async_trait::async_trait;
use timebar_core::RemoteDocument;

/// Error type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur while reading or writing the README.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Credentials rejected or repository not reachable with them
    #[error("Authentication error (status {status}): {message}")]
    Authentication {
        /// HTTP status returned by the API
        status: u16,
        /// Response body or reason
        message: String,
    },

    /// Document changed since it was fetched
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Any other non-success API response
    #[error("API error (status {status}): {body}")]
    Api {
        /// HTTP status returned by the API
        status: u16,
        /// Response body
        body: String,
    },

    /// Transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Content was not valid base64
    #[error("Base64 decode error: {0}")]
    Decode(#[from] base64::DecodeError),

    /// Content was not valid UTF-8
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Document not found
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Where the README lives.
///
/// A store is bound to one repository (or file) at construction; every call
/// is attempted exactly once, with no retry.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Fetch the current README with its path and revision token.
    async fn fetch_document(&self) -> Result<RemoteDocument>;

    /// Replace the README at `path`.
    ///
    /// `revision` must be the token returned by [`ContentStore::fetch_document`];
    /// the write is rejected with [`StorageError::Conflict`] if the document
    /// moved on since.
    async fn update_document(
        &self,
        path: &str,
        content: &str,
        revision: &str,
        message: &str,
    ) -> Result<()>;
}
