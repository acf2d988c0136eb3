//! Progress error type.

use timebar_core::{ConfigError, END_SENTINEL, START_SENTINEL};
use timebar_storage::StorageError;

/// Result alias for progress operations.
pub type Result<T> = std::result::Result<T, ProgressError>;

/// Errors that stop a progress update.
#[derive(Debug, thiserror::Error)]
pub enum ProgressError {
    /// Invalid configuration
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Content store failure
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// A period boundary could not be built
    #[error("Calendar error: {0}")]
    Calendar(String),

    /// The document has no generated section to replace
    #[error("No '{}' ... '{}' section found in the document", START_SENTINEL, END_SENTINEL)]
    MissingRegion,
}
