//! README documents and the markers that delimit the generated section.

use serde::{Deserialize, Serialize};

/// Marker opening the generated section.
pub const START_SENTINEL: &str = "<!-- Start of Time Progress Bar -->";

/// Marker closing the generated section.
pub const END_SENTINEL: &str = "<!-- End of Time Progress Bar -->";

/// A document fetched from a content store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteDocument {
    /// Decoded text
    pub content: String,

    /// Path inside the repository (or on disk)
    pub path: String,

    /// Revision token; writes are rejected if the document moved past it
    pub revision: String,
}
