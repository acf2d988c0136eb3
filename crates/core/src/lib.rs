//! timebar core data models.
//!
//! Configuration values, time windows and documents shared by the
//! storage backends and the progress renderer.

#![warn(missing_docs)]

mod config;
mod document;
mod window;

pub use config::{
    ActionConfig, BarLength, BlockAlphabet, ConfigError, RenderConfig, RepositoryId, UtcOffset,
};
pub use document::{RemoteDocument, END_SENTINEL, START_SENTINEL};
pub use window::{Period, ProgressRatio, TimeWindow};

/// Timestamp in the configured offset.
pub type LocalTime = chrono::DateTime<chrono::FixedOffset>;
