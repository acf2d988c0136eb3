//! Time progress (Layer 2)
//!
//! Year, month and week completion, glyph bars, the README report block and
//! the pass that writes it back.

#![warn(missing_docs)]

mod error;

pub mod calculator;
pub mod bar;
pub mod report;
pub mod patcher;
pub mod updater;

pub use error::{ProgressError, Result};
pub use calculator::{compute_ratio, now_in, window_for, ProgressSnapshot};
pub use bar::{render, ProgressBar};
pub use report::{format_report, Report, ReportLine};
pub use patcher::{extract, patch};
pub use updater::{ReadmeUpdater, UpdateOutcome};
