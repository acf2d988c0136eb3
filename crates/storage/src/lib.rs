//! Content store abstraction and implementations for timebar.
//!
//! This crate provides a trait-based interface to wherever the README lives,
//! with a GitHub REST implementation plus local-file and in-memory stores.

#![warn(missing_docs)]

pub mod trait_;
pub mod github;
pub mod local;
pub mod memory;

pub use trait_::{ContentStore, StorageError, Result};
pub use github::GitHubContentStore;
pub use local::LocalFileStore;
pub use memory::{Commit, MemoryContentStore};
