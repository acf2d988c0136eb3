//! In-memory content store.

use async_trait::async_trait;
use timebar_core::RemoteDocument;
use tokio::sync::Mutex;

use super::{ContentStore, Result, StorageError};

/// A commit recorded by [`MemoryContentStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    /// Path written
    pub path: String,

    /// Commit message
    pub message: String,

    /// Content after the commit
    pub content: String,
}

#[derive(Debug)]
struct State {
    content: String,
    revision: u64,
    commits: Vec<Commit>,
}

/// Holds a single README in memory and records every commit.
#[derive(Debug)]
pub struct MemoryContentStore {
    path: String,
    state: Mutex<State>,
}

impl MemoryContentStore {
    /// Create a store holding `content` at `README.md`.
    pub fn new(content: impl Into<String>) -> Self {
        Self::with_path("README.md", content)
    }

    /// Create a store holding `content` at `path`.
    pub fn with_path(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            state: Mutex::new(State {
                content: content.into(),
                revision: 1,
                commits: Vec::new(),
            }),
        }
    }

    /// Current content.
    pub async fn content(&self) -> String {
        self.state.lock().await.content.clone()
    }

    /// Commits made so far, oldest first.
    pub async fn commits(&self) -> Vec<Commit> {
        self.state.lock().await.commits.clone()
    }

    /// Replace the content out of band, bumping the revision.
    pub async fn overwrite(&self, content: impl Into<String>) {
        let mut state = self.state.lock().await;
        state.content = content.into();
        state.revision += 1;
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    async fn fetch_document(&self) -> Result<RemoteDocument> {
        let state = self.state.lock().await;
        Ok(RemoteDocument {
            content: state.content.clone(),
            path: self.path.clone(),
            revision: state.revision.to_string(),
        })
    }

    async fn update_document(
        &self,
        path: &str,
        content: &str,
        revision: &str,
        message: &str,
    ) -> Result<()> {
        if path != self.path {
            return Err(StorageError::NotFound(path.to_string()));
        }

        let mut state = self.state.lock().await;
        if state.revision.to_string() != revision {
            return Err(StorageError::Conflict(format!(
                "{} is at revision {}, not {}",
                path, state.revision, revision
            )));
        }

        state.content = content.to_string();
        state.revision += 1;
        state.commits.push(Commit {
            path: path.to_string(),
            message: message.to_string(),
            content: content.to_string(),
        });
        Ok(())
    }
}
