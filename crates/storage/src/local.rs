//! Local file content store.
//!
//! Rewrites a README on disk. The revision token is a size + mtime
//! fingerprint, so a file edited between fetch and update is not clobbered.

use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use async_trait::async_trait;
use timebar_core::RemoteDocument;
use tokio::fs;
use tracing::{debug, info};

use super::{ContentStore, Result, StorageError};

/// File-backed content store.
pub struct LocalFileStore {
    path: PathBuf,
}

impl LocalFileStore {
    /// Create a store for the README at `path`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// File this store reads and writes.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn fingerprint(&self) -> Result<String> {
        let meta = fs::metadata(&self.path).await?;
        let modified = meta
            .modified()
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| d.as_nanos())
            .unwrap_or_default();
        Ok(format!("{}-{}", meta.len(), modified))
    }
}

#[async_trait]
impl ContentStore for LocalFileStore {
    async fn fetch_document(&self) -> Result<RemoteDocument> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound(self.path.display().to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        let revision = self.fingerprint().await?;
        debug!("Read {} ({} bytes)", self.path.display(), content.len());

        Ok(RemoteDocument {
            content,
            path: self.path.display().to_string(),
            revision,
        })
    }

    async fn update_document(
        &self,
        _path: &str,
        content: &str,
        revision: &str,
        message: &str,
    ) -> Result<()> {
        let current = self.fingerprint().await?;
        if current != revision {
            return Err(StorageError::Conflict(format!(
                "{} changed on disk since it was read",
                self.path.display()
            )));
        }

        fs::write(&self.path, content.as_bytes()).await?;
        info!("Wrote {} ({})", self.path.display(), message);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_and_update() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("README.md");
        fs::write(&path, "hello").await.unwrap();

        let store = LocalFileStore::new(&path);
        let doc = store.fetch_document().await.unwrap();
        assert_eq!(doc.content, "hello");

        store
            .update_document(&doc.path, "hello, world", &doc.revision, "update")
            .await
            .unwrap();
        assert_eq!(fs::read_to_string(&path).await.unwrap(), "hello, world");
    }

    #[tokio::test]
    async fn test_stale_revision_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("README.md");
        fs::write(&path, "one").await.unwrap();

        let store = LocalFileStore::new(&path);
        let doc = store.fetch_document().await.unwrap();

        // Size changes, so the fingerprint moves even on coarse mtime clocks.
        fs::write(&path, "someone else").await.unwrap();

        let result = store
            .update_document(&doc.path, "mine", &doc.revision, "update")
            .await;
        assert!(matches!(result, Err(StorageError::Conflict(_))));
        assert_eq!(fs::read_to_string(&path).await.unwrap(), "someone else");
    }

    #[tokio::test]
    async fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalFileStore::new(dir.path().join("nope.md"));
        assert!(matches!(
            store.fetch_document().await,
            Err(StorageError::NotFound(_))
        ));
    }
}
