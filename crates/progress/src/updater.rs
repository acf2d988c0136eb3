//! One fetch-render-patch-commit pass over a README.

use timebar_core::{ActionConfig, LocalTime, RemoteDocument, RenderConfig};
use timebar_storage::ContentStore;
use tracing::{debug, info};

use crate::calculator::{now_in, ProgressSnapshot};
use crate::patcher::patch;
use crate::report::{format_report, Report};
use crate::Result;

/// What an update pass did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The README already held this report; nothing was written
    Unchanged,

    /// The README was rewritten
    Updated {
        /// Path that was written
        path: String,
    },
}

/// Rewrites the progress section of the README held by a [`ContentStore`].
pub struct ReadmeUpdater<S: ContentStore> {
    store: S,
    config: RenderConfig,
    commit_message: String,
}

impl<S: ContentStore> ReadmeUpdater<S> {
    /// Create an updater using the default commit message.
    pub fn new(store: S, config: RenderConfig) -> Self {
        Self {
            store,
            config,
            commit_message: ActionConfig::DEFAULT_COMMIT_MESSAGE.to_string(),
        }
    }

    /// Create an updater from the action configuration.
    pub fn from_config(store: S, config: &ActionConfig) -> Self {
        Self::new(store, config.render.clone()).with_commit_message(config.commit_message.clone())
    }

    /// Override the commit message.
    pub fn with_commit_message(mut self, message: impl Into<String>) -> Self {
        self.commit_message = message.into();
        self
    }

    /// Underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Report text for `now`.
    pub fn render_report(&self, now: LocalTime) -> Result<String> {
        let snapshot = ProgressSnapshot::take(now)?;
        Ok(format_report(&Report::build(&snapshot, &self.config)))
    }

    /// Fetch the README and return it patched for `now`, without writing.
    pub async fn preview_at(&self, now: LocalTime) -> Result<(RemoteDocument, String)> {
        let document = self.store.fetch_document().await?;
        let report = self.render_report(now)?;
        let patched = patch(&document.content, &report)?;
        Ok((document, patched))
    }

    /// Run a pass at the current instant in the configured offset.
    pub async fn run(&self) -> Result<UpdateOutcome> {
        self.run_at(now_in(self.config.offset)).await
    }

    /// Run a pass as of `now`; writes only when the README changes.
    pub async fn run_at(&self, now: LocalTime) -> Result<UpdateOutcome> {
        let (document, patched) = self.preview_at(now).await?;

        if patched == document.content {
            info!("{} is already up to date", document.path);
            return Ok(UpdateOutcome::Unchanged);
        }

        debug!(
            "Writing {} ({} -> {} bytes)",
            document.path,
            document.content.len(),
            patched.len()
        );
        self.store
            .update_document(&document.path, &patched, &document.revision, &self.commit_message)
            .await?;

        Ok(UpdateOutcome::Updated {
            path: document.path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patcher::extract;
    use crate::ProgressError;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use timebar_core::{UtcOffset, END_SENTINEL, START_SENTINEL};
    use timebar_storage::{MemoryContentStore, StorageError};

    fn readme() -> String {
        format!(
            "# Hi there\n\n{}\nstale\n{}\n\nBye\n",
            START_SENTINEL, END_SENTINEL
        )
    }

    fn config() -> RenderConfig {
        RenderConfig {
            offset: UtcOffset::new(8).unwrap(),
            ..Default::default()
        }
    }

    fn now() -> LocalTime {
        UtcOffset::new(8)
            .unwrap()
            .fixed_offset()
            .with_ymd_and_hms(2024, 7, 2, 9, 30, 0)
            .unwrap()
    }

    #[tokio::test]
    async fn test_run_commits_patched_readme() {
        let updater = ReadmeUpdater::new(MemoryContentStore::new(readme()), config())
            .with_commit_message("Update progress");

        let outcome = updater.run_at(now()).await.unwrap();
        assert_eq!(
            outcome,
            UpdateOutcome::Updated {
                path: "README.md".to_string()
            }
        );

        let commits = updater.store().commits().await;
        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].message, "Update progress");

        let content = updater.store().content().await;
        assert!(content.starts_with("# Hi there\n\n"));
        assert!(content.ends_with("\n\nBye\n"));
        assert_eq!(
            extract(&content),
            Some(updater.render_report(now()).unwrap().as_str())
        );
        assert!(content.contains("UTC+8"));
    }

    #[tokio::test]
    async fn test_second_run_at_same_instant_is_noop() {
        let updater = ReadmeUpdater::new(MemoryContentStore::new(readme()), config());

        updater.run_at(now()).await.unwrap();
        let outcome = updater.run_at(now()).await.unwrap();

        assert_eq!(outcome, UpdateOutcome::Unchanged);
        assert_eq!(updater.store().commits().await.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_section_is_fatal() {
        let store = MemoryContentStore::new("# No markers here\n");
        let updater = ReadmeUpdater::new(store, config());

        let err = updater.run_at(now()).await.unwrap_err();
        assert!(matches!(err, ProgressError::MissingRegion));
        assert!(updater.store().commits().await.is_empty());
        assert_eq!(updater.store().content().await, "# No markers here\n");
    }

    #[tokio::test]
    async fn test_preview_does_not_write() {
        let updater = ReadmeUpdater::new(MemoryContentStore::new(readme()), config());

        let (original, patched) = updater.preview_at(now()).await.unwrap();
        assert_eq!(original.content, readme());
        assert_ne!(patched, readme());
        assert!(updater.store().commits().await.is_empty());
    }

    /// Store whose README is rewritten by someone else right after each fetch.
    struct RacedStore {
        inner: MemoryContentStore,
    }

    #[async_trait]
    impl ContentStore for RacedStore {
        async fn fetch_document(&self) -> timebar_storage::Result<RemoteDocument> {
            let document = self.inner.fetch_document().await?;
            self.inner.overwrite(document.content.clone()).await;
            Ok(document)
        }

        async fn update_document(
            &self,
            path: &str,
            content: &str,
            revision: &str,
            message: &str,
        ) -> timebar_storage::Result<()> {
            self.inner.update_document(path, content, revision, message).await
        }
    }

    #[tokio::test]
    async fn test_concurrent_edit_is_conflict() {
        let store = RacedStore {
            inner: MemoryContentStore::with_path("README.md", readme()),
        };
        let updater = ReadmeUpdater::new(store, config());

        let err = updater.run_at(now()).await.unwrap_err();
        assert!(matches!(err, ProgressError::Storage(StorageError::Conflict(_))));
        assert!(updater.store().inner.commits().await.is_empty());
        assert_eq!(updater.store().inner.content().await, readme());
    }
}
