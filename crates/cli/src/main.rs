//! timebar CLI - time progress bars for a README.
//!
//! Runs as a GitHub Action (inputs arrive as `INPUT_*` environment
//! variables) or by hand against a local file.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use timebar_core::{
    ActionConfig, BarLength, BlockAlphabet, RenderConfig, RepositoryId, UtcOffset,
};
use timebar_progress::{
    now_in, ProgressError, ProgressSnapshot, ReadmeUpdater, Report, UpdateOutcome,
};
use timebar_storage::{GitHubContentStore, LocalFileStore, StorageError};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const AUTH_HINT: &str = "Try saving a GitHub Token in your Repo Secrets or use the GitHub Actions token, which is automatically used by the action.";

#[derive(Parser)]
#[command(name = "timebar")]
#[command(about = "Keep year, month and week progress bars in your README", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    render: RenderArgs,
}

#[derive(Args)]
struct RenderArgs {
    /// Glyphs from empty to full, at least two
    #[arg(long, global = true, env = "INPUT_BLOCKS", default_value = BlockAlphabet::DEFAULT)]
    blocks: BlockAlphabet,

    /// UTC offset in whole hours (-12 to 14)
    #[arg(long, global = true, env = "INPUT_TIME_ZONE", default_value = "0", allow_hyphen_values = true)]
    time_zone: UtcOffset,

    /// Glyphs per bar (1 to 1000)
    #[arg(long, global = true, env = "INPUT_BAR_LENGTH", default_value = "30")]
    bar_length: BarLength,
}

impl RenderArgs {
    fn config(&self) -> RenderConfig {
        RenderConfig {
            alphabet: self.blocks.clone(),
            bar_length: self.bar_length,
            offset: self.time_zone,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Update the README of a GitHub repository
    Update {
        /// Repository as owner/name (defaults to GITHUB_REPOSITORY)
        #[arg(long, env = "INPUT_REPOSITORY")]
        repository: Option<RepositoryId>,

        /// GitHub access token
        #[arg(long, env = "INPUT_GH_TOKEN", hide_env_values = true)]
        token: String,

        /// Commit message
        #[arg(long, env = "INPUT_COMMIT_MESSAGE", default_value = ActionConfig::DEFAULT_COMMIT_MESSAGE)]
        commit_message: String,

        /// GitHub REST API base URL
        #[arg(long, env = "GITHUB_API_URL", default_value = ActionConfig::DEFAULT_API_URL)]
        api_url: String,
    },
    /// Update a README on disk
    Local {
        /// README path
        #[arg(default_value = "README.md")]
        path: PathBuf,

        /// Print the patched file instead of writing it
        #[arg(long)]
        dry_run: bool,
    },
    /// Print the report block
    Render {
        /// Print the raw ratios as JSON instead
        #[arg(long)]
        json: bool,
    },
}

fn init_logging() {
    // stdout carries `render` and `--dry-run` output
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();
    let render = cli.render.config();

    match cli.command {
        Commands::Update {
            repository,
            token,
            commit_message,
            api_url,
        } => {
            let repository =
                resolve_repository(repository, std::env::var("GITHUB_REPOSITORY").ok())?;
            let config = ActionConfig::new(render, repository, token)?
                .with_commit_message(commit_message)
                .with_api_url(api_url);

            let store = GitHubContentStore::from_config(&config)?;
            info!("Updating README of {}", store.repository());
            let updater = ReadmeUpdater::from_config(store, &config);
            let outcome = updater.run().await.map_err(with_hint)?;
            report_outcome(&outcome);
        }
        Commands::Local { path, dry_run } => {
            let updater = ReadmeUpdater::new(LocalFileStore::new(&path), render.clone());
            info!("Updating {}", updater.store().path().display());
            if dry_run {
                let (_, patched) = updater
                    .preview_at(now_in(render.offset))
                    .await
                    .with_context(|| format!("Failed to patch {}", path.display()))?;
                print!("{}", patched);
            } else {
                let outcome = updater
                    .run()
                    .await
                    .with_context(|| format!("Failed to update {}", path.display()))?;
                report_outcome(&outcome);
            }
        }
        Commands::Render { json } => {
            let snapshot = ProgressSnapshot::current(render.offset)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
            } else {
                print!("{}", timebar_progress::format_report(&Report::build(&snapshot, &render)));
            }
        }
    }

    Ok(())
}

/// Repository from the flag or `INPUT_REPOSITORY`, else the workflow's own
/// `GITHUB_REPOSITORY`.
fn resolve_repository(
    repository: Option<RepositoryId>,
    fallback: Option<String>,
) -> Result<RepositoryId> {
    if let Some(repo) = repository {
        return Ok(repo);
    }
    let fallback =
        fallback.context("No repository given and GITHUB_REPOSITORY is not set")?;
    fallback
        .parse()
        .with_context(|| format!("Invalid GITHUB_REPOSITORY '{}'", fallback))
}

fn report_outcome(outcome: &UpdateOutcome) {
    match outcome {
        UpdateOutcome::Unchanged => info!("No changes to commit"),
        UpdateOutcome::Updated { path } => info!("Updated {}", path),
    }
}

fn with_hint(err: ProgressError) -> anyhow::Error {
    if matches!(err, ProgressError::Storage(StorageError::Authentication { .. })) {
        warn!("{}", AUTH_HINT);
        return anyhow::Error::new(err).context(format!("Authentication Error. {}", AUTH_HINT));
    }
    if matches!(err, ProgressError::MissingRegion) {
        return anyhow::Error::new(err)
            .context("Add the progress bar markers to your README before running the action");
    }
    err.into()
}
