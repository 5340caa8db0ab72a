//! Main workflow orchestration logic
//!
//! Tag reading, version selection, extraction and publishing, kept apart
//! from CLI argument parsing so the workflow can be driven programmatically
//! without depending on clap.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{debug, info};

use crate::cache::SyncCache;
use crate::config::Config;
use crate::domain::VersionSelector;
use crate::error::{Result, SyncError};
use crate::extract::{
    ArchiveExtractor, CheckoutExtractor, DocLayout, ExtractionReport, SnapshotExtractor, Strategy,
};
use crate::git::{Git2Repository, Repository};
use crate::publish::{successful_keys, IndexOutcome, Publisher};
use crate::ui;
use crate::warning::SyncWarning;

/// Arguments for the sync workflow
///
/// Mirrors the CLI Args after defaults from the config file were applied.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncArgs {
    pub repo_path: PathBuf,
    pub output_dir: PathBuf,
    /// 0 keeps every minor line
    pub max_versions: usize,
    pub parallel: usize,
    pub strategy: Strategy,
    pub timeout: Duration,
    pub write_cache: bool,
}

impl SyncArgs {
    /// Workflow arguments with every setting taken from `config`
    pub fn from_config(repo_path: impl Into<PathBuf>, config: &Config) -> Self {
        SyncArgs {
            repo_path: repo_path.into(),
            output_dir: config.sync.output_dir.clone(),
            max_versions: config.sync.max_versions,
            parallel: config.sync.parallel,
            strategy: config.sync.strategy,
            timeout: Duration::from_secs(config.sync.timeout_secs),
            write_cache: config.sync.write_cache,
        }
    }
}

/// Result of a successful sync
#[derive(Debug, Clone, PartialEq)]
pub struct SyncOutcome {
    /// One report per selected version, in extraction order
    pub reports: Vec<ExtractionReport>,
    /// Successful version keys, newest first
    pub successful: Vec<String>,
    pub latest: String,
    pub index: IndexOutcome,
    /// Where the advisory cache was written, if it was
    pub cache: Option<PathBuf>,
}

/// Check that `path` is an existing directory with git metadata
pub fn validate_repo_path(path: &Path) -> Result<()> {
    if !path.exists() || !path.is_dir() {
        return Err(SyncError::repository(format!(
            "Source repository not found at {}",
            path.display()
        )));
    }
    if !path.join(".git").exists() {
        return Err(SyncError::repository(format!(
            "{} is not a git repository",
            path.display()
        )));
    }
    Ok(())
}

/// Main sync workflow
///
/// 1. Validate the source repository
/// 2. Read and select version tags
/// 3. Extract documentation for each selected version
/// 4. Publish `latest` and the index section over the successful versions
/// 5. Write the advisory cache
///
/// Fails when the repository is unusable, when no tags or no valid versions
/// exist, or when not a single version was extracted completely.
pub fn run_sync(args: &SyncArgs, config: &Config) -> Result<SyncOutcome> {
    validate_repo_path(&args.repo_path)?;
    ui::display_start(&args.strategy.to_string(), args.max_versions, args.parallel);

    fs::create_dir_all(&args.output_dir)?;
    if let Ok(Some(previous)) = SyncCache::load(&args.output_dir) {
        debug!(
            "previous sync at {} processed {:?}",
            previous.timestamp, previous.processed_versions
        );
    }

    let repo = Git2Repository::open(&args.repo_path)?;

    ui::display_status("Fetching git tags...");
    let tags = repo.list_tags_by_version()?;
    if tags.is_empty() {
        return Err(SyncError::discovery("No git tags found in repository"));
    }
    ui::display_status(&format!("Found {} tags", tags.len()));

    let selection = VersionSelector::new(args.max_versions).select(&tags);
    if selection.is_empty() {
        return Err(SyncError::discovery("No valid semantic version tags found"));
    }
    info!(
        "{} release tags, {} pre-release skipped, {} not versions",
        selection.release_tags, selection.prerelease_tags, selection.invalid_tags
    );
    ui::display_status(&format!(
        "Processing {} minor versions...",
        selection.versions.len()
    ));

    let layout = DocLayout::new(
        &args.output_dir,
        config.sync.docs_root.as_str(),
        config.sync.doc_dirs.clone(),
    );
    let extractor: Box<dyn SnapshotExtractor + '_> = match args.strategy {
        Strategy::Archive => Box::new(
            ArchiveExtractor::new(&repo, &args.repo_path, &layout)
                .with_workers(args.parallel)
                .with_timeout(args.timeout),
        ),
        Strategy::Checkout => {
            if args.parallel > 1 {
                info!("checkout strategy shares one working tree; running sequentially");
            }
            Box::new(CheckoutExtractor::new(&repo, &args.repo_path, &layout))
        }
    };
    let reports = extractor.extract_all(&selection.versions)?;

    let successful = successful_keys(&reports);
    if successful.is_empty() {
        ui::display_failure("No versions were successfully processed");
        return Err(SyncError::extraction("No versions were successfully processed"));
    }

    let publisher = Publisher::new(&args.output_dir, config.index.clone());
    let published = publisher.publish(&successful)?;
    ui::display_success(&format!(
        "Created 'latest' symlink pointing to {}",
        published.latest
    ));
    match &published.index {
        IndexOutcome::Replaced { links } | IndexOutcome::Inserted { links } => {
            ui::display_success(&format!(
                "Updated {} with {} recent versions",
                config.index.file_name, links
            ));
        }
        IndexOutcome::Missing => ui::display_warning(&SyncWarning::IndexMissing {
            path: publisher.index_path().display().to_string(),
        }),
        IndexOutcome::AnchorMissing => ui::display_warning(&SyncWarning::IndexAnchorMissing {
            heading: config.index.section_heading.clone(),
            anchor: config.index.anchor_heading.clone(),
        }),
    }

    let cache = if args.write_cache {
        write_cache(&args.output_dir, &successful)
    } else {
        None
    };

    ui::display_summary(&successful, config.index.max_links);

    Ok(SyncOutcome {
        reports,
        latest: published.latest,
        index: published.index,
        successful,
        cache,
    })
}

fn write_cache(output_dir: &Path, successful: &[String]) -> Option<PathBuf> {
    match SyncCache::new(output_dir, successful.to_vec()).save(output_dir) {
        Ok(path) => {
            debug!("wrote {}", path.display());
            Some(path)
        }
        Err(e) => {
            ui::display_warning(&SyncWarning::CacheWriteFailed {
                reason: e.to_string(),
            });
            None
        }
    }
}
