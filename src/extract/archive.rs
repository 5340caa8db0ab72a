use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

use log::debug;
use rayon::prelude::*;

use super::{copy_tree, fingerprint_for, DocLayout, ExtractionReport, SnapshotExtractor};
use crate::domain::SelectedVersion;
use crate::error::{Result, SyncError};
use crate::git::process::run_with_timeout;
use crate::git::Repository;
use crate::ui;
use crate::warning::SyncWarning;

/// Extracts documentation with `git archive` + `tar`, one worker per version.
///
/// The working tree is never modified, so versions run concurrently; each
/// writes only into its own `<output>/<key>` directory.
pub struct ArchiveExtractor<'a, R: Repository + ?Sized> {
    repo: &'a R,
    repo_path: PathBuf,
    layout: &'a DocLayout,
    workers: usize,
    timeout: Duration,
}

impl<'a, R: Repository + ?Sized> ArchiveExtractor<'a, R> {
    pub fn new(repo: &'a R, repo_path: impl Into<PathBuf>, layout: &'a DocLayout) -> Self {
        ArchiveExtractor {
            repo,
            repo_path: repo_path.into(),
            layout,
            workers: 4,
            timeout: Duration::from_secs(120),
        }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Extract all doc directories of one version.
    pub fn extract_version(&self, selected: &SelectedVersion) -> ExtractionReport {
        ui::display_status(&format!(
            "Processing version {} (tag: {})...",
            selected.key, selected.tag
        ));
        let mut report = ExtractionReport::new(selected);
        let expected = self.layout.doc_dirs.len();

        let version_dir = match self.layout.prepare_version_dir(&selected.key) {
            Ok(dir) => dir,
            Err(e) => {
                report.warn(SyncWarning::VersionDirUnavailable {
                    version: selected.key.clone(),
                    reason: e.to_string(),
                });
                return report.finish(expected, None);
            }
        };

        for dir in &self.layout.doc_dirs {
            report.record(dir, self.extract_dir(selected, dir, &version_dir));
        }

        let fingerprint = fingerprint_for(self.repo, selected, &self.layout.doc_dirs);
        report.finish(expected, fingerprint)
    }

    fn extract_dir(
        &self,
        selected: &SelectedVersion,
        dir: &str,
        version_dir: &Path,
    ) -> std::result::Result<(), SyncWarning> {
        let archive_path = self.layout.source_path(dir);
        let missing = || SyncWarning::MissingDocDir {
            dir: dir.to_string(),
            version: selected.key.clone(),
        };

        let mut git = Command::new("git");
        git.arg("archive")
            .arg(format!("refs/tags/{}", selected.tag))
            .arg(&archive_path)
            .current_dir(&self.repo_path);
        let archive = run_with_timeout(git, None, self.timeout)
            .map_err(|e| self.tool_warning(selected, dir, e))?;

        if !archive.success() || archive.stdout.is_empty() {
            debug!(
                "git archive {} {}: {}",
                selected.tag,
                archive_path,
                archive.stderr_lossy()
            );
            return Err(missing());
        }

        let scratch = tempfile::tempdir().map_err(|e| SyncWarning::ArchiveFailed {
            dir: dir.to_string(),
            version: selected.key.clone(),
            reason: format!("cannot create scratch directory: {}", e),
        })?;

        let mut tar = Command::new("tar");
        tar.arg("-x").arg("-f").arg("-").arg("-C").arg(scratch.path());
        let unpacked = run_with_timeout(tar, Some(archive.stdout), self.timeout)
            .map_err(|e| self.tool_warning(selected, dir, e))?;

        if !unpacked.success() {
            return Err(SyncWarning::ArchiveFailed {
                dir: dir.to_string(),
                version: selected.key.clone(),
                reason: unpacked.stderr_lossy(),
            });
        }

        let source = scratch.path().join(&archive_path);
        if !source.is_dir() {
            return Err(missing());
        }

        copy_tree(&source, &version_dir.join(dir)).map_err(|e| SyncWarning::CopyFailed {
            dir: dir.to_string(),
            version: selected.key.clone(),
            reason: e.to_string(),
        })?;
        Ok(())
    }

    fn tool_warning(&self, selected: &SelectedVersion, dir: &str, error: SyncError) -> SyncWarning {
        match error {
            SyncError::Timeout { timeout, .. } => SyncWarning::TimedOut {
                dir: dir.to_string(),
                version: selected.key.clone(),
                seconds: timeout.as_secs(),
            },
            other => SyncWarning::ArchiveFailed {
                dir: dir.to_string(),
                version: selected.key.clone(),
                reason: other.to_string(),
            },
        }
    }
}

impl<'a, R: Repository + ?Sized> SnapshotExtractor for ArchiveExtractor<'a, R> {
    fn extract_all(&self, versions: &[SelectedVersion]) -> Result<Vec<ExtractionReport>> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .thread_name(|i| format!("docs-sync-{}", i))
            .build()
            .map_err(|e| SyncError::extraction(format!("cannot start worker pool: {}", e)))?;

        debug!(
            "extracting {} versions on {} workers",
            versions.len(),
            self.workers
        );
        Ok(pool.install(|| {
            versions
                .par_iter()
                .map(|selected| self.extract_version(selected))
                .collect()
        }))
    }
}
