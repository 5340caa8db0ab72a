use std::path::PathBuf;

use log::debug;

use super::{copy_tree, fingerprint_for, DocLayout, ExtractionReport, SnapshotExtractor};
use crate::domain::SelectedVersion;
use crate::error::Result;
use crate::git::{HeadRef, Repository};
use crate::ui;
use crate::warning::SyncWarning;

/// Extracts documentation by checking out every tag in the shared working tree.
///
/// Must run one version at a time. HEAD is saved once before the first
/// checkout and restored once after the last, including on early return or panic.
pub struct CheckoutExtractor<'a, R: Repository + ?Sized> {
    repo: &'a R,
    workdir: PathBuf,
    layout: &'a DocLayout,
}

/// Restores the saved HEAD when dropped.
struct RestoreGuard<'a, R: Repository + ?Sized> {
    repo: &'a R,
    original: HeadRef,
}

impl<'a, R: Repository + ?Sized> RestoreGuard<'a, R> {
    fn save(repo: &'a R) -> Result<Self> {
        let original = repo.head()?;
        debug!("saved HEAD at {}", original);
        Ok(RestoreGuard { repo, original })
    }
}

impl<R: Repository + ?Sized> Drop for RestoreGuard<'_, R> {
    fn drop(&mut self) {
        match self.repo.restore_head(&self.original) {
            Ok(()) => ui::display_success("Restored repository to original state"),
            Err(e) => ui::display_error(&format!(
                "Failed to restore repository to {}: {}",
                self.original, e
            )),
        }
    }
}

impl<'a, R: Repository + ?Sized> CheckoutExtractor<'a, R> {
    pub fn new(repo: &'a R, workdir: impl Into<PathBuf>, layout: &'a DocLayout) -> Self {
        CheckoutExtractor {
            repo,
            workdir: workdir.into(),
            layout,
        }
    }

    // Caller holds a RestoreGuard.
    fn extract_checked_out(&self, selected: &SelectedVersion) -> ExtractionReport {
        ui::display_status(&format!(
            "Processing version {} (tag: {})...",
            selected.key, selected.tag
        ));
        let mut report = ExtractionReport::new(selected);
        let expected = self.layout.doc_dirs.len();

        match self.repo.tag_exists(&selected.tag) {
            Ok(true) => {}
            Ok(false) => {
                report.warn(SyncWarning::TagNotFound {
                    tag: selected.tag.clone(),
                });
                return report.finish(expected, None);
            }
            Err(e) => {
                report.warn(SyncWarning::CheckoutFailed {
                    tag: selected.tag.clone(),
                    reason: e.to_string(),
                });
                return report.finish(expected, None);
            }
        }

        if let Err(e) = self.repo.checkout_tag(&selected.tag) {
            report.warn(SyncWarning::CheckoutFailed {
                tag: selected.tag.clone(),
                reason: e.to_string(),
            });
            return report.finish(expected, None);
        }

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
            let source = self.workdir.join(self.layout.source_path(dir));
            if !source.is_dir() {
                report.warn(SyncWarning::MissingDocDir {
                    dir: dir.clone(),
                    version: selected.key.clone(),
                });
                continue;
            }

            let copied = copy_tree(&source, &version_dir.join(dir))
                .map(|_| ())
                .map_err(|e| SyncWarning::CopyFailed {
                    dir: dir.clone(),
                    version: selected.key.clone(),
                    reason: e.to_string(),
                });
            report.record(dir, copied);
        }

        let fingerprint = fingerprint_for(self.repo, selected, &self.layout.doc_dirs);
        report.finish(expected, fingerprint)
    }
}

impl<'a, R: Repository + ?Sized> SnapshotExtractor for CheckoutExtractor<'a, R> {
    fn extract_all(&self, versions: &[SelectedVersion]) -> Result<Vec<ExtractionReport>> {
        let _guard = RestoreGuard::save(self.repo)?;

        Ok(versions
            .iter()
            .map(|selected| self.extract_checked_out(selected))
            .collect())
    }
}
