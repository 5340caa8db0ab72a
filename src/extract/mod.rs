//! Snapshot extraction - materializing documentation directories of a tagged
//! commit into the output tree.
//!
//! Two strategies exist:
//!
//! - [archive::ArchiveExtractor] exports each directory with `git archive`
//!   and never touches the working tree, so versions run on a worker pool.
//! - [checkout::CheckoutExtractor] moves the working tree to every tag in
//!   turn and restores the original HEAD afterwards. Strictly sequential.

pub mod archive;
pub mod checkout;

pub use archive::ArchiveExtractor;
pub use checkout::CheckoutExtractor;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use walkdir::WalkDir;

use crate::domain::{ReleaseVersion, SelectedVersion};
use crate::error::Result;
use crate::git::Repository;
use crate::ui;
use crate::warning::SyncWarning;

/// How documentation is read out of history
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// `git archive` per directory; parallel, working tree untouched
    #[default]
    Archive,
    /// `git checkout` per tag; sequential, HEAD restored at the end
    Checkout,
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::Archive => write!(f, "archive"),
            Strategy::Checkout => write!(f, "checkout"),
        }
    }
}

/// Where documentation comes from and where it goes
#[derive(Debug, Clone, PartialEq)]
pub struct DocLayout {
    pub output_root: PathBuf,
    /// Directory in the source repository containing `doc_dirs`
    pub docs_root: String,
    pub doc_dirs: Vec<String>,
}

impl DocLayout {
    pub fn new(output_root: impl Into<PathBuf>, docs_root: impl Into<String>, doc_dirs: Vec<String>) -> Self {
        DocLayout {
            output_root: output_root.into(),
            docs_root: docs_root.into(),
            doc_dirs,
        }
    }

    pub fn version_dir(&self, key: &str) -> PathBuf {
        self.output_root.join(key)
    }

    /// Repository-relative path of a doc directory, e.g. `docs/spec`
    pub fn source_path(&self, dir: &str) -> String {
        format!("{}/{}", self.docs_root.trim_end_matches('/'), dir)
    }

    /// Create the version directory and delete any previous copies of the
    /// doc directories inside it. Other content is left alone.
    pub fn prepare_version_dir(&self, key: &str) -> io::Result<PathBuf> {
        let version_dir = self.version_dir(key);
        fs::create_dir_all(&version_dir)?;

        for dir in &self.doc_dirs {
            let target = version_dir.join(dir);
            match fs::symlink_metadata(&target) {
                Ok(meta) if meta.is_dir() => fs::remove_dir_all(&target)?,
                Ok(_) => fs::remove_file(&target)?,
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(e),
            }
        }
        Ok(version_dir)
    }
}

/// Outcome of extracting one minor release line
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionReport {
    pub key: String,
    pub version: ReleaseVersion,
    pub tag: String,
    /// True only when every doc directory was copied
    pub success: bool,
    /// Advisory content fingerprint, set on success
    pub fingerprint: Option<String>,
    pub copied: Vec<String>,
    pub warnings: Vec<SyncWarning>,
}

impl ExtractionReport {
    pub fn new(selected: &SelectedVersion) -> Self {
        ExtractionReport {
            key: selected.key.clone(),
            version: selected.version,
            tag: selected.tag.clone(),
            success: false,
            fingerprint: None,
            copied: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn warn(&mut self, warning: SyncWarning) {
        ui::display_warning(&warning);
        self.warnings.push(warning);
    }

    /// Record how copying one doc directory went.
    pub fn record(&mut self, dir: &str, outcome: std::result::Result<(), SyncWarning>) {
        match outcome {
            Ok(()) => {
                ui::display_success(&format!("Extracted {} docs for version {}", dir, self.key));
                self.copied.push(dir.to_string());
            }
            Err(warning) => self.warn(warning),
        }
    }

    /// Seal the report; a version with any warning is a failure.
    pub fn finish(mut self, expected_dirs: usize, fingerprint: Option<String>) -> Self {
        self.success = self.warnings.is_empty() && self.copied.len() == expected_dirs;
        self.fingerprint = if self.success { fingerprint } else { None };

        if self.success {
            ui::display_success(&format!("Successfully processed version {}", self.key));
        } else if self.copied.is_empty() {
            ui::display_failure(&format!("Failed to process version {}", self.key));
        } else {
            ui::display_partial(&format!("Partial success for version {}", self.key));
        }
        self
    }
}

/// A way of extracting documentation snapshots for a set of versions
pub trait SnapshotExtractor {
    /// Extract every version. Per-directory and per-version problems are
    /// recorded in the reports; `Err` means no extraction could be attempted.
    /// Reports may come back in any order.
    fn extract_all(&self, versions: &[SelectedVersion]) -> Result<Vec<ExtractionReport>>;
}

/// Recursively copy `src` into `dst`, recreating symlinks rather than
/// following them. Returns the number of non-directory entries copied.
pub fn copy_tree(src: &Path, dst: &Path) -> io::Result<u64> {
    let mut copied = 0;

    for entry in WalkDir::new(src).follow_links(false).sort_by_file_name() {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        let target = dst.join(relative);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            fs::create_dir_all(&target)?;
        } else if file_type.is_symlink() {
            copy_symlink(entry.path(), &target)?;
            copied += 1;
        } else {
            fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }

    debug!("copied {} entries from {} to {}", copied, src.display(), dst.display());
    Ok(copied)
}

#[cfg(unix)]
fn copy_symlink(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(fs::read_link(src)?, dst)
}

#[cfg(not(unix))]
fn copy_symlink(src: &Path, dst: &Path) -> io::Result<()> {
    fs::copy(src, dst).map(|_| ())
}

/// SHA-256 over the commit id and the sorted directory names.
pub fn fingerprint(commit: &str, doc_dirs: &[String]) -> String {
    let mut dirs: Vec<&str> = doc_dirs.iter().map(String::as_str).collect();
    dirs.sort_unstable();
    let content = format!("{}:{}", commit, dirs.join(":"));
    format!("{:x}", Sha256::digest(content.as_bytes()))
}

pub(crate) fn fingerprint_for<R: Repository + ?Sized>(
    repo: &R,
    selected: &SelectedVersion,
    doc_dirs: &[String],
) -> Option<String> {
    match repo.resolve_tag_commit(&selected.tag) {
        Ok(Some(commit)) => Some(fingerprint(&commit, doc_dirs)),
        Ok(None) => None,
        Err(e) => {
            debug!("no fingerprint for {}: {}", selected.tag, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(root: &Path) -> DocLayout {
        DocLayout::new(
            root,
            "docs",
            vec!["spec".to_string(), "stdlib".to_string()],
        )
    }

    #[test]
    fn test_source_path() {
        let layout = DocLayout::new("_docs", "docs/", vec![]);
        assert_eq!(layout.source_path("user-manual"), "docs/user-manual");
    }

    #[test]
    fn test_prepare_version_dir_clears_only_doc_dirs() {
        let root = tempfile::tempdir().unwrap();
        let layout = layout(root.path());
        let version_dir = root.path().join("1.2");
        fs::create_dir_all(version_dir.join("spec/old")).unwrap();
        fs::write(version_dir.join("spec/old/stale.md"), "stale").unwrap();
        fs::write(version_dir.join("notes.txt"), "keep").unwrap();

        let prepared = layout.prepare_version_dir("1.2").unwrap();

        assert_eq!(prepared, version_dir);
        assert!(!version_dir.join("spec").exists());
        assert!(version_dir.join("notes.txt").exists());
    }

    #[test]
    fn test_copy_tree_copies_nested_files() {
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();
        fs::create_dir_all(src.path().join("a/b")).unwrap();
        fs::write(src.path().join("top.md"), "top").unwrap();
        fs::write(src.path().join("a/b/deep.md"), "deep").unwrap();

        let target = dst.path().join("copy");
        let copied = copy_tree(src.path(), &target).unwrap();

        assert_eq!(copied, 2);
        assert_eq!(fs::read_to_string(target.join("top.md")).unwrap(), "top");
        assert_eq!(fs::read_to_string(target.join("a/b/deep.md")).unwrap(), "deep");
    }

    #[cfg(unix)]
    #[test]
    fn test_copy_tree_recreates_symlinks() {
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();
        fs::write(src.path().join("real.md"), "real").unwrap();
        std::os::unix::fs::symlink("real.md", src.path().join("alias.md")).unwrap();

        let target = dst.path().join("copy");
        copy_tree(src.path(), &target).unwrap();

        let link = fs::read_link(target.join("alias.md")).unwrap();
        assert_eq!(link, PathBuf::from("real.md"));
    }

    #[test]
    fn test_fingerprint_ignores_dir_order() {
        let commit = "0123456789abcdef0123456789abcdef01234567";
        let a = fingerprint(commit, &["spec".to_string(), "contributor".to_string()]);
        let b = fingerprint(commit, &["contributor".to_string(), "spec".to_string()]);
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_fingerprint_changes_with_commit() {
        let dirs = vec!["spec".to_string()];
        assert_ne!(fingerprint("aaaa", &dirs), fingerprint("bbbb", &dirs));
    }

    #[test]
    fn test_report_success_requires_every_dir() {
        let selected = SelectedVersion {
            key: "1.3".to_string(),
            version: ReleaseVersion::new(1, 3, 0),
            tag: "v1.3.0".to_string(),
        };

        let mut report = ExtractionReport::new(&selected);
        report.copied.push("contributor".to_string());
        report.warn(SyncWarning::MissingDocDir {
            dir: "spec".to_string(),
            version: "1.3".to_string(),
        });
        let report = report.finish(2, Some("abc".to_string()));
        assert!(!report.success);
        assert_eq!(report.fingerprint, None);

        let mut report = ExtractionReport::new(&selected);
        report.copied.push("contributor".to_string());
        report.copied.push("spec".to_string());
        let report = report.finish(2, Some("abc".to_string()));
        assert!(report.success);
        assert_eq!(report.fingerprint.as_deref(), Some("abc"));
    }
}
