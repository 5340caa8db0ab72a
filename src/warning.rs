use std::fmt;

/// Non-fatal problems met while syncing. They degrade a single directory,
/// version or publish step and are reported to the user, but never stop the run.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncWarning {
    /// Documentation directory absent at the tagged commit
    MissingDocDir { dir: String, version: String },
    /// `git archive` or `tar` exited unsuccessfully
    ArchiveFailed {
        dir: String,
        version: String,
        reason: String,
    },
    /// An external tool exceeded its time budget
    TimedOut {
        dir: String,
        version: String,
        seconds: u64,
    },
    /// Copying into the output tree failed part way
    CopyFailed {
        dir: String,
        version: String,
        reason: String,
    },
    /// The per-version output directory could not be prepared
    VersionDirUnavailable { version: String, reason: String },
    /// Tag to check out does not exist
    TagNotFound { tag: String },
    /// Working tree could not be moved to the tag
    CheckoutFailed { tag: String, reason: String },
    /// No index document under the output root
    IndexMissing { path: String },
    /// Neither the versions heading nor the insertion anchor is in the index
    IndexAnchorMissing { heading: String, anchor: String },
    /// Advisory cache could not be written
    CacheWriteFailed { reason: String },
}

impl fmt::Display for SyncWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncWarning::MissingDocDir { dir, version } => {
                write!(f, "{} docs not found for version {}", dir, version)
            }
            SyncWarning::ArchiveFailed {
                dir,
                version,
                reason,
            } => write!(
                f,
                "Failed to extract {} for version {}: {}",
                dir, version, reason
            ),
            SyncWarning::TimedOut {
                dir,
                version,
                seconds,
            } => write!(
                f,
                "Extracting {} for version {} timed out after {}s",
                dir, version, seconds
            ),
            SyncWarning::CopyFailed {
                dir,
                version,
                reason,
            } => write!(
                f,
                "Failed to copy {} docs for version {}: {}",
                dir, version, reason
            ),
            SyncWarning::VersionDirUnavailable { version, reason } => write!(
                f,
                "Cannot prepare output directory for version {}: {}",
                version, reason
            ),
            SyncWarning::TagNotFound { tag } => {
                write!(f, "Tag {} not found in repository", tag)
            }
            SyncWarning::CheckoutFailed { tag, reason } => {
                write!(f, "Failed to checkout {}: {}", tag, reason)
            }
            SyncWarning::IndexMissing { path } => {
                write!(f, "{} not found, skipping update", path)
            }
            SyncWarning::IndexAnchorMissing { heading, anchor } => write!(
                f,
                "Index has neither '{}' nor '{}', versions section not added",
                heading, anchor
            ),
            SyncWarning::CacheWriteFailed { reason } => {
                write!(f, "Could not save cache: {}", reason)
            }
        }
    }
}
