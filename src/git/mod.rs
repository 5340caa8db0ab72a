//! Git operations abstraction layer
//!
//! The [Repository] trait covers what the sync needs from version control:
//! reading tags, resolving them to commits, and moving the working tree for
//! the checkout strategy. Implementations:
//!
//! - [repository::Git2Repository]: a real repository opened through `git2`
//! - [mock::MockRepository]: an in-memory stand-in for tests
//!
//! Archive extraction does not go through this trait; it shells out to
//! `git archive` via [process::run_with_timeout].

pub mod mock;
pub mod process;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use std::cmp::Ordering;

use crate::error::Result;

/// Where HEAD pointed before the working tree was moved
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadRef {
    /// Symbolic HEAD, full reference name (e.g. `refs/heads/main`)
    Branch(String),
    /// Detached HEAD at a commit id
    Detached(String),
}

impl std::fmt::Display for HeadRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HeadRef::Branch(name) => {
                write!(f, "{}", name.strip_prefix("refs/heads/").unwrap_or(name))
            }
            HeadRef::Detached(oid) => write!(f, "{}", &oid[..oid.len().min(7)]),
        }
    }
}

/// Common git operation trait for abstraction
///
/// All implementors must be `Send + Sync` so a single repository handle can be
/// shared with the extraction worker pool.
pub trait Repository: Send + Sync {
    /// All tag names in the repository, in no particular order. No network access.
    fn list_tags(&self) -> Result<Vec<String>>;

    /// Commit id a tag points at, peeling annotated tags. `Ok(None)` when the
    /// tag does not exist.
    fn resolve_tag_commit(&self, tag: &str) -> Result<Option<String>>;

    /// Current HEAD, to be restored after checkouts
    fn head(&self) -> Result<HeadRef>;

    /// Move the working tree and HEAD (detached) to `tag`
    fn checkout_tag(&self, tag: &str) -> Result<()>;

    /// Move the working tree and HEAD back to a saved position
    fn restore_head(&self, head: &HeadRef) -> Result<()>;

    fn tag_exists(&self, tag: &str) -> Result<bool> {
        Ok(self.resolve_tag_commit(tag)?.is_some())
    }

    /// Tags sorted by descending version, the order `git for-each-ref
    /// --sort=-version:refname` produces. Tags that are not versions follow,
    /// in reverse name order.
    fn list_tags_by_version(&self) -> Result<Vec<String>> {
        let mut tags = self.list_tags()?;
        tags.sort_by(|a, b| compare_tag_versions(b, a));
        Ok(tags)
    }
}

fn compare_tag_versions(a: &str, b: &str) -> Ordering {
    let parse = |tag: &str| semver::Version::parse(tag.strip_prefix('v').unwrap_or(tag)).ok();
    match (parse(a), parse(b)) {
        (Some(va), Some(vb)) => va.cmp(&vb).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => a.cmp(b),
    }
}
