use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use git2::build::CheckoutBuilder;
use git2::{ErrorCode, Repository as Git2Repo};
use log::debug;

use crate::error::{Result, SyncError};
use crate::git::HeadRef;

/// Wrapper around git2::Repository with our trait interface.
///
/// `git2::Repository` is `Send` but not `Sync`; the mutex makes one handle
/// shareable with the worker pool.
pub struct Git2Repository {
    repo: Mutex<Git2Repo>,
}

impl Git2Repository {
    /// Open the repository rooted exactly at `path` (no parent discovery)
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::open(path.as_ref()).map_err(|e| {
            SyncError::repository(format!(
                "{} is not a git repository: {}",
                path.as_ref().display(),
                e.message()
            ))
        })?;

        Ok(Git2Repository::from_git2(repo))
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository {
            repo: Mutex::new(repo),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Git2Repo>> {
        self.repo
            .lock()
            .map_err(|_| SyncError::repository("repository handle poisoned by a panic"))
    }
}

impl super::Repository for Git2Repository {
    fn list_tags(&self) -> Result<Vec<String>> {
        let repo = self.lock()?;
        let tags = repo.tag_names(None)?;

        Ok(tags.iter().flatten().map(|s| s.to_string()).collect())
    }

    fn resolve_tag_commit(&self, tag: &str) -> Result<Option<String>> {
        let repo = self.lock()?;
        let reference_name = format!("refs/tags/{}", tag);

        let commit = match repo.find_reference(&reference_name) {
            Ok(reference) => reference.peel_to_commit().map_err(|e| {
                SyncError::repository(format!("Tag '{}' does not point at a commit: {}", tag, e))
            })?,
            Err(e) if e.code() == ErrorCode::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let id = commit.id().to_string();
        Ok(Some(id))
    }

    fn head(&self) -> Result<HeadRef> {
        let repo = self.lock()?;
        let head = repo.head()?;

        if head.is_branch() {
            let name = head
                .name()
                .ok_or_else(|| SyncError::repository("HEAD branch name is not valid UTF-8"))?;
            Ok(HeadRef::Branch(name.to_string()))
        } else {
            let commit = head.peel_to_commit()?;
            Ok(HeadRef::Detached(commit.id().to_string()))
        }
    }

    fn checkout_tag(&self, tag: &str) -> Result<()> {
        let repo = self.lock()?;
        let commit = repo
            .find_reference(&format!("refs/tags/{}", tag))?
            .peel_to_commit()?;

        debug!("checking out {} ({})", tag, commit.id());
        repo.checkout_tree(commit.as_object(), Some(CheckoutBuilder::new().safe()))?;
        repo.set_head_detached(commit.id())?;
        Ok(())
    }

    fn restore_head(&self, head: &HeadRef) -> Result<()> {
        let repo = self.lock()?;

        match head {
            HeadRef::Branch(name) => {
                let commit = repo.find_reference(name)?.peel_to_commit()?;
                repo.checkout_tree(commit.as_object(), Some(CheckoutBuilder::new().safe()))?;
                repo.set_head(name)?;
            }
            HeadRef::Detached(oid) => {
                let oid = git2::Oid::from_str(oid)?;
                let commit = repo.find_commit(oid)?;
                repo.checkout_tree(commit.as_object(), Some(CheckoutBuilder::new().safe()))?;
                repo.set_head_detached(oid)?;
            }
        }
        debug!("restored HEAD to {}", head);
        Ok(())
    }
}
