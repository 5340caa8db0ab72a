use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use crate::error::{Result, SyncError};
use crate::git::{HeadRef, Repository};

/// Mock repository for testing without actual git operations.
///
/// Checkout calls are recorded so tests can assert the working tree was
/// moved and put back.
pub struct MockRepository {
    tags: HashMap<String, String>,
    failing_checkouts: HashSet<String>,
    head: Mutex<HeadRef>,
    events: Mutex<Vec<String>>,
}

impl MockRepository {
    /// Create a new empty mock repository on branch `main`
    pub fn new() -> Self {
        MockRepository {
            tags: HashMap::new(),
            failing_checkouts: HashSet::new(),
            head: Mutex::new(HeadRef::Branch("refs/heads/main".to_string())),
            events: Mutex::new(Vec::new()),
        }
    }

    /// Add a tag pointing at a commit id
    pub fn add_tag(&mut self, name: impl Into<String>, commit: impl Into<String>) {
        self.tags.insert(name.into(), commit.into());
    }

    /// Make checking out `tag` fail
    pub fn fail_checkout(&mut self, tag: impl Into<String>) {
        self.failing_checkouts.insert(tag.into());
    }

    /// Checkout/restore calls in order, e.g. `["checkout v1.0.0", "restore main"]`
    pub fn events(&self) -> Vec<String> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn current_head(&self) -> HeadRef {
        self.head
            .lock()
            .map(|h| h.clone())
            .unwrap_or_else(|e| e.into_inner().clone())
    }

    fn record(&self, event: String) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MockRepository {
    fn list_tags(&self) -> Result<Vec<String>> {
        Ok(self.tags.keys().cloned().collect())
    }

    fn resolve_tag_commit(&self, tag: &str) -> Result<Option<String>> {
        Ok(self.tags.get(tag).cloned())
    }

    fn head(&self) -> Result<HeadRef> {
        Ok(self.current_head())
    }

    fn checkout_tag(&self, tag: &str) -> Result<()> {
        self.record(format!("checkout {}", tag));
        if self.failing_checkouts.contains(tag) {
            return Err(SyncError::repository(format!("cannot check out {}", tag)));
        }
        let commit = self
            .tags
            .get(tag)
            .ok_or_else(|| SyncError::repository(format!("no tag {}", tag)))?;
        if let Ok(mut head) = self.head.lock() {
            *head = HeadRef::Detached(commit.clone());
        }
        Ok(())
    }

    fn restore_head(&self, head: &HeadRef) -> Result<()> {
        self.record(format!("restore {}", head));
        if let Ok(mut current) = self.head.lock() {
            *current = head.clone();
        }
        Ok(())
    }
}
