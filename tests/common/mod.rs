// Shared fixture: a throwaway git repository with tagged doc trees.
#![allow(dead_code)]

use std::fs;
use std::path::Path;

use git2::{IndexAddOption, Oid, Repository, RepositoryInitOptions, Signature};
use tempfile::TempDir;

pub const DOC_DIRS: [&str; 4] = ["contributor", "spec", "stdlib", "user-manual"];

pub struct Fixture {
    pub dir: TempDir,
    pub repo: Repository,
}

impl Fixture {
    /// Empty repository whose HEAD points at `main`
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let mut opts = RepositoryInitOptions::new();
        opts.initial_head("main");
        let repo = Repository::init_opts(dir.path(), &opts).unwrap();
        Fixture { dir, repo }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write(&self, rel: &str, contents: &str) {
        let path = self.path().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    pub fn remove_dir(&self, rel: &str) {
        fs::remove_dir_all(self.path().join(rel)).unwrap();
    }

    /// Stage everything (including deletions) and commit on HEAD
    pub fn commit(&self, message: &str) -> Oid {
        let mut index = self.repo.index().unwrap();
        index
            .add_all(["*"].iter(), IndexAddOption::DEFAULT, None)
            .unwrap();
        index.update_all(["*"].iter(), None).unwrap();
        index.write().unwrap();
        let tree_id = index.write_tree().unwrap();
        let tree = self.repo.find_tree(tree_id).unwrap();
        let sig = Signature::now("Docs Bot", "docs@example.com").unwrap();

        let parent = self
            .repo
            .head()
            .ok()
            .and_then(|head| head.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .unwrap()
    }

    pub fn tag(&self, name: &str) {
        let head = self.repo.head().unwrap().peel_to_commit().unwrap();
        self.repo
            .tag_lightweight(name, head.as_object(), false)
            .unwrap();
    }

    /// Write `docs/<dir>/index.md` for each of `dirs`, commit and tag.
    /// Doc dirs not listed are removed first.
    pub fn release(&self, tag: &str, dirs: &[&str]) {
        for dir in DOC_DIRS {
            let rel = format!("docs/{}", dir);
            if !dirs.contains(&dir) && self.path().join(&rel).exists() {
                self.remove_dir(&rel);
            }
        }
        for dir in dirs {
            self.write(
                &format!("docs/{}/index.md", dir),
                &format!("# {} for {}\n", dir, tag),
            );
        }
        self.commit(&format!("release {}", tag));
        self.tag(tag);
    }

    /// Name of the branch HEAD currently points at
    pub fn head_branch(&self) -> Option<String> {
        let head = self.repo.head().ok()?;
        if head.is_branch() {
            head.shorthand().map(str::to_string)
        } else {
            None
        }
    }
}

/// Contents of `<output>/<key>/<dir>/index.md`
pub fn read_doc(output: &Path, key: &str, dir: &str) -> String {
    fs::read_to_string(output.join(key).join(dir).join("index.md")).unwrap()
}

pub const INDEX_WITH_SECTION: &str = "\
# Project

Intro text.

## 📚 Documentation Versions

- old link

## ⚡ Quick Start Guide

Run it.
";
