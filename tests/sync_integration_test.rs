// tests/sync_integration_test.rs
mod common;

use std::fs;
use std::path::{Path, PathBuf};

use common::{read_doc, Fixture, DOC_DIRS, INDEX_WITH_SECTION};
use docs_sync::cache::SyncCache;
use docs_sync::cli::{run_sync, SyncArgs};
use docs_sync::config::Config;
use docs_sync::extract::Strategy;
use docs_sync::publish::IndexOutcome;
use docs_sync::warning::SyncWarning;
use serial_test::serial;
use tempfile::TempDir;

fn args_for(fixture: &Fixture, output: &Path, strategy: Strategy) -> SyncArgs {
    let mut args = SyncArgs::from_config(fixture.path(), &Config::default());
    args.output_dir = output.to_path_buf();
    args.strategy = strategy;
    args
}

fn standard_history() -> Fixture {
    let fixture = Fixture::new();
    fixture.release("v1.0.0", &DOC_DIRS);
    fixture.release("v1.0.1", &DOC_DIRS);
    fixture.release("v1.1.0-beta.1", &DOC_DIRS);
    fixture.release("v1.1.0", &DOC_DIRS);
    fixture.release("v2.0.0", &DOC_DIRS);
    fixture.tag("nightly");
    fixture
}

#[test]
#[serial]
fn test_archive_sync_end_to_end() {
    let fixture = standard_history();
    let output = TempDir::new().unwrap();
    fs::write(output.path().join("index.md"), INDEX_WITH_SECTION).unwrap();

    let outcome = run_sync(&args_for(&fixture, output.path(), Strategy::Archive), &Config::default())
        .expect("sync should succeed");

    assert_eq!(outcome.successful, vec!["2.0", "1.1", "1.0"]);
    assert_eq!(outcome.latest, "2.0");
    assert_eq!(outcome.index, IndexOutcome::Replaced { links: 3 });
    assert!(outcome.reports.iter().all(|r| r.success));
    assert!(outcome.reports.iter().all(|r| r.fingerprint.is_some()));

    // highest patch of each minor line, pre-release ignored
    assert_eq!(read_doc(output.path(), "1.0", "spec"), "# spec for v1.0.1\n");
    assert_eq!(read_doc(output.path(), "1.1", "stdlib"), "# stdlib for v1.1.0\n");
    assert_eq!(
        read_doc(output.path(), "2.0", "user-manual"),
        "# user-manual for v2.0.0\n"
    );

    let link = output.path().join("latest");
    assert_eq!(fs::read_link(&link).unwrap(), PathBuf::from("2.0"));
    assert_eq!(read_doc(output.path(), "latest", "contributor"), "# contributor for v2.0.0\n");

    let index = fs::read_to_string(output.path().join("index.md")).unwrap();
    assert!(index.starts_with("# Project\n\nIntro text.\n\n## 📚 Documentation Versions\n\n"));
    assert!(index.contains("- **[Latest (Stable)](/docs/latest/)** - Most recent stable release"));
    assert!(index.contains("- **[Version 2.0](/docs/2.0/)** - Documentation for v2.0"));
    assert!(index.contains("- **[Version 1.0](/docs/1.0/)** - Documentation for v1.0"));
    assert!(!index.contains("old link"));
    assert!(index.ends_with("## ⚡ Quick Start Guide\n\nRun it.\n"));

    let cache = SyncCache::load(output.path()).unwrap().expect("cache written");
    assert_eq!(cache.processed_versions, vec!["2.0", "1.1", "1.0"]);
    assert_eq!(outcome.cache, Some(SyncCache::path(output.path())));
}

#[test]
#[serial]
fn test_partial_version_is_not_published() {
    let fixture = Fixture::new();
    fixture.release("v1.2.0", &DOC_DIRS);
    fixture.release("v1.3.0", &["contributor", "stdlib", "user-manual"]);
    let output = TempDir::new().unwrap();

    let outcome = run_sync(&args_for(&fixture, output.path(), Strategy::Archive), &Config::default())
        .unwrap();

    assert_eq!(outcome.successful, vec!["1.2"]);
    assert_eq!(outcome.latest, "1.2");
    assert_eq!(outcome.index, IndexOutcome::Missing);

    let partial = outcome.reports.iter().find(|r| r.key == "1.3").unwrap();
    assert!(!partial.success);
    assert_eq!(partial.copied.len(), 3);
    assert!(partial.warnings.contains(&SyncWarning::MissingDocDir {
        dir: "spec".to_string(),
        version: "1.3".to_string(),
    }));

    // what could be copied stays on disk
    assert!(output.path().join("1.3/contributor/index.md").exists());
    assert!(!output.path().join("1.3/spec").exists());
    assert_eq!(fs::read_link(output.path().join("latest")).unwrap(), PathBuf::from("1.2"));
}

#[test]
#[serial]
fn test_sync_is_idempotent() {
    let fixture = standard_history();
    let output = TempDir::new().unwrap();
    fs::write(output.path().join("index.md"), INDEX_WITH_SECTION).unwrap();
    let args = args_for(&fixture, output.path(), Strategy::Archive);

    run_sync(&args, &Config::default()).unwrap();
    let first_index = fs::read_to_string(output.path().join("index.md")).unwrap();
    let first_doc = read_doc(output.path(), "1.1", "spec");

    let second = run_sync(&args, &Config::default()).unwrap();
    assert_eq!(second.successful, vec!["2.0", "1.1", "1.0"]);
    assert_eq!(fs::read_to_string(output.path().join("index.md")).unwrap(), first_index);
    assert_eq!(read_doc(output.path(), "1.1", "spec"), first_doc);
    assert_eq!(first_index.matches("## 📚 Documentation Versions").count(), 1);
}

#[test]
#[serial]
fn test_max_versions_caps_minor_lines() {
    let fixture = standard_history();
    let output = TempDir::new().unwrap();
    let mut args = args_for(&fixture, output.path(), Strategy::Archive);
    args.max_versions = 2;

    let outcome = run_sync(&args, &Config::default()).unwrap();
    assert_eq!(outcome.successful, vec!["2.0", "1.1"]);
    assert!(!output.path().join("1.0").exists());
}

#[test]
#[serial]
fn test_checkout_sync_restores_branch() {
    let fixture = standard_history();
    let output = TempDir::new().unwrap();

    let outcome = run_sync(&args_for(&fixture, output.path(), Strategy::Checkout), &Config::default())
        .unwrap();

    assert_eq!(outcome.successful, vec!["2.0", "1.1", "1.0"]);
    assert_eq!(read_doc(output.path(), "1.0", "spec"), "# spec for v1.0.1\n");
    assert_eq!(fixture.head_branch().as_deref(), Some("main"));
    assert_eq!(
        fs::read_to_string(fixture.path().join("docs/spec/index.md")).unwrap(),
        "# spec for v2.0.0\n"
    );
}

#[test]
#[serial]
fn test_no_cache_flag_skips_cache() {
    let fixture = standard_history();
    let output = TempDir::new().unwrap();
    let mut args = args_for(&fixture, output.path(), Strategy::Archive);
    args.write_cache = false;

    let outcome = run_sync(&args, &Config::default()).unwrap();
    assert_eq!(outcome.cache, None);
    assert!(!SyncCache::path(output.path()).exists());
}

#[test]
#[serial]
fn test_repository_without_tags_fails() {
    let fixture = Fixture::new();
    fixture.write("README.md", "hello\n");
    fixture.commit("initial");
    let output = TempDir::new().unwrap();

    let err = run_sync(&args_for(&fixture, output.path(), Strategy::Archive), &Config::default())
        .unwrap_err();
    assert!(err.to_string().contains("No git tags found in repository"));
}

#[test]
#[serial]
fn test_only_prerelease_tags_fails() {
    let fixture = Fixture::new();
    fixture.release("v1.0.0-rc.1", &DOC_DIRS);
    fixture.tag("release-candidate");
    let output = TempDir::new().unwrap();

    let err = run_sync(&args_for(&fixture, output.path(), Strategy::Archive), &Config::default())
        .unwrap_err();
    assert!(err.to_string().contains("No valid semantic version tags found"));
}

#[test]
#[serial]
fn test_all_versions_failing_is_an_error() {
    let fixture = Fixture::new();
    fixture.write("README.md", "no docs here\n");
    fixture.commit("initial");
    fixture.tag("v0.1.0");
    let output = TempDir::new().unwrap();

    let err = run_sync(&args_for(&fixture, output.path(), Strategy::Archive), &Config::default())
        .unwrap_err();
    assert!(err.to_string().contains("No versions were successfully processed"));
    assert!(!output.path().join("latest").exists());
}
