//! CLI-facing workflow code

pub mod orchestration;

pub use orchestration::{run_sync, validate_repo_path, SyncArgs, SyncOutcome};
