pub mod cache;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod extract;
pub mod git;
pub mod publish;
pub mod ui;
pub mod warning;

pub use error::{Result, SyncError};
