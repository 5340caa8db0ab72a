//! Advisory record of the last sync, written to `<output>/.sync_cache.json`.
//!
//! Informational only: nothing reads it back to decide whether a version
//! can be skipped.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

pub const CACHE_FILE_NAME: &str = ".sync_cache.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncCache {
    /// Output root the sync wrote to
    pub last_sync: String,
    /// Successful version keys, newest first
    pub processed_versions: Vec<String>,
    /// RFC 3339 local time of the sync
    pub timestamp: String,
}

impl SyncCache {
    pub fn new(output_root: &Path, processed_versions: Vec<String>) -> Self {
        let root = output_root
            .canonicalize()
            .unwrap_or_else(|_| output_root.to_path_buf());

        SyncCache {
            last_sync: root.display().to_string(),
            processed_versions,
            timestamp: chrono::Local::now().to_rfc3339(),
        }
    }

    pub fn path(output_root: &Path) -> PathBuf {
        output_root.join(CACHE_FILE_NAME)
    }

    pub fn save(&self, output_root: &Path) -> Result<PathBuf> {
        let path = Self::path(output_root);
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&path, json)?;
        Ok(path)
    }

    /// `Ok(None)` when no cache was written yet
    pub fn load(output_root: &Path) -> Result<Option<Self>> {
        match fs::read_to_string(Self::path(output_root)) {
            Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
