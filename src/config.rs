use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, SyncError};
use crate::extract::Strategy;

pub const CONFIG_FILE_NAME: &str = "docs-sync.toml";

/// Represents the complete configuration for docs-sync.
///
/// Every section falls back to defaults, so an empty file is a valid config.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub sync: SyncConfig,

    #[serde(default)]
    pub index: IndexConfig,
}

/// Returns the documentation directories copied for every version.
fn default_doc_dirs() -> Vec<String> {
    vec![
        "contributor".to_string(),
        "spec".to_string(),
        "stdlib".to_string(),
        "user-manual".to_string(),
    ]
}

fn default_docs_root() -> String {
    "docs".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("_docs")
}

fn default_max_versions() -> usize {
    10
}

fn default_parallel() -> usize {
    4
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_true() -> bool {
    true
}

/// Version selection and extraction settings.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SyncConfig {
    /// Cap on minor release lines; 0 disables the cap
    #[serde(default = "default_max_versions")]
    pub max_versions: usize,

    /// Worker threads for archive extraction
    #[serde(default = "default_parallel")]
    pub parallel: usize,

    #[serde(default)]
    pub strategy: Strategy,

    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Directory inside the source repository holding the doc subdirectories
    #[serde(default = "default_docs_root")]
    pub docs_root: String,

    #[serde(default = "default_doc_dirs")]
    pub doc_dirs: Vec<String>,

    /// Per external process (git, tar)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_true")]
    pub write_cache: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        SyncConfig {
            max_versions: default_max_versions(),
            parallel: default_parallel(),
            strategy: Strategy::default(),
            output_dir: default_output_dir(),
            docs_root: default_docs_root(),
            doc_dirs: default_doc_dirs(),
            timeout_secs: default_timeout_secs(),
            write_cache: true,
        }
    }
}

fn default_index_file() -> String {
    "index.md".to_string()
}

fn default_section_heading() -> String {
    "## 📚 Documentation Versions".to_string()
}

fn default_anchor_heading() -> String {
    "## ⚡ Quick Start Guide".to_string()
}

fn default_section_end() -> String {
    crate::publish::index::DEFAULT_SECTION_END.to_string()
}

fn default_max_links() -> usize {
    7
}

fn default_url_prefix() -> String {
    "/docs".to_string()
}

/// Settings for the generated versions section of the index page.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct IndexConfig {
    /// File name under the output directory
    #[serde(default = "default_index_file")]
    pub file_name: String,

    /// Heading line that opens the generated section
    #[serde(default = "default_section_heading")]
    pub section_heading: String,

    /// Heading the section is inserted before when it does not exist yet
    #[serde(default = "default_anchor_heading")]
    pub anchor_heading: String,

    /// Regex for the line that ends the generated section
    #[serde(default = "default_section_end")]
    pub section_end: String,

    #[serde(default = "default_max_links")]
    pub max_links: usize,

    #[serde(default = "default_url_prefix")]
    pub url_prefix: String,
}

impl Default for IndexConfig {
    fn default() -> Self {
        IndexConfig {
            file_name: default_index_file(),
            section_heading: default_section_heading(),
            anchor_heading: default_anchor_heading(),
            section_end: default_section_end(),
            max_links: default_max_links(),
            url_prefix: default_url_prefix(),
        }
    }
}

impl Config {
    /// Reject settings that cannot produce a meaningful run
    pub fn validate(&self) -> Result<()> {
        if self.sync.doc_dirs.is_empty() {
            return Err(SyncError::config("sync.doc_dirs must list at least one directory"));
        }
        if self.sync.parallel == 0 {
            return Err(SyncError::config("sync.parallel must be at least 1"));
        }
        if self.sync.timeout_secs == 0 {
            return Err(SyncError::config("sync.timeout_secs must be at least 1"));
        }
        if self.index.section_heading.trim().is_empty() {
            return Err(SyncError::config("index.section_heading must not be empty"));
        }
        Ok(())
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `docs-sync.toml` in current directory
/// 3. `docs-sync.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read, parsed or validated
pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let path = match config_path {
        Some(path) => Some(path.to_path_buf()),
        None => default_config_path(),
    };

    let config = match path {
        Some(path) => {
            let content = fs::read_to_string(&path).map_err(|e| {
                SyncError::config(format!("Cannot read {}: {}", path.display(), e))
            })?;
            toml::from_str(&content)
                .map_err(|e| SyncError::config(format!("Invalid {}: {}", path.display(), e)))?
        }
        None => Config::default(),
    };

    config.validate()?;
    Ok(config)
}

fn default_config_path() -> Option<PathBuf> {
    let local = PathBuf::from(".").join(CONFIG_FILE_NAME);
    if local.exists() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .filter(|path| path.exists())
}
