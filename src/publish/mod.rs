//! Publishing the extracted versions: the `latest` symlink and the index page.

pub mod index;
pub mod latest;

pub use index::{update_index, DelimitedRegion, IndexOutcome, SectionUpdate};
pub use latest::update_latest_link;

use std::path::PathBuf;

use crate::config::IndexConfig;
use crate::error::{Result, SyncError};
use crate::extract::ExtractionReport;

/// Keys of successful reports, newest version first, whatever order the
/// workers finished in.
pub fn successful_keys(reports: &[ExtractionReport]) -> Vec<String> {
    let mut successful: Vec<&ExtractionReport> = reports.iter().filter(|r| r.success).collect();
    successful.sort_by(|a, b| b.version.cmp(&a.version));
    successful.into_iter().map(|r| r.key.clone()).collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct PublishOutcome {
    pub latest: String,
    pub index: IndexOutcome,
}

pub struct Publisher {
    output_root: PathBuf,
    index: IndexConfig,
}

impl Publisher {
    pub fn new(output_root: impl Into<PathBuf>, index: IndexConfig) -> Self {
        Publisher {
            output_root: output_root.into(),
            index,
        }
    }

    pub fn index_path(&self) -> PathBuf {
        self.output_root.join(&self.index.file_name)
    }

    /// `versions` must be ordered newest first.
    pub fn publish(&self, versions: &[String]) -> Result<PublishOutcome> {
        let latest = versions
            .first()
            .ok_or_else(|| SyncError::publish("no successful versions to publish"))?;

        update_latest_link(&self.output_root, latest)?;
        let index = update_index(&self.index_path(), &self.index, versions)?;

        Ok(PublishOutcome {
            latest: latest.clone(),
            index,
        })
    }
}
