//! Regenerating the versions section of the index document.
//!
//! The section is a delimited region: it opens at a line starting with the
//! configured heading and runs up to (not including) the next line matching
//! the end pattern, or to the end of the document. Everything outside the
//! region is written back byte for byte.

use std::fs;
use std::io;
use std::path::Path;

use regex::Regex;

use crate::config::IndexConfig;
use crate::error::{Result, SyncError};

/// Default end of region: the next `## ` heading
pub const DEFAULT_SECTION_END: &str = r"^##\s";

/// What happened to the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionUpdate {
    /// An existing region was replaced
    Replaced(String),
    /// No region existed; the block was placed before the anchor
    Inserted(String),
    /// Neither region nor anchor found
    Unchanged,
}

/// A named region of a line-oriented text document
#[derive(Debug, Clone)]
pub struct DelimitedRegion {
    start_marker: String,
    end: Regex,
}

impl DelimitedRegion {
    pub fn new(start_marker: impl Into<String>, end_pattern: &str) -> Result<Self> {
        let end = Regex::new(end_pattern).map_err(|e| {
            SyncError::config(format!("Invalid section end pattern '{}': {}", end_pattern, e))
        })?;
        Ok(DelimitedRegion {
            start_marker: start_marker.into(),
            end,
        })
    }

    fn starts_region(&self, line: &str) -> bool {
        line.starts_with(&self.start_marker)
    }

    /// Replace the region with `block`. Repeated regions collapse into the
    /// first one. Without a region, `block` is inserted (preceded by a blank
    /// line) before the first line starting with `anchor`.
    pub fn replace(&self, document: &str, block: &str, anchor: Option<&str>) -> SectionUpdate {
        let mut out: Vec<&str> = Vec::new();
        let mut in_region = false;
        let mut found = false;

        for line in document.split('\n') {
            if self.starts_region(line) {
                if !found {
                    out.push(block);
                    found = true;
                }
                in_region = true;
                continue;
            }
            if in_region && self.end.is_match(line) {
                in_region = false;
            }
            if !in_region {
                out.push(line);
            }
        }

        if found {
            return SectionUpdate::Replaced(out.join("\n"));
        }

        match anchor.and_then(|anchor| out.iter().position(|line| line.starts_with(anchor))) {
            Some(position) => {
                out.insert(position, block);
                out.insert(position, "");
                SectionUpdate::Inserted(out.join("\n"))
            }
            None => SectionUpdate::Unchanged,
        }
    }
}

/// Markdown block listing `latest` and the first `max_links` versions.
pub fn render_versions_section(config: &IndexConfig, versions: &[String]) -> String {
    let prefix = config.url_prefix.trim_end_matches('/');
    let mut lines = vec![
        config.section_heading.clone(),
        String::new(),
        format!(
            "- **[Latest (Stable)]({}/latest/)** - Most recent stable release",
            prefix
        ),
    ];

    for version in versions.iter().take(config.max_links) {
        lines.push(format!(
            "- **[Version {v}]({p}/{v}/)** - Documentation for v{v}",
            v = version,
            p = prefix
        ));
    }

    lines.push(String::new());
    lines.join("\n")
}

/// Result of updating the index file on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexOutcome {
    Replaced { links: usize },
    Inserted { links: usize },
    /// File absent; nothing written
    Missing,
    /// Neither heading nor anchor present; nothing written
    AnchorMissing,
}

/// Rewrite the versions section of the index file at `path` in place.
pub fn update_index(path: &Path, config: &IndexConfig, versions: &[String]) -> Result<IndexOutcome> {
    let document = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(IndexOutcome::Missing),
        Err(e) => return Err(e.into()),
    };

    let region = DelimitedRegion::new(config.section_heading.as_str(), &config.section_end)?;
    let block = render_versions_section(config, versions);
    let links = versions.len().min(config.max_links);

    match region.replace(&document, &block, Some(&config.anchor_heading)) {
        SectionUpdate::Replaced(updated) => {
            fs::write(path, updated)?;
            Ok(IndexOutcome::Replaced { links })
        }
        SectionUpdate::Inserted(updated) => {
            fs::write(path, updated)?;
            Ok(IndexOutcome::Inserted { links })
        }
        SectionUpdate::Unchanged => Ok(IndexOutcome::AnchorMissing),
    }
}
