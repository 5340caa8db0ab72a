use std::collections::HashMap;

use super::tag::Tag;
use super::version::{ParsedTag, ReleaseVersion};

/// The version chosen to represent one minor release line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedVersion {
    /// Minor-line key, e.g. `"1.2"`; also the output directory name
    pub key: String,
    pub version: ReleaseVersion,
    /// Tag the version was read from
    pub tag: String,
}

/// Result of running the selector over a tag list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    /// One entry per minor line, newest first, capped
    pub versions: Vec<SelectedVersion>,
    /// Count of tags that parsed as stable releases
    pub release_tags: usize,
    pub prerelease_tags: usize,
    pub invalid_tags: usize,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }
}

/// Picks the highest patch release of every minor line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionSelector {
    max_versions: Option<usize>,
}

impl VersionSelector {
    /// `max_versions` of 0 keeps every minor line
    pub fn new(max_versions: usize) -> Self {
        VersionSelector {
            max_versions: (max_versions > 0).then_some(max_versions),
        }
    }

    pub fn select<S: AsRef<str>>(&self, tags: &[S]) -> Selection {
        let mut selection = Selection::default();
        let mut lines: HashMap<(u64, u64), SelectedVersion> = HashMap::new();

        for name in tags {
            let tag = Tag::new(name.as_ref());
            let version = match tag.parse() {
                ParsedTag::Release(version) => version,
                ParsedTag::Prerelease(_) => {
                    selection.prerelease_tags += 1;
                    continue;
                }
                ParsedTag::Invalid => {
                    selection.invalid_tags += 1;
                    continue;
                }
            };
            selection.release_tags += 1;

            // Strictly greater replaces; on an exact tie the first tag seen stays.
            let line = (version.major, version.minor);
            let replace = lines
                .get(&line)
                .map_or(true, |current| version > current.version);
            if replace {
                lines.insert(
                    line,
                    SelectedVersion {
                        key: version.minor_key(),
                        version,
                        tag: tag.name,
                    },
                );
            }
        }

        let mut versions: Vec<SelectedVersion> = lines.into_values().collect();
        versions.sort_by(|a, b| b.version.cmp(&a.version));
        if let Some(max) = self.max_versions {
            versions.truncate(max);
        }

        selection.versions = versions;
        selection
    }
}

impl Default for VersionSelector {
    fn default() -> Self {
        VersionSelector::new(10)
    }
}
