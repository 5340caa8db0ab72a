use super::version::ParsedTag;

/// Represents a git tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
}

impl Tag {
    /// Create a new tag from a string
    pub fn new(name: impl Into<String>) -> Self {
        Tag { name: name.into() }
    }

    /// Version part of the tag: a single leading `v` is stripped ("v1.2.3" -> "1.2.3")
    pub fn version_part(&self) -> &str {
        self.name.strip_prefix('v').unwrap_or(&self.name)
    }

    /// Classify the tag as release, pre-release or not a version at all
    pub fn parse(&self) -> ParsedTag {
        ParsedTag::from_version_str(self.version_part())
    }
}
