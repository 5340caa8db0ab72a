use std::fmt;

/// A stable (non pre-release) semantic version.
///
/// Ordering is `(major, minor, patch)`; build metadata is dropped at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReleaseVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

/// Outcome of reading a version out of a tag name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedTag {
    Release(ReleaseVersion),
    Prerelease(semver::Version),
    Invalid,
}

impl ReleaseVersion {
    /// Create a new version
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        ReleaseVersion {
            major,
            minor,
            patch,
        }
    }

    /// Key of the minor release line, e.g. `"1.2"`
    pub fn minor_key(&self) -> String {
        format!("{}.{}", self.major, self.minor)
    }
}

impl From<&semver::Version> for ReleaseVersion {
    fn from(version: &semver::Version) -> Self {
        ReleaseVersion::new(version.major, version.minor, version.patch)
    }
}

impl fmt::Display for ReleaseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl ParsedTag {
    /// Classify a version string that already had its tag prefix removed
    pub fn from_version_str(version: &str) -> Self {
        match semver::Version::parse(version) {
            Ok(parsed) if parsed.pre.is_empty() => ParsedTag::Release(ReleaseVersion::from(&parsed)),
            Ok(parsed) => ParsedTag::Prerelease(parsed),
            Err(_) => ParsedTag::Invalid,
        }
    }
}
