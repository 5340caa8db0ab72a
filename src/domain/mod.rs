//! Domain logic - pure version rules independent of git operations

pub mod selector;
pub mod tag;
pub mod version;

pub use selector::{SelectedVersion, Selection, VersionSelector};
pub use tag::Tag;
pub use version::{ParsedTag, ReleaseVersion};
