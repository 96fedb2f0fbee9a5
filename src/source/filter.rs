//! Tag-based exclusion of Cloudsmith package groups

use std::collections::BTreeSet;

use crate::freshness::timestamp::Timestamp;

/// Tags whose entries are ignored when computing a Cloudsmith date.
///
/// Ordered so generated queries are stable.
pub type ExcludeTags = BTreeSet<String>;

/// One package group entry as reported by Cloudsmith
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageGroup {
    /// Group identity (`group:artifact` for Maven, name otherwise)
    pub name: String,
    /// Most recent push into the group, if known
    pub last_push: Option<Timestamp>,
    pub tags: Vec<String>,
}

impl PackageGroup {
    pub fn is_excluded(&self, exclude_tags: &ExcludeTags) -> bool {
        self.tags.iter().any(|tag| exclude_tags.contains(tag))
    }
}

/// Most recent push among entries carrying none of the excluded tags.
///
/// Returns `None` when every entry is excluded or none has a push date.
pub fn latest_push<'a>(
    groups: impl IntoIterator<Item = &'a PackageGroup>,
    exclude_tags: &ExcludeTags,
) -> Option<Timestamp> {
    groups
        .into_iter()
        .filter(|group| !group.is_excluded(exclude_tags))
        .filter_map(|group| group.last_push.clone())
        .max()
}
