//! In-memory sources for end-to-end tests

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use tempfile::TempDir;

use freshness_check::freshness::timestamp::Timestamp;
use freshness_check::freshness::types::{PackageFormat, PackageIdentifier};
use freshness_check::source::error::SourceError;
use freshness_check::source::filter::{ExcludeTags, PackageGroup, latest_push};
use freshness_check::source::traits::{CloudsmithSource, NexusSource};

pub fn ts(raw: &str) -> Timestamp {
    Timestamp::parse(raw).unwrap()
}

/// Nexus with fixed packages per format
#[derive(Default)]
pub struct StaticNexus {
    packages: HashMap<PackageFormat, Vec<(PackageIdentifier, Option<Timestamp>)>>,
    failing: Vec<PackageIdentifier>,
}

impl StaticNexus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_package(
        mut self,
        format: PackageFormat,
        identifier: PackageIdentifier,
        last_updated: Option<&str>,
    ) -> Self {
        self.packages
            .entry(format)
            .or_default()
            .push((identifier, last_updated.map(ts)));
        self
    }

    /// Listed, but every date lookup fails
    pub fn with_failing_package(mut self, format: PackageFormat, identifier: PackageIdentifier) -> Self {
        self.packages
            .entry(format)
            .or_default()
            .push((identifier.clone(), None));
        self.failing.push(identifier);
        self
    }
}

#[async_trait]
impl NexusSource for StaticNexus {
    async fn list_identifiers(
        &self,
        format: PackageFormat,
    ) -> Result<Vec<PackageIdentifier>, SourceError> {
        Ok(self
            .packages
            .get(&format)
            .map(|pkgs| pkgs.iter().map(|(id, _)| id.clone()).collect())
            .unwrap_or_default())
    }

    async fn get_timestamp(
        &self,
        identifier: &PackageIdentifier,
        format: PackageFormat,
    ) -> Result<Option<Timestamp>, SourceError> {
        if self.failing.contains(identifier) {
            return Err(SourceError::InvalidResponse("connection reset".to_string()));
        }
        self.packages
            .get(&format)
            .and_then(|pkgs| pkgs.iter().find(|(id, _)| id == identifier))
            .map(|(_, date)| date.clone())
            .ok_or_else(|| SourceError::NotFound(identifier.key()))
    }
}

/// Cloudsmith with fixed group entries per format
#[derive(Default)]
pub struct StaticCloudsmith {
    groups: HashMap<PackageFormat, Vec<PackageGroup>>,
}

impl StaticCloudsmith {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(
        mut self,
        format: PackageFormat,
        identifier: &PackageIdentifier,
        last_push: &str,
        tags: &[&str],
    ) -> Self {
        self.groups.entry(format).or_default().push(PackageGroup {
            name: identifier.key(),
            last_push: Some(ts(last_push)),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        });
        self
    }
}

#[async_trait]
impl CloudsmithSource for StaticCloudsmith {
    async fn list_package_groups(
        &self,
        format: PackageFormat,
        exclude_tags: &ExcludeTags,
    ) -> Result<Vec<PackageGroup>, SourceError> {
        Ok(self
            .groups
            .get(&format)
            .map(|groups| {
                groups
                    .iter()
                    .filter(|g| !g.is_excluded(exclude_tags))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn get_timestamp(
        &self,
        identifier: &PackageIdentifier,
        format: PackageFormat,
        exclude_tags: &ExcludeTags,
    ) -> Result<Option<Timestamp>, SourceError> {
        let key = identifier.key();
        Ok(self.groups.get(&format).and_then(|groups| {
            latest_push(groups.iter().filter(|g| g.name == key), exclude_tags)
        }))
    }
}

pub fn exclude(tags: &[&str]) -> ExcludeTags {
    tags.iter().map(|t| t.to_string()).collect()
}

/// Writes `<dir>/<format>/<file>` and returns the fixtures root
pub fn write_fixture<'a>(dir: &'a TempDir, format: PackageFormat, file: &str, body: &str) -> &'a Path {
    let format_dir = dir.path().join(format.as_str());
    std::fs::create_dir_all(&format_dir).unwrap();
    std::fs::write(format_dir.join(file), body).unwrap();
    dir.path()
}
