//! Offline Cloudsmith reader for `--mock` runs
//!
//! Reads `<fixtures_dir>/<format>/cloudsmith.json`, an array of package group
//! entries shaped like the API's, and applies the same tag exclusion.

use std::path::PathBuf;

use serde::Deserialize;
use tracing::{info, warn};

use crate::freshness::timestamp::Timestamp;
use crate::freshness::types::{PackageFormat, PackageIdentifier};
use crate::source::error::SourceError;
use crate::source::filter::{ExcludeTags, PackageGroup, latest_push};
use crate::source::readers::read_fixture;
use crate::source::readers::cloudsmith::RawGroup;
use crate::source::traits::CloudsmithSource;

const GROUPS_FILE: &str = "cloudsmith.json";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FixtureGroup {
    group_id: Option<String>,
    artifact_id: Option<String>,
    #[serde(flatten)]
    raw: RawGroup,
}

impl FixtureGroup {
    fn into_group(self) -> PackageGroup {
        let mut group = self.raw.into_group();
        if let (Some(g), Some(a)) = (self.group_id, self.artifact_id) {
            group.name = format!("{}:{}", g, a);
        }
        group
    }
}

pub struct CloudsmithFixtureSource {
    fixtures_dir: PathBuf,
}

impl CloudsmithFixtureSource {
    pub fn new(fixtures_dir: impl Into<PathBuf>) -> Self {
        Self {
            fixtures_dir: fixtures_dir.into(),
        }
    }

    /// Loads all groups for a format; a missing file means Cloudsmith has none
    async fn load(&self, format: PackageFormat) -> Result<Vec<PackageGroup>, SourceError> {
        let path = self.fixtures_dir.join(format.as_str()).join(GROUPS_FILE);
        info!("Using mock data for Cloudsmith {} groups: {:?}", format, path);

        match read_fixture::<Vec<FixtureGroup>>(&path).await {
            Ok(groups) => Ok(groups.into_iter().map(FixtureGroup::into_group).collect()),
            Err(SourceError::Io { source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                warn!("No Cloudsmith fixture at {:?}", path);
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }
}

#[async_trait::async_trait]
impl CloudsmithSource for CloudsmithFixtureSource {
    async fn list_package_groups(
        &self,
        format: PackageFormat,
        exclude_tags: &ExcludeTags,
    ) -> Result<Vec<PackageGroup>, SourceError> {
        let groups = self.load(format).await?;
        Ok(groups
            .into_iter()
            .filter(|group| !group.is_excluded(exclude_tags))
            .collect())
    }

    async fn get_timestamp(
        &self,
        identifier: &PackageIdentifier,
        format: PackageFormat,
        exclude_tags: &ExcludeTags,
    ) -> Result<Option<Timestamp>, SourceError> {
        let key = identifier.key();
        let groups = self.load(format).await?;

        Ok(latest_push(
            groups.iter().filter(|group| group.name == key),
            exclude_tags,
        ))
    }
}
