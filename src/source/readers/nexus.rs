//! Nexus package dates read from exported fixtures
//!
//! Each format has a `<fixtures_dir>/<format>/packages.json` holding an array of
//! package groups. Maven entries carry `groupId`/`artifactId`, others `name`.
//! The date is `lastUpdated`, or the `<lastUpdated>` of an embedded
//! maven-metadata.xml document under `metadata`.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::freshness::timestamp::{Timestamp, parse_maven_metadata_last_updated};
use crate::freshness::types::{PackageFormat, PackageIdentifier};
use crate::source::error::SourceError;
use crate::source::readers::read_fixture;
use crate::source::traits::NexusSource;

/// File name of the per-format package export
const PACKAGES_FILE: &str = "packages.json";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NexusPackage {
    group_id: Option<String>,
    artifact_id: Option<String>,
    name: Option<String>,
    last_updated: Option<String>,
    /// Raw maven-metadata.xml
    metadata: Option<String>,
}

impl NexusPackage {
    fn identifier(&self, format: PackageFormat) -> Option<PackageIdentifier> {
        if format.is_two_part() {
            match (&self.group_id, &self.artifact_id) {
                (Some(group), Some(artifact)) => {
                    Some(PackageIdentifier::two_part(group, artifact))
                }
                _ => None,
            }
        } else {
            self.name.as_deref().map(PackageIdentifier::named)
        }
    }

    fn raw_last_updated(&self) -> Option<String> {
        self.last_updated.clone().or_else(|| {
            self.metadata
                .as_deref()
                .and_then(parse_maven_metadata_last_updated)
        })
    }
}

/// Nexus reader backed by a fixtures directory
pub struct NexusFixtureSource {
    fixtures_dir: PathBuf,
}

impl NexusFixtureSource {
    pub fn new(fixtures_dir: impl Into<PathBuf>) -> Self {
        Self {
            fixtures_dir: fixtures_dir.into(),
        }
    }

    pub fn fixtures_dir(&self) -> &Path {
        &self.fixtures_dir
    }

    fn packages_path(&self, format: PackageFormat) -> PathBuf {
        self.fixtures_dir.join(format.as_str()).join(PACKAGES_FILE)
    }

    async fn load(&self, format: PackageFormat) -> Result<Vec<NexusPackage>, SourceError> {
        read_fixture(&self.packages_path(format)).await
    }
}

#[async_trait::async_trait]
impl NexusSource for NexusFixtureSource {
    async fn list_identifiers(
        &self,
        format: PackageFormat,
    ) -> Result<Vec<PackageIdentifier>, SourceError> {
        let packages = self.load(format).await?;
        info!("Loaded {} {} packages from fixtures", packages.len(), format);

        let identifiers = packages
            .iter()
            .filter_map(|pkg| {
                let identifier = pkg.identifier(format);
                if identifier.is_none() {
                    warn!("Skipping {} fixture entry without identifier: {:?}", format, pkg);
                }
                identifier
            })
            .collect();

        Ok(identifiers)
    }

    async fn get_timestamp(
        &self,
        identifier: &PackageIdentifier,
        format: PackageFormat,
    ) -> Result<Option<Timestamp>, SourceError> {
        let packages = self.load(format).await?;

        let Some(package) = packages
            .iter()
            .find(|pkg| pkg.identifier(format).as_ref() == Some(identifier))
        else {
            return Err(SourceError::NotFound(identifier.key()));
        };

        let Some(raw) = package.raw_last_updated() else {
            debug!("No lastUpdated for {} in Nexus fixtures", identifier);
            return Ok(None);
        };

        match Timestamp::parse(&raw) {
            Ok(timestamp) => Ok(Some(timestamp)),
            Err(e) => {
                warn!("Ignoring Nexus date for {}: {}", identifier, e);
                Ok(None)
            }
        }
    }
}
