//! Traits for reading package dates from Nexus and Cloudsmith

#[cfg(test)]
use mockall::automock;

use crate::freshness::timestamp::Timestamp;
use crate::freshness::types::{PackageFormat, PackageIdentifier};
use crate::source::error::SourceError;
use crate::source::filter::{ExcludeTags, PackageGroup};

/// The repository being migrated away from
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait NexusSource: Send + Sync {
    /// Lists every versionless package group of the given format
    async fn list_identifiers(
        &self,
        format: PackageFormat,
    ) -> Result<Vec<PackageIdentifier>, SourceError>;

    /// Fetches the `lastUpdated` date of a package group
    ///
    /// # Returns
    /// * `Ok(Some(_))` - The group exists and carries a valid date
    /// * `Ok(None)` - The group exists but its date is missing or unusable
    /// * `Err(SourceError::NotFound)` - The group is unknown to Nexus
    async fn get_timestamp(
        &self,
        identifier: &PackageIdentifier,
        format: PackageFormat,
    ) -> Result<Option<Timestamp>, SourceError>;
}

/// The repository being migrated to
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait CloudsmithSource: Send + Sync {
    /// Lists every package group of the given format, skipping excluded tags
    async fn list_package_groups(
        &self,
        format: PackageFormat,
        exclude_tags: &ExcludeTags,
    ) -> Result<Vec<PackageGroup>, SourceError>;

    /// Fetches the most recent push date of a package group, ignoring entries
    /// that carry any of `exclude_tags`
    async fn get_timestamp(
        &self,
        identifier: &PackageIdentifier,
        format: PackageFormat,
        exclude_tags: &ExcludeTags,
    ) -> Result<Option<Timestamp>, SourceError>;
}
