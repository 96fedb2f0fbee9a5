//! Per-package freshness checks across both sources
//!
//! Fetch failures never stop a run: every error is logged and the affected
//! date is treated as unknown, so the remaining packages are still checked.

use tracing::{error, info, warn};

use crate::freshness::resolver::{DateSource, Freshness, TieBreak, resolve};
use crate::freshness::timestamp::{Timestamp, display_date};
use crate::freshness::types::{PackageFormat, PackageIdentifier};
use crate::source::error::SourceError;
use crate::source::filter::ExcludeTags;
use crate::source::traits::{CloudsmithSource, NexusSource};

/// Which sources take part in a check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceMode {
    #[default]
    Both,
    /// Skip Cloudsmith entirely
    NexusOnly,
    /// Enumerate and date packages from Cloudsmith alone
    CloudsmithOnly,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOptions {
    pub formats: Vec<PackageFormat>,
    pub exclude_tags: ExcludeTags,
    pub tie_break: TieBreak,
    pub mode: SourceMode,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            formats: vec![PackageFormat::Maven],
            exclude_tags: ExcludeTags::new(),
            tie_break: TieBreak::default(),
            mode: SourceMode::default(),
        }
    }
}

/// Outcome of checking one package group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreshnessRecord {
    pub format: PackageFormat,
    pub identifier: PackageIdentifier,
    pub nexus_date: Option<Timestamp>,
    pub cloudsmith_date: Option<Timestamp>,
    pub freshness: Freshness,
}

/// Counts of records per winning source
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub nexus: usize,
    pub cloudsmith: usize,
    pub unknown: usize,
}

impl Summary {
    pub fn from_records(records: &[FreshnessRecord]) -> Self {
        records.iter().fold(Self::default(), |mut summary, record| {
            summary.total += 1;
            match record.freshness.source {
                DateSource::Nexus => summary.nexus += 1,
                DateSource::Cloudsmith => summary.cloudsmith += 1,
                DateSource::Unknown => summary.unknown += 1,
            }
            summary
        })
    }

    pub fn log(&self) {
        info!("{}", "-".repeat(40));
        info!("Summary:");
        info!("{}", "-".repeat(40));
        info!("Total packages: {}", self.total);
        info!("Using Nexus date: {}", self.nexus);
        info!("Using Cloudsmith date: {}", self.cloudsmith);
        info!("Missing date: {}", self.unknown);
    }
}

/// Check every selected format and collect the records in order
pub async fn check_all(
    nexus: &dyn NexusSource,
    cloudsmith: &dyn CloudsmithSource,
    options: &CheckOptions,
) -> Vec<FreshnessRecord> {
    let mut records = Vec::new();
    for &format in &options.formats {
        records.extend(check_format(nexus, cloudsmith, format, options).await);
    }
    records
}

/// Check all package groups of a single format
pub async fn check_format(
    nexus: &dyn NexusSource,
    cloudsmith: &dyn CloudsmithSource,
    format: PackageFormat,
    options: &CheckOptions,
) -> Vec<FreshnessRecord> {
    info!("Starting freshness check for {} packages", format);

    let identifiers = match options.mode {
        SourceMode::CloudsmithOnly => list_from_cloudsmith(cloudsmith, format, options).await,
        SourceMode::Both | SourceMode::NexusOnly => list_from_nexus(nexus, format).await,
    };

    let mut records = Vec::with_capacity(identifiers.len());
    for identifier in identifiers {
        records.push(check_package(nexus, cloudsmith, format, identifier, options).await);
    }
    records
}

async fn list_from_nexus(nexus: &dyn NexusSource, format: PackageFormat) -> Vec<PackageIdentifier> {
    let identifiers = nexus
        .list_identifiers(format)
        .await
        .inspect_err(|e| error!("Failed to list {} packages from Nexus: {}", format, e))
        .unwrap_or_default();
    info!("Found {} {} packages in Nexus", identifiers.len(), format);
    identifiers
}

async fn list_from_cloudsmith(
    cloudsmith: &dyn CloudsmithSource,
    format: PackageFormat,
    options: &CheckOptions,
) -> Vec<PackageIdentifier> {
    let groups = cloudsmith
        .list_package_groups(format, &options.exclude_tags)
        .await
        .inspect_err(|e| error!("Failed to list {} groups from Cloudsmith: {}", format, e))
        .unwrap_or_default();

    let mut identifiers: Vec<PackageIdentifier> = Vec::with_capacity(groups.len());
    for group in groups {
        match PackageIdentifier::from_key(format, &group.name) {
            Some(identifier) if !identifiers.contains(&identifier) => identifiers.push(identifier),
            Some(_) => {}
            None => warn!("Skipping Cloudsmith group with unusable name {:?}", group.name),
        }
    }
    info!("Found {} {} packages in Cloudsmith", identifiers.len(), format);
    identifiers
}

async fn check_package(
    nexus: &dyn NexusSource,
    cloudsmith: &dyn CloudsmithSource,
    format: PackageFormat,
    identifier: PackageIdentifier,
    options: &CheckOptions,
) -> FreshnessRecord {
    let nexus_date = if options.mode == SourceMode::CloudsmithOnly {
        None
    } else {
        let result = nexus.get_timestamp(&identifier, format).await;
        degrade("Nexus", &identifier, result)
    };
    info!("Nexus date for {}: {}", identifier, display_date(nexus_date.as_ref()));

    let cloudsmith_date = if options.mode == SourceMode::NexusOnly {
        None
    } else {
        let result = cloudsmith
            .get_timestamp(&identifier, format, &options.exclude_tags)
            .await;
        degrade("Cloudsmith", &identifier, result)
    };
    info!(
        "Cloudsmith date for {}: {}",
        identifier,
        display_date(cloudsmith_date.as_ref())
    );

    let freshness = resolve(
        nexus_date.as_ref(),
        cloudsmith_date.as_ref(),
        options.tie_break,
    );
    info!(
        "Freshness date for {}: {} (from {})",
        identifier,
        display_date(freshness.timestamp.as_ref()),
        freshness.source
    );

    FreshnessRecord {
        format,
        identifier,
        nexus_date,
        cloudsmith_date,
        freshness,
    }
}

/// Turns a fetch result into an optional date, logging why a date is missing
fn degrade(
    source: &str,
    identifier: &PackageIdentifier,
    result: Result<Option<Timestamp>, SourceError>,
) -> Option<Timestamp> {
    match result {
        Ok(date) => date,
        Err(SourceError::NotFound(_)) => {
            info!("{} not found in {}", identifier, source);
            None
        }
        Err(e) => {
            error!("Failed to fetch {} date for {}: {}", source, identifier, e);
            None
        }
    }
}
