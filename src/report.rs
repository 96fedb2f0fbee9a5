//! CSV export of freshness records

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use thiserror::Error;

use crate::freshness::checker::FreshnessRecord;
use crate::freshness::types::PackageIdentifier;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// One CSV line; Maven rows fill `groupId`/`artifactId`, others `name`
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    format: &'static str,
    #[serde(rename = "groupId")]
    group_id: &'a str,
    #[serde(rename = "artifactId")]
    artifact_id: &'a str,
    name: &'a str,
    nexus_date: &'a str,
    cloudsmith_date: &'a str,
    freshness_date: &'a str,
    source: &'static str,
}

impl<'a> From<&'a FreshnessRecord> for CsvRow<'a> {
    fn from(record: &'a FreshnessRecord) -> Self {
        let (group_id, artifact_id, name) = match &record.identifier {
            PackageIdentifier::TwoPart { group, artifact } => (group.as_str(), artifact.as_str(), ""),
            PackageIdentifier::Named { name } => ("", "", name.as_str()),
        };

        Self {
            format: record.format.as_str(),
            group_id,
            artifact_id,
            name,
            nexus_date: record.nexus_date.as_ref().map_or("", |t| t.as_str()),
            cloudsmith_date: record.cloudsmith_date.as_ref().map_or("", |t| t.as_str()),
            freshness_date: record.freshness.timestamp.as_ref().map_or("", |t| t.as_str()),
            source: record.freshness.source.as_str(),
        }
    }
}

/// Writes records as CSV, header first
pub fn write_records<W: Write>(writer: W, records: &[FreshnessRecord]) -> Result<(), ReportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for record in records {
        csv_writer.serialize(CsvRow::from(record))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Writes records to a CSV file, replacing any existing file
pub fn write_csv(path: &Path, records: &[FreshnessRecord]) -> Result<(), ReportError> {
    let file = std::fs::File::create(path)?;
    write_records(file, records)
}
