//! Source reader implementations

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::source::error::SourceError;

pub mod cloudsmith;
pub mod cloudsmith_fixture;
pub mod nexus;

pub use cloudsmith::CloudsmithRegistry;
pub use cloudsmith_fixture::CloudsmithFixtureSource;
pub use nexus::NexusFixtureSource;

/// Reads and deserializes a JSON fixture file
async fn read_fixture<T: DeserializeOwned>(path: &Path) -> Result<T, SourceError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| SourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    serde_json::from_str(&content).map_err(|e| SourceError::MalformedFixture {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}
