use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::freshness::resolver::TieBreak;

// =============================================================================
// Cloudsmith defaults
// =============================================================================

pub const DEFAULT_CLOUDSMITH_BASE_URL: &str = "https://api.cloudsmith.io";

pub const DEFAULT_CLOUDSMITH_ORG: &str = "indeed";

pub const DEFAULT_CLOUDSMITH_REPO: &str = "maven-repo";

/// Groups requested per page from the Cloudsmith API
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Upper bound on pages fetched for one listing or lookup
pub const DEFAULT_MAX_PAGES: u32 = 1000;

/// User agent sent with every HTTP request
pub const USER_AGENT: &str = "freshness-check";

/// Directory holding the Nexus package exports, relative to the working directory
pub const DEFAULT_FIXTURES_DIR: &str = "fixtures";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Top-level configuration, loadable from a JSON file
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct FreshnessConfig {
    pub cloudsmith: CloudsmithConfig,
    pub fixtures_dir: PathBuf,
    pub exclude_tags: Vec<String>,
    pub tie_break: TieBreak,
}

impl Default for FreshnessConfig {
    fn default() -> Self {
        Self {
            cloudsmith: CloudsmithConfig::default(),
            fixtures_dir: PathBuf::from(DEFAULT_FIXTURES_DIR),
            exclude_tags: Vec::new(),
            tie_break: TieBreak::default(),
        }
    }
}

impl FreshnessConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Connection settings for the Cloudsmith API
#[derive(Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CloudsmithConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub org: String,
    pub repo: String,
    pub page_size: u32,
    pub max_pages: u32,
}

impl Default for CloudsmithConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_CLOUDSMITH_BASE_URL.to_string(),
            api_key: None,
            org: DEFAULT_CLOUDSMITH_ORG.to_string(),
            repo: DEFAULT_CLOUDSMITH_REPO.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }
}

// Keeps the API key out of logs.
impl fmt::Debug for CloudsmithConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloudsmithConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("org", &self.org)
            .field("repo", &self.repo)
            .field("page_size", &self.page_size)
            .field("max_pages", &self.max_pages)
            .finish()
    }
}

/// Returns the path to the data directory for freshness-check.
/// Uses $XDG_DATA_HOME/freshness-check if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/freshness-check,
/// or ./freshness-check if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the default path of the log file.
pub fn log_path() -> PathBuf {
    data_dir().join("freshness-check.log")
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("freshness-check")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn freshness_config_from_partial_object_uses_defaults_for_missing_fields() {
        let result = serde_json::from_value::<FreshnessConfig>(json!({
            "cloudsmith": {
                "org": "acme"
            }
        }))
        .unwrap();

        assert_eq!(result.cloudsmith.org, "acme");
        assert_eq!(result.cloudsmith.base_url, DEFAULT_CLOUDSMITH_BASE_URL);
        assert_eq!(result.cloudsmith.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(result.cloudsmith.max_pages, DEFAULT_MAX_PAGES);
        assert_eq!(result.fixtures_dir, PathBuf::from(DEFAULT_FIXTURES_DIR));
        assert_eq!(result.tie_break, TieBreak::PreferNewer);
    }

    #[test]
    fn freshness_config_from_full_object_parses_all_fields() {
        let result = serde_json::from_value::<FreshnessConfig>(json!({
            "cloudsmith": {
                "baseUrl": "http://localhost:8080",
                "apiKey": "secret",
                "org": "acme",
                "repo": "npm-repo",
                "pageSize": 25,
                "maxPages": 10
            },
            "fixturesDir": "/srv/nexus-export",
            "excludeTags": ["nexus-upstream"],
            "tieBreak": "prefer-older"
        }))
        .unwrap();

        assert_eq!(
            result,
            FreshnessConfig {
                cloudsmith: CloudsmithConfig {
                    base_url: "http://localhost:8080".to_string(),
                    api_key: Some("secret".to_string()),
                    org: "acme".to_string(),
                    repo: "npm-repo".to_string(),
                    page_size: 25,
                    max_pages: 10,
                },
                fixtures_dir: PathBuf::from("/srv/nexus-export"),
                exclude_tags: vec!["nexus-upstream".to_string()],
                tie_break: TieBreak::PreferOlder,
            }
        );
    }

    #[test]
    fn load_reports_invalid_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ nope").unwrap();

        let result = FreshnessConfig::load(&path);

        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = TempDir::new().unwrap();

        let result = FreshnessConfig::load(&dir.path().join("absent.json"));

        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn cloudsmith_config_debug_redacts_api_key() {
        let config = CloudsmithConfig {
            api_key: Some("secret".to_string()),
            ..CloudsmithConfig::default()
        };

        let debug = format!("{:?}", config);

        assert!(!debug.contains("secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn data_dir_with_env_uses_xdg_data_home_when_set() {
        let path = data_dir_with_env(
            Some("/tmp/test-data".to_string()),
            Some(PathBuf::from("/home/user")),
        );

        assert_eq!(path, PathBuf::from("/tmp/test-data/freshness-check"));
    }

    #[test]
    fn data_dir_with_env_falls_back_to_home_local_share() {
        let path = data_dir_with_env(None, Some(PathBuf::from("/home/user")));

        assert_eq!(
            path,
            PathBuf::from("/home/user/.local/share/freshness-check")
        );
    }

    #[test]
    fn data_dir_with_env_falls_back_to_current_dir_when_no_dirs_available() {
        let path = data_dir_with_env(None, None);
        assert_eq!(path, PathBuf::from("./freshness-check"));
    }
}
