//! Command-line arguments and how they combine with the config file

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::{ConfigError, FreshnessConfig, log_path};
use crate::freshness::checker::{CheckOptions, SourceMode};
use crate::freshness::resolver::TieBreak;
use crate::freshness::types::PackageFormat;

/// Formats selectable on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Maven,
    Npm,
    Python,
    All,
}

impl FormatArg {
    pub fn formats(&self) -> Vec<PackageFormat> {
        match self {
            FormatArg::Maven => vec![PackageFormat::Maven],
            FormatArg::Npm => vec![PackageFormat::Npm],
            FormatArg::Python => vec![PackageFormat::Python],
            FormatArg::All => PackageFormat::ALL.to_vec(),
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "freshness-check")]
#[command(
    version,
    about = "Check package freshness during a Nexus to Cloudsmith migration"
)]
pub struct Cli {
    /// Package format to check
    #[arg(long, value_enum, default_value_t = FormatArg::Maven)]
    pub format: FormatArg,

    /// Ignore Cloudsmith entries carrying this tag (repeatable)
    #[arg(long = "exclude-tag", value_name = "TAG", alias = "upstream-tag-to-exclude")]
    pub exclude_tags: Vec<String>,

    /// Which date wins when both sources have one [default: prefer-newer]
    #[arg(long, value_enum)]
    pub tie_break: Option<TieBreak>,

    /// Only use Nexus dates
    #[arg(long, conflicts_with = "cloudsmith_only")]
    pub nexus_only: bool,

    /// Only use Cloudsmith, enumerating its package groups
    #[arg(long)]
    pub cloudsmith_only: bool,

    /// Read Cloudsmith data from fixtures instead of the API
    #[arg(long)]
    pub mock: bool,

    /// Write all results to this CSV file
    #[arg(long, value_name = "PATH")]
    pub output_csv: Option<PathBuf>,

    /// Directory with `<format>/packages.json` Nexus exports
    #[arg(long, value_name = "DIR")]
    pub fixtures_dir: Option<PathBuf>,

    /// JSON configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[arg(long, env = "CLOUDSMITH_BASE_URL", value_name = "URL")]
    pub cloudsmith_base_url: Option<String>,

    #[arg(long, env = "CLOUDSMITH_API_KEY", hide_env_values = true)]
    pub cloudsmith_api_key: Option<String>,

    #[arg(long, env = "CLOUDSMITH_ORG")]
    pub cloudsmith_org: Option<String>,

    #[arg(long, env = "CLOUDSMITH_REPO")]
    pub cloudsmith_repo: Option<String>,

    /// Log level when RUST_LOG is unset (error, warn, info, debug, trace)
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    pub log_level: String,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,

    /// Also write logs to a file (defaults to the data directory)
    #[arg(long, value_name = "PATH", num_args = 0..=1)]
    pub log_file: Option<Option<PathBuf>>,
}

impl Cli {
    /// Log file requested on the command line, if any
    pub fn log_file_path(&self) -> Option<PathBuf> {
        self.log_file
            .as_ref()
            .map(|path| path.clone().unwrap_or_else(log_path))
    }

    /// Loads the config file (if any) and applies command-line overrides
    pub fn resolve_config(&self) -> Result<FreshnessConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => FreshnessConfig::load(path)?,
            None => FreshnessConfig::default(),
        };

        if let Some(dir) = &self.fixtures_dir {
            config.fixtures_dir = dir.clone();
        }
        if !self.exclude_tags.is_empty() {
            config.exclude_tags = self.exclude_tags.clone();
        }
        if let Some(tie_break) = self.tie_break {
            config.tie_break = tie_break;
        }

        let cloudsmith = &mut config.cloudsmith;
        if let Some(base_url) = &self.cloudsmith_base_url {
            cloudsmith.base_url = base_url.clone();
        }
        if let Some(api_key) = &self.cloudsmith_api_key {
            cloudsmith.api_key = Some(api_key.clone());
        }
        if let Some(org) = &self.cloudsmith_org {
            cloudsmith.org = org.clone();
        }
        if let Some(repo) = &self.cloudsmith_repo {
            cloudsmith.repo = repo.clone();
        }

        Ok(config)
    }

    pub fn source_mode(&self) -> SourceMode {
        if self.nexus_only {
            SourceMode::NexusOnly
        } else if self.cloudsmith_only {
            SourceMode::CloudsmithOnly
        } else {
            SourceMode::Both
        }
    }

    pub fn check_options(&self, config: &FreshnessConfig) -> CheckOptions {
        CheckOptions {
            formats: self.format.formats(),
            exclude_tags: config.exclude_tags.iter().cloned().collect(),
            tie_break: config.tie_break,
            mode: self.source_mode(),
        }
    }
}
