//! Freshness resolution between the Nexus and Cloudsmith dates
//!
//! Two historical variants of the comparison disagree on which date wins when
//! both sources report one, so the direction is an explicit [`TieBreak`].

use std::fmt;

use serde::Deserialize;

use crate::freshness::timestamp::Timestamp;

/// Which of two present dates is authoritative
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum TieBreak {
    /// The more recent date wins; equal dates go to Cloudsmith
    #[default]
    PreferNewer,
    /// The older date wins; equal dates go to Nexus
    PreferOlder,
}

/// Source a freshness date was taken from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateSource {
    Nexus,
    Cloudsmith,
    Unknown,
}

impl DateSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            DateSource::Nexus => "nexus",
            DateSource::Cloudsmith => "cloudsmith",
            DateSource::Unknown => "unknown",
        }
    }
}

impl fmt::Display for DateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Selected freshness date and where it came from.
///
/// `source` is [`DateSource::Unknown`] exactly when `timestamp` is `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Freshness {
    pub timestamp: Option<Timestamp>,
    pub source: DateSource,
}

impl Freshness {
    fn taken_from(timestamp: &Timestamp, source: DateSource) -> Self {
        Self {
            timestamp: Some(timestamp.clone()),
            source,
        }
    }

    pub fn unknown() -> Self {
        Self {
            timestamp: None,
            source: DateSource::Unknown,
        }
    }
}

/// Picks the authoritative date for a package group
pub fn resolve(
    nexus: Option<&Timestamp>,
    cloudsmith: Option<&Timestamp>,
    tie_break: TieBreak,
) -> Freshness {
    match (nexus, cloudsmith) {
        (None, None) => Freshness::unknown(),
        (Some(n), None) => Freshness::taken_from(n, DateSource::Nexus),
        (None, Some(c)) => Freshness::taken_from(c, DateSource::Cloudsmith),
        (Some(n), Some(c)) => {
            let nexus_wins = match tie_break {
                TieBreak::PreferNewer => n.value() > c.value(),
                TieBreak::PreferOlder => n.value() <= c.value(),
            };
            if nexus_wins {
                Freshness::taken_from(n, DateSource::Nexus)
            } else {
                Freshness::taken_from(c, DateSource::Cloudsmith)
            }
        }
    }
}
