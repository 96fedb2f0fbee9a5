//! `YYYYMMDDHHMMSS` timestamps and their display form

use std::fmt;
use std::sync::LazyLock;

use chrono::{DateTime, NaiveDateTime, Utc};
use regex::Regex;
use thiserror::Error;

/// Compact format shared by maven-metadata.xml `lastUpdated` and the reports
const COMPACT_FORMAT: &str = "%Y%m%d%H%M%S";

/// Number of digits in a compact timestamp
const TIMESTAMP_LEN: usize = 14;

static MAVEN_LAST_UPDATED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<versioning>.*?<lastUpdated>\s*([^<\s]+)\s*</lastUpdated>")
        .expect("valid lastUpdated regex")
});

#[derive(Debug, Error, PartialEq)]
pub enum TimestampError {
    #[error("Not a 14-digit timestamp: {0:?}")]
    Invalid(String),

    #[error("Unparseable date {value:?}: {source}")]
    Unparseable {
        value: String,
        source: chrono::ParseError,
    },
}

/// A 14-digit `YYYYMMDDHHMMSS` timestamp.
///
/// All values have the same width, so ordering the digit string is the same as
/// ordering the integers they spell.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(String);

impl Timestamp {
    /// Validates a raw compact timestamp
    pub fn parse(raw: &str) -> Result<Self, TimestampError> {
        let trimmed = raw.trim();
        if is_compact(trimmed) {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(TimestampError::Invalid(raw.to_string()))
        }
    }

    /// Converts an ISO-8601 date as returned by Cloudsmith (`2025-03-26T12:00:00Z`).
    ///
    /// Offsets are normalized to UTC; values without an offset are taken as UTC.
    pub fn from_iso8601(raw: &str) -> Result<Self, TimestampError> {
        if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
            return Self::from_datetime(&parsed.with_timezone(&Utc));
        }

        let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").map_err(|source| {
            TimestampError::Unparseable {
                value: raw.to_string(),
                source,
            }
        })?;
        Self::from_datetime(&naive.and_utc())
    }

    /// Fails for years outside `0000..=9999`, which do not fit 14 digits
    pub fn from_datetime(datetime: &DateTime<Utc>) -> Result<Self, TimestampError> {
        let formatted = datetime.format(COMPACT_FORMAT).to_string();
        if is_compact(&formatted) {
            Ok(Self(formatted))
        } else {
            Err(TimestampError::Invalid(formatted))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Integer value of the timestamp
    pub fn value(&self) -> u64 {
        self.0
            .bytes()
            .fold(0, |acc, digit| acc * 10 + u64::from(digit - b'0'))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Timestamp {
    type Err = TimestampError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn is_compact(raw: &str) -> bool {
    raw.len() == TIMESTAMP_LEN && raw.bytes().all(|b| b.is_ascii_digit())
}

/// Formats a raw timestamp for humans.
///
/// Missing or empty values become `N/A`, compact timestamps become
/// `YYYY-MM-DD HH:MM:SS`, and anything else is returned unchanged.
pub fn format_for_display(raw: Option<&str>) -> String {
    let Some(raw) = raw.filter(|r| !r.is_empty()) else {
        return "N/A".to_string();
    };

    if !is_compact(raw) {
        return raw.to_string();
    }

    format!(
        "{}-{}-{} {}:{}:{}",
        &raw[0..4],
        &raw[4..6],
        &raw[6..8],
        &raw[8..10],
        &raw[10..12],
        &raw[12..14]
    )
}

/// Display form of an optional validated timestamp
pub fn display_date(timestamp: Option<&Timestamp>) -> String {
    format_for_display(timestamp.map(Timestamp::as_str))
}

/// Extracts `<versioning><lastUpdated>` from a maven-metadata.xml document
pub fn parse_maven_metadata_last_updated(xml: &str) -> Option<String> {
    MAVEN_LAST_UPDATED_RE
        .captures(xml)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, "N/A")]
    #[case(Some(""), "N/A")]
    #[case(Some("20250326120000"), "2025-03-26 12:00:00")]
    #[case(Some("bogus"), "bogus")]
    #[case(Some("2025032612000"), "2025032612000")]
    #[case(Some("2025-03-26"), "2025-03-26")]
    fn format_for_display_returns_expected(#[case] raw: Option<&str>, #[case] expected: &str) {
        assert_eq!(format_for_display(raw), expected);
    }

    #[rstest]
    #[case("20250326120000", true)]
    #[case(" 20250326120000 ", true)]
    #[case("2025032612000", false)]
    #[case("2025-03-26T12:00", false)]
    #[case("", false)]
    fn parse_accepts_only_fourteen_digits(#[case] raw: &str, #[case] valid: bool) {
        assert_eq!(Timestamp::parse(raw).is_ok(), valid);
    }

    #[rstest]
    #[case("2025-03-26T12:00:00Z", "20250326120000")]
    #[case("2025-03-26T12:00:00.123456Z", "20250326120000")]
    #[case("2025-03-26T14:00:00+02:00", "20250326120000")]
    #[case("2025-03-26T12:00:00", "20250326120000")]
    fn from_iso8601_normalizes_to_utc(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(Timestamp::from_iso8601(raw).unwrap().as_str(), expected);
    }

    #[rstest]
    #[case("+12345-01-01T00:00:00")]
    #[case("+12345-01-01T00:00:00Z")]
    fn from_iso8601_rejects_years_wider_than_four_digits(#[case] raw: &str) {
        assert!(Timestamp::from_iso8601(raw).is_err());
    }

    #[test]
    fn from_datetime_rejects_negative_years() {
        let datetime = chrono::NaiveDate::from_ymd_opt(-1, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
            .and_utc();

        assert!(matches!(
            Timestamp::from_datetime(&datetime),
            Err(TimestampError::Invalid(_))
        ));
    }

    #[rstest]
    #[case(None, "N/A")]
    #[case(Some("20250326120000"), "2025-03-26 12:00:00")]
    fn display_date_formats_validated_timestamps(#[case] raw: Option<&str>, #[case] expected: &str) {
        let timestamp = raw.map(|r| Timestamp::parse(r).unwrap());

        assert_eq!(display_date(timestamp.as_ref()), expected);
    }

    #[test]
    fn from_iso8601_rejects_garbage() {
        assert!(matches!(
            Timestamp::from_iso8601("yesterday"),
            Err(TimestampError::Unparseable { .. })
        ));
    }

    #[test]
    fn ordering_matches_integer_ordering() {
        let older = Timestamp::parse("20250326120000").unwrap();
        let newer = Timestamp::parse("20250401120000").unwrap();

        assert!(older < newer);
        assert!(older.value() < newer.value());
        assert_eq!(older.value(), 20250326120000);
    }

    #[test]
    fn parse_maven_metadata_last_updated_reads_versioning_block() {
        let xml = r#"
            <metadata>
                <groupId>com.indeed</groupId>
                <artifactId>util-core</artifactId>
                <versioning>
                    <latest>2.1.1</latest>
                    <release>2.1.1</release>
                    <versions>
                        <version>2.1.0</version>
                        <version>2.1.1</version>
                    </versions>
                    <lastUpdated>20250326120000</lastUpdated>
                </versioning>
            </metadata>
        "#;

        assert_eq!(
            parse_maven_metadata_last_updated(xml),
            Some("20250326120000".to_string())
        );
    }

    #[test]
    fn parse_maven_metadata_last_updated_returns_none_without_versioning() {
        let xml = "<metadata><groupId>com.indeed</groupId></metadata>";

        assert_eq!(parse_maven_metadata_last_updated(xml), None);
    }
}
