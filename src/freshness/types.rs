//! Common types for package formats and identifiers

use std::fmt;

/// Package ecosystem a package group belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackageFormat {
    /// Maven (groupId:artifactId)
    Maven,
    /// npm (package name)
    Npm,
    /// Python (distribution name)
    Python,
}

impl PackageFormat {
    /// All supported formats, in the order they are checked
    pub const ALL: [PackageFormat; 3] = [
        PackageFormat::Maven,
        PackageFormat::Npm,
        PackageFormat::Python,
    ];

    /// Returns the string representation used by fixtures and the Cloudsmith query language
    pub fn as_str(&self) -> &'static str {
        match self {
            PackageFormat::Maven => "maven",
            PackageFormat::Npm => "npm",
            PackageFormat::Python => "python",
        }
    }

    /// Whether packages of this format are keyed by group and artifact
    pub fn is_two_part(&self) -> bool {
        matches!(self, PackageFormat::Maven)
    }
}

impl fmt::Display for PackageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PackageFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "maven" => Ok(PackageFormat::Maven),
            "npm" => Ok(PackageFormat::Npm),
            "python" => Ok(PackageFormat::Python),
            _ => Err(()),
        }
    }
}

/// Versionless identity of a package group
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PackageIdentifier {
    /// Maven-style `group:artifact` coordinates
    TwoPart { group: String, artifact: String },
    /// Single-name packages (npm, Python)
    Named { name: String },
}

impl PackageIdentifier {
    pub fn two_part(group: impl Into<String>, artifact: impl Into<String>) -> Self {
        PackageIdentifier::TwoPart {
            group: group.into(),
            artifact: artifact.into(),
        }
    }

    pub fn named(name: impl Into<String>) -> Self {
        PackageIdentifier::Named { name: name.into() }
    }

    /// Builds an identifier from a display key for the given format.
    ///
    /// Two-part formats expect `group:artifact`; returns `None` when the key
    /// has no separator or an empty half.
    pub fn from_key(format: PackageFormat, key: &str) -> Option<Self> {
        if !format.is_two_part() {
            return (!key.is_empty()).then(|| Self::named(key));
        }

        let (group, artifact) = key.split_once(':')?;
        if group.is_empty() || artifact.is_empty() {
            return None;
        }
        Some(Self::two_part(group, artifact))
    }

    /// Key used in logs and reports (`group:artifact` or `name`)
    pub fn key(&self) -> String {
        match self {
            PackageIdentifier::TwoPart { group, artifact } => format!("{}:{}", group, artifact),
            PackageIdentifier::Named { name } => name.clone(),
        }
    }

    /// Cloudsmith search clause selecting exactly this package group
    pub fn cloudsmith_query(&self) -> String {
        match self {
            PackageIdentifier::TwoPart { group, artifact } => {
                format!("maven_group_id:^{}$ AND name:^{}$", group, artifact)
            }
            PackageIdentifier::Named { name } => format!("name:^{}$", name),
        }
    }
}

impl fmt::Display for PackageIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PackageIdentifier::TwoPart { group, artifact } => write!(f, "{}:{}", group, artifact),
            PackageIdentifier::Named { name } => f.write_str(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(PackageFormat::Maven, "com.indeed:util-core", Some(PackageIdentifier::two_part("com.indeed", "util-core")))]
    #[case(PackageFormat::Maven, "util-core", None)]
    #[case(PackageFormat::Maven, ":util-core", None)]
    #[case(PackageFormat::Maven, "com.indeed:", None)]
    #[case(PackageFormat::Npm, "@types/node", Some(PackageIdentifier::named("@types/node")))]
    #[case(PackageFormat::Python, "requests", Some(PackageIdentifier::named("requests")))]
    #[case(PackageFormat::Python, "", None)]
    fn from_key_returns_expected(
        #[case] format: PackageFormat,
        #[case] key: &str,
        #[case] expected: Option<PackageIdentifier>,
    ) {
        assert_eq!(PackageIdentifier::from_key(format, key), expected);
    }

    #[test]
    fn key_joins_two_part_identifiers_with_colon() {
        let identifier = PackageIdentifier::two_part("com.indeed", "util-core");

        assert_eq!(identifier.key(), "com.indeed:util-core");
        assert_eq!(identifier.to_string(), "com.indeed:util-core");
    }

    #[rstest]
    #[case(
        PackageIdentifier::two_part("com.indeed", "util-core"),
        "maven_group_id:^com.indeed$ AND name:^util-core$"
    )]
    #[case(PackageIdentifier::named("lodash"), "name:^lodash$")]
    fn cloudsmith_query_anchors_identifier(
        #[case] identifier: PackageIdentifier,
        #[case] expected: &str,
    ) {
        assert_eq!(identifier.cloudsmith_query(), expected);
    }

    #[test]
    fn format_round_trips_through_str() {
        for format in PackageFormat::ALL {
            assert_eq!(format.as_str().parse::<PackageFormat>(), Ok(format));
        }
        assert_eq!("gradle".parse::<PackageFormat>(), Err(()));
    }
}
