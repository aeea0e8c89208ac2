//! Document format versions.
//!
//! Every encoded document carries `version` as its last member. On decode
//! the version decides which migration, if any, runs before the document is
//! handed out.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::error::VersionError;

/// The format version stamped on every encoded document.
pub const CURRENT_VERSION: &str = "1.1.0";

/// The only major version this crate reads.
pub const SUPPORTED_MAJOR: u32 = 1;

static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)\.(\d+)\.(\d+)(?:\.(\d+))?(-SNAPSHOT)?$").expect("version pattern is valid")
});

/// A parsed `major.minor.patch[.build][-SNAPSHOT]` version.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocumentVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    pub build: Option<u32>,
    pub snapshot: bool,
}

impl DocumentVersion {
    pub fn parse(version: &str) -> Result<Self, VersionError> {
        let malformed = || VersionError::Malformed(version.to_string());
        let caps = VERSION_RE.captures(version).ok_or_else(malformed)?;
        let number = |i: usize| -> Result<Option<u32>, VersionError> {
            caps.get(i)
                .map(|m| m.as_str().parse::<u32>().map_err(|_| malformed()))
                .transpose()
        };

        Ok(Self {
            major: number(1)?.ok_or_else(malformed)?,
            minor: number(2)?.ok_or_else(malformed)?,
            patch: number(3)?.ok_or_else(malformed)?,
            build: number(4)?,
            snapshot: caps.get(5).is_some(),
        })
    }
}

impl fmt::Display for DocumentVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(build) = self.build {
            write!(f, ".{build}")?;
        }
        if self.snapshot {
            f.write_str("-SNAPSHOT")?;
        }
        Ok(())
    }
}

/// Which entity model a document was written with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaEpoch {
    /// No version member: mentions and resolutions as flat lists.
    PreV1,
    /// 1.0.x: flat lists, possibly alongside some entities.
    V1_0,
    /// 1.1 and later: entities only.
    Current,
}

impl SchemaEpoch {
    pub fn needs_migration(self) -> bool {
        self != SchemaEpoch::Current
    }
}

impl fmt::Display for SchemaEpoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SchemaEpoch::PreV1 => "pre-1.0",
            SchemaEpoch::V1_0 => "1.0",
            SchemaEpoch::Current => "1.1",
        })
    }
}

/// Checks document versions against what this crate can read.
pub struct VersionGate;

impl VersionGate {
    /// The version written on encode.
    pub fn current() -> &'static str {
        CURRENT_VERSION
    }

    /// Validates a decoded `version` member and picks the schema epoch.
    ///
    /// A missing version is the oldest format, not an error. A malformed
    /// version or a major version other than [`SUPPORTED_MAJOR`] fails.
    pub fn check(version: Option<&str>) -> Result<SchemaEpoch, VersionError> {
        let Some(version) = version else {
            return Ok(SchemaEpoch::PreV1);
        };
        let parsed = DocumentVersion::parse(version)?;
        if parsed.major != SUPPORTED_MAJOR {
            return Err(VersionError::Incompatible {
                version: version.to_string(),
                supported: SUPPORTED_MAJOR,
            });
        }
        Ok(if parsed.minor == 0 {
            SchemaEpoch::V1_0
        } else {
            SchemaEpoch::Current
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_version_is_accepted() {
        assert_eq!(VersionGate::check(Some(CURRENT_VERSION)), Ok(SchemaEpoch::Current));
    }

    #[test]
    fn missing_version_is_the_oldest_epoch() {
        assert_eq!(VersionGate::check(None), Ok(SchemaEpoch::PreV1));
    }

    #[test]
    fn epochs() {
        assert_eq!(VersionGate::check(Some("1.0.0")), Ok(SchemaEpoch::V1_0));
        assert_eq!(VersionGate::check(Some("1.0.3.7")), Ok(SchemaEpoch::V1_0));
        assert_eq!(VersionGate::check(Some("1.2.0-SNAPSHOT")), Ok(SchemaEpoch::Current));
    }

    #[test]
    fn other_majors_are_rejected() {
        let err = VersionGate::check(Some("2.0.0")).unwrap_err();
        assert_eq!(
            err,
            VersionError::Incompatible {
                version: "2.0.0".into(),
                supported: 1
            }
        );
        assert!(err.to_string().contains("2.0.0"));
    }

    #[test]
    fn malformed_versions_are_rejected() {
        for bad in ["1.1", "1.1.0.0.0", "v1.1.0", "", "1.1.x", "99999999999.0.0"] {
            assert!(
                matches!(VersionGate::check(Some(bad)), Err(VersionError::Malformed(_))),
                "{bad:?}"
            );
        }
    }

    #[test]
    fn display_round_trips() {
        for text in ["1.1.0", "1.0.2.4", "1.3.0-SNAPSHOT"] {
            assert_eq!(DocumentVersion::parse(text).unwrap().to_string(), text);
        }
    }
}
