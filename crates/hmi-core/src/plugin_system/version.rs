use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::base::{ErrorInfo, ErrorKind, ToErrorInfo};

/// Error type for version parsing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    #[error("Invalid version format: '{0}'")]
    InvalidFormat(String),
    #[error("Version parse error for '{input}': {message}")]
    ParseError { input: String, message: String },
}

impl ToErrorInfo for VersionError {
    fn error_info(&self) -> ErrorInfo {
        ErrorInfo::new(ErrorKind::Parse, self.to_string()).with_context("version")
    }
}

/// Semantic version triple. Ordering is lexicographic on
/// `(major, minor, patch)`, which the field order gives us for free.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl Version {
    /// The lowest version; a minimum of `0.0.0` accepts anything
    pub const ZERO: Version = Version::new(0, 0, 0);

    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self { major, minor, patch }
    }

    /// Parses `"1"`, `"1.2"` or `"1.2.3"`; missing components are zero.
    /// Pre-release and build metadata are rejected since the triple cannot
    /// order them.
    pub fn parse(input: &str) -> Result<Self, VersionError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(VersionError::InvalidFormat(input.to_string()));
        }

        let parts = trimmed.split('.').count();
        let normalized = match parts {
            1 => format!("{}.0.0", trimmed),
            2 => format!("{}.0", trimmed),
            3 => trimmed.to_string(),
            _ => return Err(VersionError::InvalidFormat(input.to_string())),
        };

        let parsed = semver::Version::parse(&normalized).map_err(|e| VersionError::ParseError {
            input: input.to_string(),
            message: e.to_string(),
        })?;
        if !parsed.pre.is_empty() || !parsed.build.is_empty() {
            return Err(VersionError::InvalidFormat(input.to_string()));
        }
        Ok(Self::from(&parsed))
    }

    /// Whether this version meets `minimum`
    pub fn satisfies(&self, minimum: &Version) -> bool {
        self >= minimum
    }

    pub fn to_semver(&self) -> semver::Version {
        semver::Version::new(self.major, self.minor, self.patch)
    }
}

impl From<&semver::Version> for Version {
    fn from(v: &semver::Version) -> Self {
        Self::new(v.major, v.minor, v.patch)
    }
}

impl From<(u64, u64, u64)> for Version {
    fn from((major, minor, patch): (u64, u64, u64)) -> Self {
        Self::new(major, minor, patch)
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Version::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

// Versions travel as strings in manifests
impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Version::parse(&raw).map_err(serde::de::Error::custom)
    }
}
