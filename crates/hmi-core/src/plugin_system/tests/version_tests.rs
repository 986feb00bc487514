use std::str::FromStr;

use crate::base::{ErrorException, ErrorKind};
use crate::plugin_system::{Version, VersionError};

#[test]
fn test_parse_full_and_partial_versions() {
    assert_eq!(Version::parse("1.2.3").unwrap(), Version::new(1, 2, 3));
    assert_eq!(Version::parse("1.2").unwrap(), Version::new(1, 2, 0));
    assert_eq!(Version::parse("4").unwrap(), Version::new(4, 0, 0));
    assert_eq!(Version::parse(" 0.9.1 ").unwrap(), Version::new(0, 9, 1));
    assert_eq!(Version::from_str("2.0.0").unwrap(), Version::new(2, 0, 0));
}

#[test]
fn test_parse_rejects_malformed_input() {
    assert!(matches!(Version::parse(""), Err(VersionError::InvalidFormat(_))));
    assert!(matches!(Version::parse("1.2.3.4"), Err(VersionError::InvalidFormat(_))));
    assert!(matches!(Version::parse("1.2.3-beta"), Err(VersionError::InvalidFormat(_))));
    assert!(matches!(Version::parse("a.b.c"), Err(VersionError::ParseError { .. })));
}

#[test]
fn test_ordering_is_lexicographic() {
    assert!(Version::new(1, 9, 9) < Version::new(2, 0, 0));
    assert!(Version::new(1, 10, 0) > Version::new(1, 9, 99));
    assert!(Version::new(1, 2, 3).satisfies(&Version::new(1, 2, 3)));
    assert!(!Version::new(1, 9, 9).satisfies(&Version::new(2, 0, 0)));
    assert!(Version::new(0, 0, 1).satisfies(&Version::ZERO));
}

#[test]
fn test_display_and_semver_conversion() {
    let version = Version::new(3, 1, 4);
    assert_eq!(version.to_string(), "3.1.4");
    assert_eq!(version.to_semver(), semver::Version::new(3, 1, 4));
    assert_eq!(Version::from(&semver::Version::new(3, 1, 4)), version);
    assert_eq!(Version::from((3, 1, 4)), version);
}

#[test]
fn test_serde_as_string() {
    let json = serde_json::to_string(&Version::new(1, 0, 2)).unwrap();
    assert_eq!(json, "\"1.0.2\"");
    let parsed: Version = serde_json::from_str("\"1.5\"").unwrap();
    assert_eq!(parsed, Version::new(1, 5, 0));
    assert!(serde_json::from_str::<Version>("\"x\"").is_err());
}

#[test]
fn test_version_error_carries_parse_kind() {
    let err: ErrorException = Version::parse("nope").unwrap_err().into();
    assert_eq!(err.kind(), &ErrorKind::Parse);
    assert_eq!(err.info().context(), Some("version"));
}
