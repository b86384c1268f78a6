//! Document schema versions
//!
//! `wolfes_version` is a dotted numeric string with up to four groups
//! (major.minor.patch.build). Only major and minor take part in the
//! support check.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::diagnostics::{DiagnosticCode, DiagnosticItem, Diagnostics};
use crate::error::{CompileError, Result};
use crate::location::Location;

/// (major, minor) pairs this compiler accepts
pub const SUPPORTED_VERSIONS: &[(u64, u64)] = &[(0, 7), (0, 8), (0, 9), (1, 0)];

/// Number of groups that are kept when parsing
const MAX_GROUPS: usize = 4;

/// A parsed document version
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub build: u64,
}

impl Version {
    pub fn new(major: u64, minor: u64, patch: u64, build: u64) -> Self {
        Self {
            major,
            minor,
            patch,
            build,
        }
    }

    /// Check if this version is in the built-in allow-list
    pub fn is_supported(&self) -> bool {
        is_supported(self, SUPPORTED_VERSIONS)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}.{}", self.major, self.minor, self.patch, self.build)
    }
}

impl FromStr for Version {
    type Err = CompileError;

    fn from_str(s: &str) -> Result<Self> {
        parse_version(s, &Location::root(), &mut Diagnostics::new())
    }
}

/// Parse a dotted version string.
///
/// Missing groups default to 0; groups after the fourth are dropped with a
/// warning pushed to `diagnostics`.
pub fn parse_version(s: &str, location: &Location, diagnostics: &mut Diagnostics) -> Result<Version> {
    if s.is_empty() || s.chars().any(|c| !c.is_ascii_digit() && c != '.') {
        return Err(CompileError::InvalidVersion(s.to_string()));
    }

    let groups = s
        .split('.')
        .map(|g| g.parse::<u64>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|_| CompileError::InvalidVersion(s.to_string()))?;

    let group = |i: usize| groups.get(i).copied().unwrap_or(0);
    let version = Version::new(group(0), group(1), group(2), group(3));
    tracing::debug!("version numbers: [{}]", version);

    if groups.len() > MAX_GROUPS {
        diagnostics.push(DiagnosticItem::new(
            location.clone(),
            DiagnosticCode::VersionGroupsDiscarded,
            format!(
                "version groups after {} discarded ({} extra)",
                version,
                groups.len() - MAX_GROUPS
            ),
        ));
    }

    Ok(version)
}

/// Check `(major, minor)` of `version` against `allow_list`
pub fn is_supported(version: &Version, allow_list: &[(u64, u64)]) -> bool {
    allow_list
        .iter()
        .any(|&(major, minor)| version.major == major && version.minor == minor)
}

/// Render an allow-list as `0.7, 0.8, ...`
pub fn format_allow_list(allow_list: &[(u64, u64)]) -> String {
    allow_list
        .iter()
        .map(|(major, minor)| format!("{}.{}", major, minor))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Result<Version> {
        s.parse()
    }

    #[test]
    fn test_version_parsing() {
        assert_eq!(parse("1.2.3.4").unwrap(), Version::new(1, 2, 3, 4));
        assert_eq!(parse("0.7").unwrap(), Version::new(0, 7, 0, 0));
        assert_eq!(parse("3").unwrap(), Version::new(3, 0, 0, 0));
    }

    #[test]
    fn test_extra_groups_discarded_with_warning() {
        let mut diags = Diagnostics::new();
        let v = parse_version("1.2.3.4.5.6", &Location::root(), &mut diags).unwrap();
        assert_eq!(v, Version::new(1, 2, 3, 4));
        assert_eq!(diags.with_code(DiagnosticCode::VersionGroupsDiscarded).count(), 1);
    }

    #[test]
    fn test_groups_beyond_32_bits() {
        let v = parse("0.7.4294967296").unwrap();
        assert_eq!(v, Version::new(0, 7, 4_294_967_296, 0));
        assert!(v.is_supported());
    }

    #[test]
    fn test_four_groups_no_warning() {
        let mut diags = Diagnostics::new();
        parse_version("1.0.0.9", &Location::root(), &mut diags).unwrap();
        assert!(diags.is_empty());
    }

    #[test]
    fn test_invalid_strings() {
        for s in ["", "v1.0", "1.0-beta", "1,0", " 1.0", "1..2", ".", "0.7.99999999999999999999"] {
            let err = parse(s).unwrap_err();
            assert!(
                matches!(err, CompileError::InvalidVersion(_)),
                "expected InvalidVersion for {:?}",
                s
            );
        }
    }

    #[test]
    fn test_support_ignores_patch_and_build() {
        assert!(parse("0.7.0").unwrap().is_supported());
        assert!(parse("0.7.99").unwrap().is_supported());
        assert!(parse("0.7").unwrap().is_supported());
        assert!(parse("1.0.0.12").unwrap().is_supported());
        assert_eq!(parse("0.7").unwrap(), parse("0.7.0").unwrap());
        assert!(!parse("2.0.0").unwrap().is_supported());
        assert!(!parse("0.6.9").unwrap().is_supported());
    }

    #[test]
    fn test_multi_digit_components_compare_numerically() {
        let allow = [(10, 1)];
        assert!(is_supported(&Version::new(10, 1, 0, 0), &allow));
        assert!(!is_supported(&Version::new(1, 1, 0, 0), &allow));
        assert!(!is_supported(&Version::new(0, 70, 0, 0), SUPPORTED_VERSIONS));
    }

    #[test]
    fn test_format_allow_list() {
        assert_eq!(format_allow_list(SUPPORTED_VERSIONS), "0.7, 0.8, 0.9, 1.0");
    }
}
