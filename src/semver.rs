//! Version parsing and bump classification
//!
//! Classifies the difference between two dotted-triple versions as the
//! semver magnitude of the bump. This is the leaf of the policy engine:
//! [`crate::policy::DependencyPolicy`] uses it to decide whether a proposed
//! bump is within a dependency's permitted magnitudes.

use crate::error::{Error, Result};
use regex::Regex;
use std::sync::LazyLock;

static VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\d+\.\d+$").expect("version regex is valid"));

/// A parsed `MAJOR.MINOR.PATCH` version
///
/// Immutable once parsed. Only plain dotted triples are accepted; prerelease
/// tags, build metadata, and `v` prefixes are format errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Version {
    /// Major component
    pub major: u64,
    /// Minor component
    pub minor: u64,
    /// Patch component
    pub patch: u64,
}

impl std::str::FromStr for Version {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if !VERSION_RE.is_match(s) {
            return Err(Error::VersionFormat(s.to_string()));
        }
        // The regex guarantees three numeric components; overflow is still
        // possible and reported as a format error.
        let parse =
            |part: &str| part.parse::<u64>().map_err(|_| Error::VersionFormat(s.to_string()));
        let mut parts = s.split('.');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(major), Some(minor), Some(patch)) => Ok(Self {
                major: parse(major)?,
                minor: parse(minor)?,
                patch: parse(patch)?,
            }),
            _ => Err(Error::VersionFormat(s.to_string())),
        }
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Magnitude of a version bump
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BumpMagnitude {
    /// Major component increased
    Major,
    /// Minor component increased (major unchanged or lower)
    Minor,
    /// Patch component increased (major and minor unchanged or lower)
    Patch,
    /// No component increased
    Unchanged,
}

impl BumpMagnitude {
    /// Stable string label, as used in policy config documents
    pub const fn label(self) -> &'static str {
        match self {
            Self::Major => "major",
            Self::Minor => "minor",
            Self::Patch => "patch",
            Self::Unchanged => "unchanged",
        }
    }
}

impl std::fmt::Display for BumpMagnitude {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify the bump from `previous` to `next`.
///
/// Returns the magnitude of the first component that increased, scanning
/// major, then minor, then patch; `Unchanged` if none increased.
///
/// Note this measures forward progress, not semantic ordering: a component
/// that *decreases* is not reported as a downgrade, the scan simply moves on
/// to the next component. `classify("2.0.0", "1.0.1")` is `Patch`. Callers
/// that need true ordering must compare the parsed versions themselves.
pub fn classify(previous: &str, next: &str) -> Result<BumpMagnitude> {
    let prev: Version = previous.parse()?;
    let next: Version = next.parse()?;

    if next.major > prev.major {
        Ok(BumpMagnitude::Major)
    } else if next.minor > prev.minor {
        Ok(BumpMagnitude::Minor)
    } else if next.patch > prev.patch {
        Ok(BumpMagnitude::Patch)
    } else {
        Ok(BumpMagnitude::Unchanged)
    }
}
