//! Conda versions and the few questions the build matrix asks about them.

use std::{fmt, str::FromStr};

use rattler_conda_types::{Component, ParseVersionErrorKind, Version};
use thiserror::Error;

/// The reason a version string was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedVersionKind {
    /// The string is not a valid conda version.
    Invalid(ParseVersionErrorKind),
    /// A numeric encoding was requested but the version has no leading number.
    NoNumericSegment,
}

impl fmt::Display for MalformedVersionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalformedVersionKind::Invalid(kind) => write!(f, "{kind}"),
            MalformedVersionKind::NoNumericSegment => {
                write!(f, "version does not start with a numeric segment")
            }
        }
    }
}

/// A version string could not be used to build an identifier or a context.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed version '{version}': {kind}")]
pub struct MalformedVersion {
    /// The offending input.
    pub version: String,
    /// What is wrong with it.
    pub kind: MalformedVersionKind,
}

impl MalformedVersion {
    /// Create an error for `version`.
    pub fn new(version: impl Into<String>, kind: MalformedVersionKind) -> Self {
        Self {
            version: version.into(),
            kind,
        }
    }
}

/// Parse a conda version, ignoring surrounding whitespace.
pub fn parse_version(version: &str) -> Result<Version, MalformedVersion> {
    Version::from_str(version.trim())
        .map_err(|e| MalformedVersion::new(version, MalformedVersionKind::Invalid(e.kind)))
}

/// Leading numbers of a version, as used for matrix tokens and pruning.
pub trait VersionExt {
    /// The leading number of every segment, up to the first segment that does
    /// not start with a number. `1.8.0rc1` yields `[1, 8, 0]`, `2.x` yields
    /// `[2]` and `dev` yields nothing.
    fn numeric_prefix(&self) -> Vec<u64>;

    /// The first number of the version.
    fn leading_major(&self) -> Option<u64> {
        self.numeric_prefix().first().copied()
    }

    /// The `(major, minor)` pair, a missing minor counts as `0`.
    fn leading_major_minor(&self) -> Option<(u64, u64)> {
        let prefix = self.numeric_prefix();
        let major = *prefix.first()?;
        Some((major, prefix.get(1).copied().unwrap_or(0)))
    }
}

impl VersionExt for Version {
    fn numeric_prefix(&self) -> Vec<u64> {
        self.segments()
            .map_while(|segment| {
                // `2.x` is stored as `2.0x`, the zero is not part of the input
                if segment.has_implicit_default() {
                    return None;
                }
                segment.components().next().and_then(Component::as_number)
            })
            .collect()
    }
}
