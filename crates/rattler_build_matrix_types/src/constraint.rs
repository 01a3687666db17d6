//! Version constraints in recipe requirements and index dependencies.
//!
//! Everything except the legacy `x.x` marker is a conda [`VersionSpec`],
//! parsed leniently the way conda reads recipes and repodata.

use std::{fmt, str::FromStr};

use rattler_conda_types::{
    ParseStrictness, Version, VersionSpec, version_spec::ParseVersionSpecError,
};
use thiserror::Error;

/// The marker for "pinned by the build matrix".
pub const FREE_MARKER: &str = "x.x";

/// A parsed version constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionConstraint {
    /// The `x.x` marker: any version, the build matrix decides which.
    Free,
    /// A conda version spec.
    Spec(VersionSpec),
}

/// Error returned when a constraint expression cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid version constraint '{constraint}'")]
pub struct ParseConstraintError {
    pub constraint: String,
    #[source]
    pub source: ParseVersionSpecError,
}

impl FromStr for VersionConstraint {
    type Err = ParseConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" => Ok(VersionConstraint::any()),
            FREE_MARKER => Ok(VersionConstraint::Free),
            constraint => VersionSpec::from_str(constraint, ParseStrictness::Lenient)
                .map(VersionConstraint::Spec)
                .map_err(|source| ParseConstraintError {
                    constraint: constraint.to_string(),
                    source,
                }),
        }
    }
}

impl From<VersionSpec> for VersionConstraint {
    fn from(spec: VersionSpec) -> Self {
        VersionConstraint::Spec(spec)
    }
}

impl VersionConstraint {
    /// The constraint every version satisfies.
    pub fn any() -> Self {
        VersionConstraint::Spec(VersionSpec::Any)
    }

    /// Whether `candidate` satisfies this constraint.
    pub fn matches(&self, candidate: &Version) -> bool {
        match self {
            VersionConstraint::Free => true,
            VersionConstraint::Spec(spec) => spec.matches(candidate),
        }
    }

    /// Whether this is the `x.x` marker.
    pub fn is_free(&self) -> bool {
        matches!(self, VersionConstraint::Free)
    }

    /// Whether this constraint places no restriction at all.
    pub fn is_any(&self) -> bool {
        matches!(self, VersionConstraint::Spec(VersionSpec::Any))
    }
}

impl fmt::Display for VersionConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionConstraint::Free => write!(f, "{FREE_MARKER}"),
            VersionConstraint::Spec(spec) => write!(f, "{spec}"),
        }
    }
}
