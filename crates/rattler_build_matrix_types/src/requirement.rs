//! Dependency specs of the form `name [constraint [build]]`.

use std::{fmt, str::FromStr};

use rattler_conda_types::{MatchSpec, ParseMatchSpecError, ParseStrictness};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::constraint::{FREE_MARKER, VersionConstraint};

/// A requirement on a package, e.g. `python >=2.7` or `numpy x.x`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    /// The normalized package name.
    pub name: String,
    /// The version constraint, [`VersionConstraint::any`] when absent.
    pub constraint: VersionConstraint,
    /// An optional build string matcher. Kept but not interpreted.
    pub build: Option<String>,
}

/// Error returned when a requirement string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseRequirementError {
    /// The requirement is empty.
    #[error("empty requirement")]
    Empty,

    /// The requirement is not a valid conda match spec.
    #[error("invalid requirement '{requirement}'")]
    InvalidSpec {
        requirement: String,
        #[source]
        source: ParseMatchSpecError,
    },
}

/// `numpy x.x [build]`: the marker is not a conda version, so it is split off
/// before the rest goes through the match spec parser.
fn split_free_marker(requirement: &str) -> Option<(&str, Option<&str>)> {
    let mut parts = requirement.split_whitespace();
    let name = parts.next()?;
    if parts.next()? != FREE_MARKER {
        return None;
    }
    let build = parts.next();
    parts.next().is_none().then_some((name, build))
}

fn parse_match_spec(source: &str, requirement: &str) -> Result<MatchSpec, ParseRequirementError> {
    MatchSpec::from_str(source, ParseStrictness::Lenient).map_err(|source| {
        ParseRequirementError::InvalidSpec {
            requirement: requirement.to_string(),
            source,
        }
    })
}

fn package_name(spec: &MatchSpec) -> String {
    spec.name
        .as_exact()
        .map(|name| name.as_normalized().to_string())
        .unwrap_or_else(|| spec.name.to_string())
}

impl FromStr for Requirement {
    type Err = ParseRequirementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParseRequirementError::Empty);
        }

        if let Some((name, build)) = split_free_marker(trimmed) {
            let spec = parse_match_spec(name, trimmed)?;
            return Ok(Self {
                name: package_name(&spec),
                constraint: VersionConstraint::Free,
                build: build.map(str::to_string),
            });
        }

        let spec = parse_match_spec(trimmed, trimmed)?;
        Ok(Self {
            name: package_name(&spec),
            constraint: spec
                .version
                .clone()
                .map_or_else(VersionConstraint::any, VersionConstraint::Spec),
            build: spec.build.as_ref().map(ToString::to_string),
        })
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.constraint.is_any() || self.build.is_some() {
            write!(f, " {}", self.constraint)?;
        }
        if let Some(build) = &self.build {
            write!(f, " {build}")?;
        }
        Ok(())
    }
}

impl Serialize for Requirement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Requirement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
