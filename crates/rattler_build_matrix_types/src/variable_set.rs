//! The variables that span the build matrix and a single point in it.

use std::{borrow::Cow, collections::BTreeMap};

use rattler_conda_types::Version;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator as _};
use thiserror::Error;

use crate::{
    codec::{self, TokenPolicy},
    version::{MalformedVersion, parse_version},
};

/// A package whose version is a dimension of the build matrix.
///
/// The declaration order is the canonical order in build identifiers
/// (`np18py27_0`) and the nesting order of the enumeration (numpy varies
/// slowest).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MatrixVariable {
    Numpy,
    Python,
    Perl,
    R,
}

impl MatrixVariable {
    /// All variables in canonical order.
    pub fn all() -> impl Iterator<Item = MatrixVariable> {
        MatrixVariable::iter()
    }

    /// Look up the variable for a package name.
    pub fn from_package_name(name: &str) -> Option<Self> {
        name.parse().ok()
    }

    /// The package this variable pins.
    pub fn package_name(&self) -> &'static str {
        match self {
            MatrixVariable::Numpy => "numpy",
            MatrixVariable::Python => "python",
            MatrixVariable::Perl => "perl",
            MatrixVariable::R => "r",
        }
    }

    /// The prefix of this variable's token in a build identifier.
    pub fn id_prefix(&self) -> &'static str {
        match self {
            MatrixVariable::Numpy => "np",
            MatrixVariable::Python => "py",
            MatrixVariable::Perl => "perl",
            MatrixVariable::R => "r",
        }
    }

    /// How versions of this variable are compressed into tokens.
    pub fn token_policy(&self) -> TokenPolicy {
        match self {
            MatrixVariable::Numpy | MatrixVariable::Python => TokenPolicy::Numeric {
                segments: 2,
                width: 3,
            },
            MatrixVariable::Perl | MatrixVariable::R => TokenPolicy::Verbatim,
        }
    }

    /// Expand a compressed token into the version it stands for: python `35`
    /// is `3.5`, numpy `110` is `1.10`. A dot-less number of two or more digits
    /// is read as a token; every other value is returned unchanged.
    pub fn expand_token<'a>(&self, value: &'a str) -> Cow<'a, str> {
        let value = value.trim();
        match self.token_policy() {
            TokenPolicy::Numeric { .. }
                if value.len() >= 2 && value.bytes().all(|b| b.is_ascii_digit()) =>
            {
                let (major, minor) = value.split_at(1);
                Cow::Owned(format!("{major}.{minor}"))
            }
            _ => Cow::Borrowed(value),
        }
    }

    /// Parse a value of this variable, expanding compressed tokens.
    pub fn parse_version(&self, value: &str) -> Result<Version, MalformedVersion> {
        parse_version(&self.expand_token(value))
    }

    /// Encode a version of this variable into its identifier token.
    pub fn encode(&self, version: &str) -> Result<String, MalformedVersion> {
        codec::encode(&self.expand_token(version), self.token_policy())
    }
}

/// Errors when building a [`VariableSet`] from loosely typed input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VariableSetError {
    /// The name is not one of the matrix variables.
    #[error("'{0}' is not a build matrix variable (expected one of numpy, python, perl, r)")]
    UnknownVariable(String),

    /// The same variable was given twice.
    #[error("build matrix variable '{0}' is given more than once")]
    DuplicateVariable(MatrixVariable),
}

/// One point of the build matrix: a version for a subset of the
/// [`MatrixVariable`]s. Iterates in canonical order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariableSet(BTreeMap<MatrixVariable, String>);

impl VariableSet {
    /// The empty variable set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of this set with `variable` pinned to `version`.
    pub fn with(mut self, variable: MatrixVariable, version: impl Into<String>) -> Self {
        self.0.insert(variable, version.into());
        self
    }

    /// Build a set from `(name, version)` pairs such as
    /// `[("python", "2.7"), ("numpy", "1.23")]`.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, VariableSetError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut map = BTreeMap::new();
        for (name, version) in pairs {
            let name = name.as_ref();
            let variable = MatrixVariable::from_package_name(name)
                .ok_or_else(|| VariableSetError::UnknownVariable(name.to_string()))?;
            if map.insert(variable, version.into()).is_some() {
                return Err(VariableSetError::DuplicateVariable(variable));
            }
        }
        Ok(Self(map))
    }

    /// The version pinned for `variable`.
    pub fn get(&self, variable: MatrixVariable) -> Option<&str> {
        self.0.get(&variable).map(String::as_str)
    }

    /// Whether `variable` is pinned.
    pub fn contains(&self, variable: MatrixVariable) -> bool {
        self.0.contains_key(&variable)
    }

    /// Iterate over the pinned variables in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (MatrixVariable, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// The number of pinned variables.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no variable is pinned.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The identifier tokens (`np18`, `py27`, ...) in canonical order.
    pub fn tokens(&self) -> Result<Vec<String>, MalformedVersion> {
        self.iter()
            .map(|(variable, version)| {
                Ok(format!("{}{}", variable.id_prefix(), variable.encode(version)?))
            })
            .collect()
    }
}

impl FromIterator<(MatrixVariable, String)> for VariableSet {
    fn from_iter<T: IntoIterator<Item = (MatrixVariable, String)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl std::fmt::Display for VariableSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (variable, version) in self.iter() {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{variable}={version}")?;
            first = false;
        }
        Ok(())
    }
}
