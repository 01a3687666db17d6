//! # rattler_build_matrix_types
//!
//! Value types shared by the rattler-build-matrix crates:
//!
//! - [`VersionExt`]: the leading numbers of a conda [`Version`]
//! - [`encode`]: compression of versions into build identifier tokens
//! - [`VersionConstraint`] and [`Requirement`]: conda match specs like
//!   `python >=2.7`, plus the legacy `numpy x.x` marker
//! - [`MatrixVariable`] and [`VariableSet`]: the dimensions of the build matrix
//!   and one point in it
//!
//! ```rust
//! use rattler_build_matrix_types::{Requirement, VariableSet, parse_version};
//!
//! let requirement: Requirement = "python 2.6.*|>=3".parse().unwrap();
//! assert!(requirement.constraint.matches(&parse_version("3.5.0").unwrap()));
//!
//! let set = VariableSet::from_pairs([("python", "2.7.2"), ("numpy", "1.8.0")]).unwrap();
//! assert_eq!(set.tokens().unwrap().concat(), "np18py27");
//! ```

pub mod codec;
pub mod constraint;
pub mod requirement;
pub mod variable_set;
pub mod version;

pub use codec::{TokenPolicy, encode};
pub use constraint::{FREE_MARKER, ParseConstraintError, VersionConstraint};
pub use requirement::{ParseRequirementError, Requirement};
pub use variable_set::{MatrixVariable, VariableSet, VariableSetError};
pub use rattler_conda_types::{Version, VersionSpec};
pub use version::{MalformedVersion, MalformedVersionKind, VersionExt, parse_version};
