//! Error types for build matrix enumeration

use rattler_build_matrix_types::ParseRequirementError;
use thiserror::Error;

#[cfg(feature = "miette")]
use miette::Diagnostic;

/// Errors that can occur while enumerating variable sets
#[derive(Debug, Error)]
#[cfg_attr(feature = "miette", derive(Diagnostic))]
pub enum EnumerateError {
    /// The recipe requires a package that the index cannot provide
    #[error("No version of '{package}' in the index satisfies '{constraints}'")]
    #[cfg_attr(
        feature = "miette",
        diagnostic(help("check the requirements of the recipe or add an index that provides '{package}'"))
    )]
    Unsatisfiable {
        package: String,
        constraints: String,
    },

    /// A dependency of an index entry could not be parsed
    #[error("Invalid dependency '{spec}' of {package} {version} in the index")]
    InvalidDependency {
        package: String,
        version: String,
        spec: String,
        #[source]
        source: ParseRequirementError,
    },
}
