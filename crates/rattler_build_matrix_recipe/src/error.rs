//! Errors raised while evaluating a recipe

use std::path::PathBuf;

use rattler_build_matrix_types::{MalformedVersion, ParseRequirementError};
use thiserror::Error;

#[cfg(feature = "miette")]
use miette::Diagnostic;

/// Errors that can occur while evaluating a recipe under a variable set
#[derive(Debug, Error)]
#[cfg_attr(feature = "miette", derive(Diagnostic))]
pub enum RecipeEvaluationError {
    #[error("Could not open recipe file ({0}): {1}")]
    IoError(PathBuf, #[source] std::io::Error),

    #[error("Could not derive build configuration from the variable set")]
    Variables(#[from] MalformedVersion),

    #[error("Failed to render recipe template: {0}")]
    Template(#[source] minijinja::Error),

    #[error("Failed to evaluate selector '[{selector}]' on line {line}: {source}")]
    #[cfg_attr(
        feature = "miette",
        diagnostic(help("selectors are jinja expressions such as `py3k`, `not win` or `py >= 35`"))
    )]
    Selector {
        selector: String,
        line: usize,
        #[source]
        source: minijinja::Error,
    },

    #[error("Failed to parse recipe metadata: {0}")]
    Yaml(#[source] serde_yaml::Error),

    #[error("Missing required field '{0}' in recipe")]
    MissingField(&'static str),

    #[error("Invalid value for '{field}': {message}")]
    InvalidField {
        field: &'static str,
        message: String,
    },

    #[error("Invalid requirement in '{section}'")]
    InvalidRequirement {
        section: &'static str,
        #[source]
        source: ParseRequirementError,
    },
}
