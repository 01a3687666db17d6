//! Top-level error type of the resolver

use miette::Diagnostic;
use rattler_build_matrix_index::IndexError;
use rattler_build_matrix_recipe::RecipeEvaluationError;
use rattler_build_matrix_types::{MalformedVersion, ParseRequirementError};
use rattler_build_matrix_variants::EnumerateError;
use thiserror::Error;

/// Errors that can occur while resolving a recipe into distributions
#[derive(Debug, Error, Diagnostic)]
pub enum ResolveError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    RecipeEvaluation(RecipeEvaluationError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Resolution(#[from] EnumerateError),

    #[error("Invalid version in the build matrix")]
    #[diagnostic(help("matrix versions of python and numpy must start with a number"))]
    MalformedVersion(#[from] MalformedVersion),

    #[error("Failed to load the package index")]
    Index(#[from] IndexError),

    #[error("Invalid matrix condition '{condition}'")]
    #[diagnostic(help("conditions are package specs such as `python >=3` or `numpy 1.8.*|1.9.*`"))]
    InvalidCondition {
        condition: String,
        #[source]
        source: ParseRequirementError,
    },
}

impl From<RecipeEvaluationError> for ResolveError {
    fn from(err: RecipeEvaluationError) -> Self {
        match err {
            RecipeEvaluationError::Variables(version) => ResolveError::MalformedVersion(version),
            other => ResolveError::RecipeEvaluation(other),
        }
    }
}
