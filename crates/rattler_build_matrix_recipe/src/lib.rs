//! # rattler_build_matrix_recipe
//!
//! Evaluates `meta.yaml` recipes for one point of the build matrix. The recipe
//! text is rendered with [`minijinja`], lines guarded by a `# [selector]`
//! comment are kept or dropped, and the result is read into
//! [`ResolvedMetadata`].
//!
//! ```rust
//! use rattler_build_matrix_recipe::{Recipe, RecipeEvaluator};
//! use rattler_build_matrix_types::VariableSet;
//!
//! let recipe = Recipe::from_source(
//!     "package:\n  name: demo\n  version: 2  # [not py3k]\n  version: 3  # [py3k]\n",
//! );
//! let variables = VariableSet::from_pairs([("python", "3.5.0")]).unwrap();
//! assert_eq!(recipe.evaluate(&variables).unwrap().version, "3");
//! ```

pub mod build_config;
pub mod error;
pub mod metadata;
pub mod recipe;
pub mod selectors;

pub use build_config::{MatrixBuildConfig, setup_vn_mtx_case};
pub use error::RecipeEvaluationError;
pub use metadata::ResolvedMetadata;
pub use recipe::Recipe;
pub use selectors::SelectorConfig;

use rattler_build_matrix_types::VariableSet;

/// Produces the metadata of a recipe under a variable set. Evaluating with
/// the empty set yields the metadata used to discover which variables the
/// recipe references.
pub trait RecipeEvaluator {
    fn evaluate(&self, variables: &VariableSet) -> Result<ResolvedMetadata, RecipeEvaluationError>;
}

impl<F> RecipeEvaluator for F
where
    F: Fn(&VariableSet) -> Result<ResolvedMetadata, RecipeEvaluationError>,
{
    fn evaluate(&self, variables: &VariableSet) -> Result<ResolvedMetadata, RecipeEvaluationError> {
        self(variables)
    }
}
