//! A recipe bound to one point of the build matrix

use std::{cell::OnceCell, fmt};

use rattler_build_matrix_recipe::{
    MatrixBuildConfig, Recipe, RecipeEvaluationError, RecipeEvaluator, ResolvedMetadata,
    setup_vn_mtx_case,
};
use rattler_build_matrix_types::{MalformedVersion, VariableSet};

use crate::error::ResolveError;

/// A recipe together with the variable set it is built with.
///
/// The recipe is evaluated at most once, on the first query that needs its
/// metadata. Evaluation errors are not cached, a failed query evaluates again.
pub struct ResolvedDistribution<'r, E: RecipeEvaluator + ?Sized = Recipe> {
    recipe: &'r E,
    variables: VariableSet,
    metadata: OnceCell<ResolvedMetadata>,
}

impl<'r, E: RecipeEvaluator + ?Sized> ResolvedDistribution<'r, E> {
    pub fn new(recipe: &'r E, variables: VariableSet) -> Self {
        Self {
            recipe,
            variables,
            metadata: OnceCell::new(),
        }
    }

    /// The recipe this distribution was resolved from.
    pub fn recipe(&self) -> &'r E {
        self.recipe
    }

    pub fn variables(&self) -> &VariableSet {
        &self.variables
    }

    /// The recipe metadata under this distribution's variables.
    pub fn metadata(&self) -> Result<&ResolvedMetadata, RecipeEvaluationError> {
        if let Some(metadata) = self.metadata.get() {
            return Ok(metadata);
        }
        let metadata = self.recipe.evaluate(&self.variables)?;
        Ok(self.metadata.get_or_init(|| metadata))
    }

    pub fn name(&self) -> Result<&str, RecipeEvaluationError> {
        Ok(&self.metadata()?.name)
    }

    /// The package version, empty if the recipe does not declare one.
    pub fn version(&self) -> Result<&str, RecipeEvaluationError> {
        Ok(&self.metadata()?.version)
    }

    /// Whether the recipe declares itself unbuildable under these variables.
    pub fn skip(&self) -> Result<bool, RecipeEvaluationError> {
        Ok(self.metadata()?.skip)
    }

    /// The declared build number, `0` if the recipe does not declare one.
    pub fn build_number(&self) -> Result<u64, RecipeEvaluationError> {
        Ok(self.metadata()?.build_number.unwrap_or(0))
    }

    /// The `CONDA_*` configuration a build of this distribution runs with.
    pub fn build_config(&self) -> Result<MatrixBuildConfig, MalformedVersion> {
        setup_vn_mtx_case(&self.variables)
    }

    /// The build identifier, e.g. `np18py27_0`.
    ///
    /// A `build/string` declared by the recipe is used verbatim. Otherwise the
    /// identifier is the variable tokens in canonical order followed by `_`
    /// and the build number, or only the build number without any variables.
    pub fn build_id(&self) -> Result<String, ResolveError> {
        let metadata = self.metadata()?;
        if let Some(build_string) = &metadata.build_string {
            return Ok(build_string.clone());
        }

        let number = metadata.build_number.unwrap_or(0);
        let tokens = self.variables.tokens()?;
        if tokens.is_empty() {
            Ok(number.to_string())
        } else {
            Ok(format!("{}_{number}", tokens.concat()))
        }
    }

    /// `name-version-build_id`, the conventional file stem of a package.
    pub fn dist_name(&self) -> Result<String, ResolveError> {
        let metadata = self.metadata()?;
        Ok(format!(
            "{}-{}-{}",
            metadata.name,
            metadata.version,
            self.build_id()?
        ))
    }
}

impl<E: RecipeEvaluator + ?Sized> fmt::Debug for ResolvedDistribution<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedDistribution")
            .field("variables", &self.variables)
            .field("metadata", &self.metadata.get())
            .finish()
    }
}
