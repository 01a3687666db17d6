//! Expansion of a recipe into the distributions a package index implies

use std::{collections::HashSet, num::NonZeroUsize};

use rattler_build_matrix_index::PackageIndex;
use rattler_build_matrix_recipe::RecipeEvaluator;
use rattler_build_matrix_types::{Requirement, VariableSet};
use rattler_build_matrix_variants::{EnumerateOptions, enumerate_variable_sets};

use crate::{error::ResolveError, resolved_distribution::ResolvedDistribution};

/// Options for [`resolve_all`].
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    /// Conditions on matrix variables on top of the recipe's own
    /// requirements, e.g. `python 2.6.*|>=3`.
    pub extra_conditions: Vec<Requirement>,
    pub max_n_major_versions: Option<NonZeroUsize>,
    pub max_n_minor_versions: Option<NonZeroUsize>,
}

impl ResolveOptions {
    /// Parse `conditions` and use them as extra conditions.
    pub fn with_conditions<S: AsRef<str>>(
        mut self,
        conditions: impl IntoIterator<Item = S>,
    ) -> Result<Self, ResolveError> {
        for condition in conditions {
            let condition = condition.as_ref();
            let requirement = condition
                .parse()
                .map_err(|source| ResolveError::InvalidCondition {
                    condition: condition.to_string(),
                    source,
                })?;
            self.extra_conditions.push(requirement);
        }
        Ok(self)
    }

    fn enumerate_options(&self) -> EnumerateOptions {
        EnumerateOptions {
            extra_conditions: self.extra_conditions.clone(),
            max_n_major_versions: self.max_n_major_versions,
            max_n_minor_versions: self.max_n_minor_versions,
        }
    }
}

/// Expand `recipe` into every distribution `index` can build.
///
/// The recipe is first evaluated without any variables to find its
/// requirements. Every consistent variable set is then turned into a
/// [`ResolvedDistribution`]; distributions the recipe skips are dropped, as
/// are distributions whose build identifier was already produced. The result
/// keeps enumeration order. Any error aborts the whole expansion.
pub fn resolve_all<'r, E, I>(
    recipe: &'r E,
    index: &I,
    options: &ResolveOptions,
) -> Result<Vec<ResolvedDistribution<'r, E>>, ResolveError>
where
    E: RecipeEvaluator + ?Sized,
    I: PackageIndex,
{
    let discovery = recipe.evaluate(&VariableSet::new())?;
    let requirements: Vec<Requirement> = discovery.requirements().cloned().collect();

    let variable_sets =
        enumerate_variable_sets(&requirements, index, &options.enumerate_options())?;
    tracing::debug!(
        "{} candidate variable sets for {}",
        variable_sets.len(),
        discovery.name
    );

    let mut seen = HashSet::new();
    let mut distributions = Vec::new();
    for variables in variable_sets {
        let distribution = ResolvedDistribution::new(recipe, variables);
        if distribution.skip()? {
            tracing::debug!("Skipping {} [{}]", discovery.name, distribution.variables());
            continue;
        }

        let build_id = distribution.build_id()?;
        if !seen.insert(build_id.clone()) {
            tracing::debug!(
                "Dropping [{}], build {} was already resolved",
                distribution.variables(),
                build_id
            );
            continue;
        }
        distributions.push(distribution);
    }

    tracing::info!(
        "Resolved {} distribution(s) of {}",
        distributions.len(),
        discovery.name
    );
    Ok(distributions)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rattler_build_matrix_index::InMemoryIndex;
    use rattler_build_matrix_recipe::{Recipe, RecipeEvaluationError, ResolvedMetadata};
    use rattler_build_matrix_types::{MalformedVersionKind, MatrixVariable};
    use rattler_build_matrix_variants::EnumerateError;
    use rattler_conda_types::Platform;
    use rstest::rstest;
    use tracing_test::traced_test;

    use super::*;

    fn index() -> InMemoryIndex {
        let mut index = InMemoryIndex::new();
        index
            .add_package("python", "2.7.2", Vec::<String>::new())
            .add_package("python", "2.6.2", Vec::<String>::new())
            .add_package("python", "3.5.0", Vec::<String>::new())
            .add_package("numpy", "1.8.0", ["python"]);
        index
    }

    fn recipe(source: &str) -> Recipe {
        Recipe::from_source(source).with_target_platform(Platform::Linux64)
    }

    fn build_ids<E: RecipeEvaluator + ?Sized>(
        distributions: &[ResolvedDistribution<'_, E>],
    ) -> Vec<String> {
        distributions
            .iter()
            .map(|d| d.build_id().unwrap())
            .collect()
    }

    const PYTHON_RECIPE: &str = "package:
  name: test_script_py
  version: 1.0
requirements:
  build:
    - python
  run:
    - python
";

    #[test]
    fn test_python_numpy_matrix() {
        let recipe = recipe(
            "package:
  name: test_numpy
  version: 1.0
requirements:
  build:
    - python >=2.7
    - python x.x
    - numpy x.x
  run:
    - python
    - numpy x.x
",
        );
        let distributions = resolve_all(&recipe, &index(), &ResolveOptions::default()).unwrap();
        assert_eq!(build_ids(&distributions), vec!["np18py27_0", "np18py35_0"]);
    }

    #[test]
    fn test_skipped_distributions_are_dropped() {
        let recipe = recipe(
            "package:
  name: test_skip
  version: 1.0
build:
  skip: True  # [py3k]
requirements:
  build:
    - python
",
        );
        let distributions = resolve_all(&recipe, &index(), &ResolveOptions::default()).unwrap();
        assert_eq!(build_ids(&distributions), vec!["py26_0", "py27_0"]);
    }

    #[rstest]
    #[case(&["python 2.6.*|>=3"], vec!["py26_0", "py35_0"])]
    #[case(&["python >=3"], vec!["py35_0"])]
    #[case(&["python 2.7.*"], vec!["py27_0"])]
    #[case(&["python <2"], vec![])]
    #[case(&["perl 5.*"], vec!["py26_0", "py27_0", "py35_0"])]
    fn test_extra_conditions(#[case] conditions: &[&str], #[case] expected: Vec<&str>) {
        let recipe = recipe(PYTHON_RECIPE);
        let options = ResolveOptions::default()
            .with_conditions(conditions.iter().copied())
            .unwrap();
        let distributions = resolve_all(&recipe, &index(), &options).unwrap();
        assert_eq!(build_ids(&distributions), expected);
    }

    #[test]
    fn test_invalid_condition() {
        let err = ResolveOptions::default()
            .with_conditions(["python >="])
            .unwrap_err();
        assert!(matches!(
            err,
            ResolveError::InvalidCondition { condition, .. } if condition == "python >="
        ));
    }

    #[test]
    fn test_top_n_versions() {
        let recipe = recipe(PYTHON_RECIPE);
        let options = ResolveOptions {
            max_n_major_versions: NonZeroUsize::new(1),
            ..ResolveOptions::default()
        };
        let distributions = resolve_all(&recipe, &index(), &options).unwrap();
        assert_eq!(build_ids(&distributions), vec!["py35_0"]);

        let options = ResolveOptions {
            max_n_minor_versions: NonZeroUsize::new(1),
            ..ResolveOptions::default()
        };
        let distributions = resolve_all(&recipe, &index(), &options).unwrap();
        assert_eq!(build_ids(&distributions), vec!["py27_0", "py35_0"]);
    }

    #[test]
    fn test_duplicate_build_ids_are_dropped() {
        let recipe = recipe(
            "package:
  name: fixed_string
  version: 1.0
build:
  string: same
requirements:
  build:
    - python
",
        );
        let distributions = resolve_all(&recipe, &index(), &ResolveOptions::default()).unwrap();
        assert_eq!(distributions.len(), 1);
        assert_eq!(
            distributions[0].variables().get(MatrixVariable::Python),
            Some("2.6.2")
        );
    }

    #[test]
    fn test_no_matrix_variables() {
        let recipe =
            recipe("package:\n  name: plain\n  version: 0.1\nrequirements:\n  run:\n    - zlib\n");
        let distributions = resolve_all(&recipe, &index(), &ResolveOptions::default()).unwrap();
        assert_eq!(build_ids(&distributions), vec!["0"]);
        assert_eq!(distributions[0].dist_name().unwrap(), "plain-0.1-0");
    }

    #[test]
    fn test_unsatisfiable_requirement() {
        let recipe =
            recipe("package:\n  name: needs_py4\nrequirements:\n  build:\n    - python >=4\n");
        let err = resolve_all(&recipe, &index(), &ResolveOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            ResolveError::Resolution(EnumerateError::Unsatisfiable { ref package, .. })
                if package == "python"
        ));
    }

    #[test]
    fn test_discovery_failure_aborts() {
        let failing = |_: &VariableSet| -> Result<ResolvedMetadata, RecipeEvaluationError> {
            Err(RecipeEvaluationError::MissingField("package/name"))
        };
        let err = resolve_all(&failing, &index(), &ResolveOptions::default()).unwrap_err();
        assert!(matches!(err, ResolveError::RecipeEvaluation(_)));
    }

    #[test]
    fn test_non_numeric_index_version_aborts() {
        let mut index = InMemoryIndex::new();
        index.add_package("python", "dev", Vec::<String>::new());

        let recipe = recipe(PYTHON_RECIPE);
        let err = resolve_all(&recipe, &index, &ResolveOptions::default()).unwrap_err();
        match err {
            ResolveError::MalformedVersion(version) => {
                assert_eq!(version.version, "dev");
                assert_eq!(version.kind, MalformedVersionKind::NoNumericSegment);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_compressed_python_in_index() {
        let mut index = InMemoryIndex::new();
        index
            .add_package("python", "27", Vec::<String>::new())
            .add_package("python", "35", Vec::<String>::new());

        let recipe = recipe(
            "package:\n  name: tokens\n  version: 2   # [not py3k]\n  version: 3   # [py3k]\nrequirements:\n  build:\n    - python\n",
        );
        let distributions = resolve_all(&recipe, &index, &ResolveOptions::default()).unwrap();
        assert_eq!(build_ids(&distributions), vec!["py27_0", "py35_0"]);
        let versions: Vec<_> = distributions.iter().map(|d| d.version().unwrap()).collect();
        assert_eq!(versions, vec!["2", "3"]);
    }

    #[test]
    fn test_deterministic() {
        let recipe = recipe(PYTHON_RECIPE);
        let index = index();
        let first = build_ids(&resolve_all(&recipe, &index, &ResolveOptions::default()).unwrap());
        let second = build_ids(&resolve_all(&recipe, &index, &ResolveOptions::default()).unwrap());
        assert_eq!(first, second);
    }

    #[test]
    #[traced_test]
    fn test_logs_skipped_distributions() {
        let recipe = recipe(
            "package:\n  name: noisy\nbuild:\n  skip: true  # [py2k]\nrequirements:\n  build:\n    - python\n",
        );
        let distributions = resolve_all(&recipe, &index(), &ResolveOptions::default()).unwrap();
        assert_eq!(build_ids(&distributions), vec!["py35_0"]);
        assert!(logs_contain("Skipping noisy [python=2.6.2]"));
        assert!(logs_contain("Resolved 1 distribution(s) of noisy"));
    }
}
