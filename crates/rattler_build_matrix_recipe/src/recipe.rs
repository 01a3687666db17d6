//! Loading and evaluating `meta.yaml` recipes

use std::path::{Path, PathBuf};

use rattler_build_matrix_types::VariableSet;
use rattler_conda_types::Platform;

use crate::{
    RecipeEvaluator,
    build_config::setup_vn_mtx_case,
    error::RecipeEvaluationError,
    metadata::ResolvedMetadata,
    selectors::{SelectorConfig, apply_selectors, normalize_selectors, selector_environment},
};

/// A conda recipe in its unevaluated form.
#[derive(Debug, Clone)]
pub struct Recipe {
    source: String,
    path: Option<PathBuf>,
    target_platform: Platform,
}

impl Recipe {
    /// Create a recipe from its text. The target platform defaults to the
    /// current platform.
    pub fn from_source(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            path: None,
            target_platform: Platform::current(),
        }
    }

    /// Load a recipe from a file, or from `meta.yaml` inside a directory.
    pub fn from_path(path: &Path) -> Result<Self, RecipeEvaluationError> {
        let path = if path.is_dir() {
            path.join("meta.yaml")
        } else {
            path.to_path_buf()
        };
        let source = fs_err::read_to_string(&path)
            .map_err(|e| RecipeEvaluationError::IoError(path.clone(), e))?;
        Ok(Self {
            source,
            path: Some(path),
            target_platform: Platform::current(),
        })
    }

    /// Evaluate selectors for `target_platform` instead of the current platform.
    pub fn with_target_platform(mut self, target_platform: Platform) -> Self {
        self.target_platform = target_platform;
        self
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn target_platform(&self) -> Platform {
        self.target_platform
    }
}

impl RecipeEvaluator for Recipe {
    fn evaluate(&self, variables: &VariableSet) -> Result<ResolvedMetadata, RecipeEvaluationError> {
        let build_config = setup_vn_mtx_case(variables)?;
        let context = SelectorConfig {
            target_platform: self.target_platform,
            variables: variables.clone(),
            build_config,
        }
        .into_context();

        let env = selector_environment();
        let source = normalize_selectors(&self.source);
        let rendered = env
            .render_str(&source, &context)
            .map_err(RecipeEvaluationError::Template)?;
        let selected = apply_selectors(&rendered, &env, &context)?;

        tracing::debug!(
            "evaluated {} with [{}]",
            self.path
                .as_deref()
                .map_or_else(|| "recipe".to_string(), |p| p.display().to_string()),
            variables
        );

        ResolvedMetadata::from_yaml_str(&selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn recipe(source: &str) -> Recipe {
        Recipe::from_source(source).with_target_platform(Platform::Linux64)
    }

    fn python(version: &str) -> VariableSet {
        VariableSet::from_pairs([("python", version)]).unwrap()
    }

    #[rstest]
    #[case("2.7.2", "2")]
    #[case("3.5.0", "3")]
    #[case("27", "2")]
    #[case("35", "3")]
    fn test_version_selector(#[case] py: &str, #[case] expected: &str) {
        let recipe = recipe(
            "package:\n  name: test_recipe\n  version: 2   # [not py3k]\n  version: 3   # [py3k]\n",
        );
        let metadata = recipe.evaluate(&python(py)).unwrap();
        assert_eq!(metadata.version, expected);
    }

    #[rstest]
    #[case("3.5.0", true)]
    #[case("3.4.1", false)]
    #[case("2.7.2", false)]
    #[case("35", true)]
    #[case("34", false)]
    fn test_skip_selector(#[case] py: &str, #[case] expected: bool) {
        let recipe = recipe(
            "package:\n  name: test_recipe\nbuild:  # [py35]\n  skip: True  # [py3k]\n",
        );
        let metadata = recipe.evaluate(&python(py)).unwrap();
        assert_eq!(metadata.skip, expected);
    }

    #[test]
    fn test_template_variables() {
        let recipe = recipe(
            r#"{% set version = "1.0" %}
package:
  name: templated
  version: {{ version }}
build:
  string: py{{ py }}_{{ PY_VER }}
requirements:
  build:
    - python {{ PY_VER }}*
"#,
        );
        let metadata = recipe.evaluate(&python("2.7.2")).unwrap();
        assert_eq!(metadata.version, "1.0");
        assert_eq!(metadata.build_string.as_deref(), Some("py27_2.7"));
        assert_eq!(metadata.build_requirements[0].to_string(), "python 2.7.*");
    }

    #[test]
    fn test_platform_selectors() {
        let source = "package:\n  name: platform\n  version: 1  # [linux]\n  version: 2  # [win]\n";
        let linux = recipe(source).evaluate(&VariableSet::new()).unwrap();
        assert_eq!(linux.version, "1");

        let win = Recipe::from_source(source)
            .with_target_platform(Platform::Win64)
            .evaluate(&VariableSet::new())
            .unwrap();
        assert_eq!(win.version, "2");
    }

    #[test]
    fn test_unpinned_selectors_take_else_branch() {
        let recipe = recipe(
            "package:
  name: test_recipe
requirements:
  build:
    - python
    - numpy x.x  # [py3k]
    - perl  # [not py3k]
",
        );
        let metadata = recipe.evaluate(&VariableSet::new()).unwrap();
        assert_eq!(
            metadata
                .requirements()
                .map(|r| r.name.as_str())
                .collect::<Vec<_>>(),
            vec!["python", "perl"]
        );
    }

    #[test]
    fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        fs_err::write(
            dir.path().join("meta.yaml"),
            "package:\n  name: on_disk\n  version: 0.1\n",
        )
        .unwrap();

        let from_dir = Recipe::from_path(dir.path()).unwrap();
        assert_eq!(from_dir.path(), Some(dir.path().join("meta.yaml").as_path()));
        let metadata = from_dir.evaluate(&VariableSet::new()).unwrap();
        assert_eq!(metadata.name, "on_disk");
        assert_eq!(metadata.version, "0.1");

        let missing = Recipe::from_path(&dir.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(missing, RecipeEvaluationError::IoError(..)));
    }

    #[test]
    fn test_template_error() {
        let err = recipe("package:\n  name: {{ broken\n")
            .evaluate(&VariableSet::new())
            .unwrap_err();
        assert!(matches!(err, RecipeEvaluationError::Template(_)));
    }
}
