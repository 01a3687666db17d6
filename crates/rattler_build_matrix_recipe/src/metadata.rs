//! The parts of an evaluated recipe the build matrix cares about

use rattler_build_matrix_types::Requirement;
use serde::{Deserialize, Serialize};
use serde_yaml::Value as YamlValue;

use crate::error::RecipeEvaluationError;

/// Recipe metadata after templates and selectors have been applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolvedMetadata {
    /// `package/name`
    pub name: String,
    /// `package/version`, empty when the recipe does not declare one
    pub version: String,
    /// `build/skip`
    pub skip: bool,
    /// `build/number`, if declared
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_number: Option<u64>,
    /// `build/string`, if declared
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_string: Option<String>,
    pub build_requirements: Vec<Requirement>,
    pub host_requirements: Vec<Requirement>,
    pub run_requirements: Vec<Requirement>,
}

#[derive(Debug, Default, Deserialize)]
struct RawRecipe {
    package: Option<RawPackage>,
    build: Option<RawBuild>,
    requirements: Option<RawRequirements>,
}

#[derive(Debug, Default, Deserialize)]
struct RawPackage {
    name: Option<YamlValue>,
    version: Option<YamlValue>,
}

#[derive(Debug, Default, Deserialize)]
struct RawBuild {
    skip: Option<YamlValue>,
    number: Option<YamlValue>,
    string: Option<YamlValue>,
}

#[derive(Debug, Default, Deserialize)]
struct RawRequirements {
    build: Option<Vec<YamlValue>>,
    host: Option<Vec<YamlValue>>,
    run: Option<Vec<YamlValue>>,
}

/// Scalars as text. Recipes routinely write `version: 3` or `number: 0`.
fn scalar_to_string(value: &YamlValue) -> Option<String> {
    match value {
        YamlValue::String(s) => Some(s.clone()),
        YamlValue::Number(n) => Some(n.to_string()),
        YamlValue::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn parse_bool(field: &'static str, value: &YamlValue) -> Result<bool, RecipeEvaluationError> {
    match value {
        YamlValue::Null => Ok(false),
        YamlValue::Bool(b) => Ok(*b),
        YamlValue::Number(n) => Ok(n.as_u64() != Some(0)),
        YamlValue::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Ok(true),
            "false" | "no" | "off" | "0" | "" => Ok(false),
            _ => Err(RecipeEvaluationError::InvalidField {
                field,
                message: format!("expected a boolean, got '{s}'"),
            }),
        },
        other => Err(RecipeEvaluationError::InvalidField {
            field,
            message: format!("expected a boolean, got {other:?}"),
        }),
    }
}

fn parse_number(field: &'static str, value: &YamlValue) -> Result<u64, RecipeEvaluationError> {
    scalar_to_string(value)
        .and_then(|s| s.trim().parse().ok())
        .ok_or_else(|| RecipeEvaluationError::InvalidField {
            field,
            message: format!("expected a non-negative integer, got {value:?}"),
        })
}

fn parse_requirements(
    section: &'static str,
    entries: Option<Vec<YamlValue>>,
) -> Result<Vec<Requirement>, RecipeEvaluationError> {
    entries
        .unwrap_or_default()
        .iter()
        .filter_map(scalar_to_string)
        .filter(|s| !s.trim().is_empty())
        .map(|s| {
            s.parse()
                .map_err(|source| RecipeEvaluationError::InvalidRequirement { section, source })
        })
        .collect()
}

impl ResolvedMetadata {
    /// Parse the metadata from recipe text that no longer contains selectors
    /// or template expressions. Unknown keys are ignored.
    pub fn from_yaml_str(text: &str) -> Result<Self, RecipeEvaluationError> {
        let value: YamlValue = serde_yaml::from_str(text).map_err(RecipeEvaluationError::Yaml)?;
        let raw: RawRecipe = if value.is_null() {
            RawRecipe::default()
        } else {
            serde_yaml::from_value(value).map_err(RecipeEvaluationError::Yaml)?
        };

        let package = raw.package.unwrap_or_default();
        let build = raw.build.unwrap_or_default();
        let requirements = raw.requirements.unwrap_or_default();

        let name = package
            .name
            .as_ref()
            .and_then(scalar_to_string)
            .filter(|name| !name.is_empty())
            .ok_or(RecipeEvaluationError::MissingField("package/name"))?;

        Ok(Self {
            name,
            version: package
                .version
                .as_ref()
                .and_then(scalar_to_string)
                .unwrap_or_default(),
            skip: build
                .skip
                .as_ref()
                .map(|v| parse_bool("build/skip", v))
                .transpose()?
                .unwrap_or(false),
            build_number: build
                .number
                .as_ref()
                .filter(|v| !v.is_null())
                .map(|v| parse_number("build/number", v))
                .transpose()?,
            build_string: build
                .string
                .as_ref()
                .and_then(scalar_to_string)
                .filter(|s| !s.is_empty()),
            build_requirements: parse_requirements("requirements/build", requirements.build)?,
            host_requirements: parse_requirements("requirements/host", requirements.host)?,
            run_requirements: parse_requirements("requirements/run", requirements.run)?,
        })
    }

    /// All requirements across the build, host and run sections.
    pub fn requirements(&self) -> impl Iterator<Item = &Requirement> {
        self.build_requirements
            .iter()
            .chain(&self.host_requirements)
            .chain(&self.run_requirements)
    }
}
