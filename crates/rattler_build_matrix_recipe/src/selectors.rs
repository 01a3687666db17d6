//! Line selectors (`key: value  # [py3k]`) and the jinja context they are
//! evaluated against.

use std::{collections::BTreeMap, str::FromStr};

use lazy_static::lazy_static;
use minijinja::{Environment, Value, value::ValueKind};
use rattler_build_matrix_types::{MatrixVariable, VariableSet, VersionExt};
use rattler_conda_types::{ParseStrictness, Platform, Version, VersionSpec};
use regex::Regex;

use crate::{build_config::MatrixBuildConfig, error::RecipeEvaluationError};

lazy_static! {
    static ref SELECTOR_LINE: Regex =
        Regex::new(r"^(?P<content>.*?)\s*#\s*\[(?P<selector>[^\[\]]+)\]\s*$")
            .expect("selector regex is valid");
}

/// Everything a selector can refer to.
#[derive(Clone, Debug)]
pub struct SelectorConfig {
    pub target_platform: Platform,
    pub variables: VariableSet,
    pub build_config: MatrixBuildConfig,
}

impl SelectorConfig {
    pub fn into_context(self) -> BTreeMap<String, Value> {
        let mut context = BTreeMap::<String, Value>::new();

        context.insert(
            "target_platform".to_string(),
            Value::from_safe_string(self.target_platform.to_string()),
        );
        context.insert("unix".to_string(), Value::from(self.target_platform.is_unix()));
        context.insert("win".to_string(), Value::from(self.target_platform.is_windows()));
        context.insert("osx".to_string(), Value::from(self.target_platform.is_osx()));
        context.insert("linux".to_string(), Value::from(self.target_platform.is_linux()));

        if let Some(arch) = self.target_platform.arch() {
            context.insert(arch.to_string(), Value::from(true));
        }
        // conda-build style platform flags: linux64, osx64, win32, ...
        let short_platform = self.target_platform.to_string().replace('-', "");
        context.entry(short_platform).or_insert(Value::from(true));

        for (variable, version) in self.variables.iter() {
            // `python: 35` stands for 3.5
            context.insert(
                variable.package_name().to_string(),
                Value::from_safe_string(variable.expand_token(version).into_owned()),
            );
            if let Ok(tokens) = variable.encode(version) {
                context.insert(format!("{}{}", variable.id_prefix(), tokens), Value::from(true));
            }

            let major_minor = variable
                .parse_version(version)
                .ok()
                .and_then(|v| v.leading_major_minor());

            match variable {
                MatrixVariable::Python => {
                    if let Some((major, minor)) = major_minor {
                        context.insert("py3k".to_string(), Value::from(major == 3));
                        context.insert("py2k".to_string(), Value::from(major == 2));
                        context.insert(
                            "PY_VER".to_string(),
                            Value::from_safe_string(format!("{major}.{minor}")),
                        );
                    }
                }
                MatrixVariable::Numpy => {
                    if let Some((major, minor)) = major_minor {
                        context.insert(
                            "NPY_VER".to_string(),
                            Value::from_safe_string(format!("{major}.{minor}")),
                        );
                    }
                }
                MatrixVariable::Perl | MatrixVariable::R => {}
            }
        }

        if let Some(py) = self.build_config.conda_py {
            context.insert("py".to_string(), Value::from(py));
        }
        if let Some(npy) = self.build_config.conda_npy {
            context.insert("np".to_string(), Value::from(npy));
        }

        context
    }
}

/// The environment selectors and recipe templates are evaluated in.
pub fn selector_environment() -> Environment<'static> {
    let mut env = Environment::new();

    env.add_function("cmp", |value: &Value, spec: &str| {
        // an unpinned variable never matches
        if value.kind() == ValueKind::Undefined || value.is_none() {
            return Ok(false);
        }
        let Some(version) = value.as_str() else {
            return Err(minijinja::Error::new(
                minijinja::ErrorKind::InvalidOperation,
                format!("cmp() expects a version string, got {value}"),
            ));
        };
        let version = Version::from_str(version.trim()).map_err(|e| {
            minijinja::Error::new(
                minijinja::ErrorKind::CannotDeserialize,
                format!("Failed to deserialize `version`: {e}"),
            )
        })?;
        let version_spec = VersionSpec::from_str(spec, ParseStrictness::Lenient).map_err(|e| {
            minijinja::Error::new(
                minijinja::ErrorKind::CannotDeserialize,
                format!("Failed to deserialize `spec`: {e}"),
            )
        })?;
        Ok(version_spec.matches(&version))
    });

    env.add_function(
        "environ_get",
        |name: String, default: Option<String>| {
            let value = std::env::var(name).unwrap_or_else(|_| default.unwrap_or_default());
            Ok(Value::from(value))
        },
    );

    env
}

/// Rewrite python idioms that commonly appear in selectors into their jinja
/// equivalents.
pub fn normalize_selectors(input: &str) -> String {
    input
        .replace("os.environ.get", "environ_get")
        .replace(".startswith", " is startingwith")
}

#[derive(Debug, PartialEq, Eq)]
struct ParsedLine<'a> {
    content: &'a str,
    condition: Option<&'a str>,
}

fn parse_line(line: &str) -> ParsedLine<'_> {
    match SELECTOR_LINE.captures(line) {
        Some(captures) => ParsedLine {
            content: captures.name("content").map_or("", |m| m.as_str()),
            condition: captures.name("selector").map(|m| m.as_str().trim()),
        },
        None => ParsedLine {
            content: line,
            condition: None,
        },
    }
}

fn evaluate_condition(
    condition: &str,
    env: &Environment,
    context: &BTreeMap<String, Value>,
) -> Result<bool, minijinja::Error> {
    if condition.is_empty() {
        return Ok(true);
    }
    let expr = env.compile_expression(condition)?;
    Ok(expr.eval(context)?.is_true())
}

/// Drop every line whose selector is false and strip the selector comment
/// from the lines that are kept. Lines without a selector pass unchanged.
pub fn apply_selectors(
    input: &str,
    env: &Environment,
    context: &BTreeMap<String, Value>,
) -> Result<String, RecipeEvaluationError> {
    let mut lines = Vec::new();
    for (number, line) in input.lines().enumerate() {
        let parsed = parse_line(line);
        if let Some(condition) = parsed.condition {
            let keep = evaluate_condition(condition, env, context).map_err(|source| {
                RecipeEvaluationError::Selector {
                    selector: condition.to_string(),
                    line: number + 1,
                    source,
                }
            })?;
            if !keep {
                tracing::trace!("dropping line {}: [{}] is false", number + 1, condition);
                continue;
            }
        }
        lines.push(parsed.content);
    }
    Ok(lines.join("\n"))
}
