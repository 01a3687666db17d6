//! Enumeration of the variable sets implied by a recipe's requirements and a
//! package index.

use std::{collections::HashSet, num::NonZeroUsize};

use itertools::Itertools;
use rattler_build_matrix_index::PackageIndex;
use rattler_build_matrix_types::{
    MatrixVariable, Requirement, VariableSet, VersionConstraint, VersionExt,
};
use rattler_conda_types::VersionWithSource;

use crate::{
    combination::{Axis, Combination, compute_combinations},
    error::EnumerateError,
};

/// Options that narrow the build matrix.
#[derive(Debug, Clone, Default)]
pub struct EnumerateOptions {
    /// Additional requirements (e.g. `python 2.6.*|>=3`) that candidate
    /// versions must satisfy on top of the recipe's own requirements.
    pub extra_conditions: Vec<Requirement>,
    /// Keep only the newest N major versions of every variable.
    pub max_n_major_versions: Option<NonZeroUsize>,
    /// Keep only the newest N minor versions within every major version.
    pub max_n_minor_versions: Option<NonZeroUsize>,
}

fn constraints_for<'a>(
    requirements: &'a [Requirement],
    package: &'a str,
) -> impl Iterator<Item = &'a VersionConstraint> + 'a {
    requirements
        .iter()
        .filter(move |r| r.name == package)
        .map(|r| &r.constraint)
}

fn keep_top_n_major_versions(
    versions: Vec<VersionWithSource>,
    n: NonZeroUsize,
) -> Vec<VersionWithSource> {
    let majors: HashSet<u64> = versions
        .iter()
        .filter_map(|v| v.leading_major())
        .unique()
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .take(n.get())
        .collect();
    versions
        .into_iter()
        .filter(|v| v.leading_major().is_some_and(|major| majors.contains(&major)))
        .collect()
}

fn keep_top_n_minor_versions(
    versions: Vec<VersionWithSource>,
    n: NonZeroUsize,
) -> Vec<VersionWithSource> {
    let mut keep = HashSet::new();
    let by_major = versions
        .iter()
        .filter_map(|v| v.leading_major_minor())
        .unique()
        .chunk_by(|(major, _)| *major);
    for (_, minors) in &by_major {
        let minors: Vec<_> = minors.collect();
        keep.extend(minors.into_iter().rev().take(n.get()));
    }
    versions
        .into_iter()
        .filter(|v| v.leading_major_minor().is_some_and(|mm| keep.contains(&mm)))
        .collect()
}

/// The candidate versions of one variable, ascending.
fn candidates<I: PackageIndex>(
    variable: MatrixVariable,
    requirements: &[Requirement],
    index: &I,
    options: &EnumerateOptions,
) -> Result<Vec<VersionWithSource>, EnumerateError> {
    let package = variable.package_name();
    let recipe_constraints: Vec<_> = constraints_for(requirements, package).collect();
    let extra_constraints: Vec<_> = constraints_for(&options.extra_conditions, package).collect();

    let available = index
        .versions_of(package)
        .into_iter()
        .sorted()
        .collect::<Vec<_>>();

    let allowed: Vec<_> = available
        .into_iter()
        .filter(|version| recipe_constraints.iter().all(|c| c.matches(version)))
        .collect();

    if allowed.is_empty() {
        return Err(EnumerateError::Unsatisfiable {
            package: package.to_string(),
            constraints: recipe_constraints.iter().join(","),
        });
    }

    let mut versions: Vec<_> = allowed
        .into_iter()
        .filter(|version| extra_constraints.iter().all(|c| c.matches(version)))
        .collect();

    if let Some(n) = options.max_n_major_versions {
        versions = keep_top_n_major_versions(versions, n);
    }
    if let Some(n) = options.max_n_minor_versions {
        versions = keep_top_n_minor_versions(versions, n);
    }

    tracing::debug!(
        "Candidate versions for {package}: [{}]",
        versions.iter().join(", ")
    );

    Ok(versions)
}

/// The name part of a dependency spec, without parsing the constraint.
fn dependency_name(spec: &str) -> String {
    spec.trim()
        .split(|c: char| c.is_whitespace() || matches!(c, '<' | '>' | '=' | '!'))
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase()
}

/// Whether all dependencies of one build that name a pinned variable accept
/// the pinned version.
fn build_accepts(
    depends: &[String],
    combination: &Combination,
    package: &str,
    version: &VersionWithSource,
) -> Result<bool, EnumerateError> {
    for spec in depends {
        let Some(dependency) = MatrixVariable::from_package_name(&dependency_name(spec)) else {
            continue;
        };
        let Some((_, pinned)) = combination.iter().find(|(v, _)| *v == dependency) else {
            continue;
        };
        let requirement: Requirement =
            spec.parse()
                .map_err(|source| EnumerateError::InvalidDependency {
                    package: package.to_string(),
                    version: version.to_string(),
                    spec: spec.clone(),
                    source,
                })?;
        if !requirement.constraint.matches(pinned) {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Whether the pinned versions of a combination agree with the dependency
/// edges in the index. A version with several builds is fine if any of its
/// builds agrees.
fn is_consistent<I: PackageIndex>(
    combination: &Combination,
    index: &I,
) -> Result<bool, EnumerateError> {
    for (variable, version) in combination {
        let package = variable.package_name();
        let builds = index.dependency_sets_of(package, version);
        if builds.is_empty() {
            continue;
        }
        let mut accepted = false;
        for depends in &builds {
            if build_accepts(depends, combination, package, version)? {
                accepted = true;
                break;
            }
        }
        if !accepted {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Enumerate every consistent [`VariableSet`] for the given requirements.
///
/// Every [`MatrixVariable`] that is named by a requirement becomes a dimension
/// of the matrix. Its candidates are the index versions that satisfy all
/// requirements on it and all matching `extra_conditions`. The result is the
/// cartesian product in canonical variable order (numpy varies slowest),
/// ascending versions per variable, without combinations that contradict the
/// dependencies recorded in the index.
///
/// Fails with [`EnumerateError::Unsatisfiable`] if the requirements on a
/// variable exclude every version in the index. If only the
/// `extra_conditions` exclude every version, the result is empty.
pub fn enumerate_variable_sets<I: PackageIndex>(
    requirements: &[Requirement],
    index: &I,
    options: &EnumerateOptions,
) -> Result<Vec<VariableSet>, EnumerateError> {
    let axes = MatrixVariable::all()
        .filter(|variable| {
            requirements
                .iter()
                .any(|r| r.name == variable.package_name())
        })
        .map(|variable| {
            Ok(Axis {
                variable,
                versions: candidates(variable, requirements, index, options)?,
            })
        })
        .collect::<Result<Vec<_>, EnumerateError>>()?;

    let mut variable_sets = Vec::new();
    for combination in compute_combinations(&axes) {
        if !is_consistent(&combination, index)? {
            tracing::debug!(
                "Dropping inconsistent combination [{}]",
                combination
                    .iter()
                    .map(|(variable, version)| format!("{variable}={version}"))
                    .join(", ")
            );
            continue;
        }
        variable_sets.push(
            combination
                .into_iter()
                .map(|(variable, version)| (variable, version.to_string()))
                .collect(),
        );
    }

    Ok(variable_sets)
}
