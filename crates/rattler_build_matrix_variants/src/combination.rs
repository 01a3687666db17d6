//! Variant combination logic - computing the cartesian product of candidate
//! versions

use rattler_build_matrix_types::MatrixVariable;
use rattler_conda_types::VersionWithSource;

/// One dimension of the build matrix: a variable and its candidate versions
#[derive(Debug, Clone)]
pub struct Axis {
    pub variable: MatrixVariable,
    pub versions: Vec<VersionWithSource>,
}

/// A single point of the product, in axis order
pub type Combination = Vec<(MatrixVariable, VersionWithSource)>;

/// Recursively compute all combinations of versions
fn find_combinations(
    axes: &[Axis],
    index: usize,
    current: &mut Combination,
    result: &mut Vec<Combination>,
) {
    if index == axes.len() {
        result.push(current.clone());
        return;
    }

    let axis = &axes[index];
    for version in &axis.versions {
        current.push((axis.variable, version.clone()));
        find_combinations(axes, index + 1, current, result);
        current.pop();
    }
}

/// Compute the cartesian product of the axes.
///
/// The first axis varies slowest and the last axis fastest, versions keep the
/// order of their axis. Without any axis the product is a single empty
/// combination; an axis without versions makes the product empty.
pub fn compute_combinations(axes: &[Axis]) -> Vec<Combination> {
    let mut combinations = Vec::new();
    let mut current = Vec::with_capacity(axes.len());
    find_combinations(axes, 0, &mut current, &mut combinations);
    combinations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn axis(variable: MatrixVariable, versions: &[&str]) -> Axis {
        Axis {
            variable,
            versions: versions.iter().map(|v| v.parse().unwrap()).collect(),
        }
    }

    fn render(combinations: &[Combination]) -> Vec<String> {
        combinations
            .iter()
            .map(|c| {
                c.iter()
                    .map(|(var, v)| format!("{var}={v}"))
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect()
    }

    #[test]
    fn test_outer_axis_varies_slowest() {
        let axes = [
            axis(MatrixVariable::Numpy, &["1.8.0", "1.9.0"]),
            axis(MatrixVariable::Python, &["2.7.2", "3.5.0"]),
        ];
        assert_eq!(
            render(&compute_combinations(&axes)),
            vec![
                "numpy=1.8.0 python=2.7.2",
                "numpy=1.8.0 python=3.5.0",
                "numpy=1.9.0 python=2.7.2",
                "numpy=1.9.0 python=3.5.0",
            ]
        );
    }

    #[test]
    fn test_no_axes() {
        let result = compute_combinations(&[]);
        assert_eq!(result.len(), 1);
        assert!(result[0].is_empty());
    }

    #[test]
    fn test_empty_axis() {
        let axes = [
            axis(MatrixVariable::Python, &["2.7.2"]),
            axis(MatrixVariable::Perl, &[]),
        ];
        assert!(compute_combinations(&axes).is_empty());
    }
}
