//! The build configuration a variable set implies for downstream build tools

use std::collections::BTreeMap;

use rattler_build_matrix_types::{
    MalformedVersion, MalformedVersionKind, MatrixVariable, VariableSet,
};
use serde::Serialize;

/// Version pins in the form conda-build consumes them. Python and numpy are
/// compressed to integers (`2.7` -> `27`), perl and r keep their full version.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct MatrixBuildConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conda_py: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conda_npy: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conda_perl: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conda_r: Option<String>,
}

impl MatrixBuildConfig {
    /// The configuration as `CONDA_*` environment variables.
    pub fn env_vars(&self) -> BTreeMap<String, String> {
        let mut env = BTreeMap::new();
        if let Some(py) = self.conda_py {
            env.insert("CONDA_PY".to_string(), py.to_string());
        }
        if let Some(npy) = self.conda_npy {
            env.insert("CONDA_NPY".to_string(), npy.to_string());
        }
        if let Some(perl) = &self.conda_perl {
            env.insert("CONDA_PERL".to_string(), perl.clone());
        }
        if let Some(r) = &self.conda_r {
            env.insert("CONDA_R".to_string(), r.clone());
        }
        env
    }
}

fn numeric_pin(variable: MatrixVariable, version: &str) -> Result<u32, MalformedVersion> {
    variable
        .encode(version)?
        .parse()
        .map_err(|_| MalformedVersion::new(version, MalformedVersionKind::NoNumericSegment))
}

/// Translate a variable set into the build configuration a build of that
/// variant runs with. Variables absent from the set stay unset.
pub fn setup_vn_mtx_case(variables: &VariableSet) -> Result<MatrixBuildConfig, MalformedVersion> {
    let mut config = MatrixBuildConfig::default();
    for (variable, version) in variables.iter() {
        match variable {
            MatrixVariable::Python => config.conda_py = Some(numeric_pin(variable, version)?),
            MatrixVariable::Numpy => config.conda_npy = Some(numeric_pin(variable, version)?),
            MatrixVariable::Perl => config.conda_perl = Some(version.to_string()),
            MatrixVariable::R => config.conda_r = Some(version.to_string()),
        }
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_all_variables() {
        let set = VariableSet::from_pairs([
            ("perl", "9.10.11.12"),
            ("numpy", "1.23"),
            ("python", "2.7"),
            ("r", "4.5.6"),
        ])
        .unwrap();

        let config = setup_vn_mtx_case(&set).unwrap();
        assert_eq!(
            config,
            MatrixBuildConfig {
                conda_py: Some(27),
                conda_npy: Some(123),
                conda_perl: Some("9.10.11.12".to_string()),
                conda_r: Some("4.5.6".to_string()),
            }
        );
    }

    #[test]
    fn test_absent_variables_stay_unset() {
        let set = VariableSet::from_pairs([("python", "3.5.0")]).unwrap();
        let config = setup_vn_mtx_case(&set).unwrap();
        assert_eq!(config.conda_py, Some(35));
        assert_eq!(config.conda_npy, None);
        assert_eq!(config.conda_perl, None);

        assert_eq!(setup_vn_mtx_case(&VariableSet::new()).unwrap(), MatrixBuildConfig::default());
    }

    #[test]
    fn test_compressed_tokens() {
        let set = VariableSet::from_pairs([("python", "35"), ("numpy", "110")]).unwrap();
        let config = setup_vn_mtx_case(&set).unwrap();
        assert_eq!(config.conda_py, Some(35));
        assert_eq!(config.conda_npy, Some(110));
    }

    #[test]
    fn test_env_vars() {
        let set = VariableSet::from_pairs([("python", "2.7.2"), ("r", "3.2.2")]).unwrap();
        let env = setup_vn_mtx_case(&set).unwrap().env_vars();
        assert_eq!(env.get("CONDA_PY").map(String::as_str), Some("27"));
        assert_eq!(env.get("CONDA_R").map(String::as_str), Some("3.2.2"));
        assert_eq!(env.len(), 2);
    }

    #[test]
    fn test_non_numeric_python() {
        let set = VariableSet::from_pairs([("python", "dev")]).unwrap();
        let err = setup_vn_mtx_case(&set).unwrap_err();
        assert_eq!(err.kind, MalformedVersionKind::NoNumericSegment);
    }
}
