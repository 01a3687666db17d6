use std::{
    path::{Path, PathBuf},
    process::{Command, Output},
};

use serde_json::Value;

fn test_data_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("test-data")
}

fn rattler_build_matrix(args: &[&str]) -> Output {
    let test_data = test_data_dir();
    Command::new(env!("CARGO_BIN_EXE_rattler-build-matrix"))
        .current_dir(&test_data)
        .env_remove("RUST_LOG")
        .env_remove("RATTLER_BUILD_MATRIX_INDEX")
        .env_remove("RATTLER_BUILD_MATRIX_CONDITIONS")
        .args(args)
        .output()
        .expect("failed to run rattler-build-matrix")
}

#[test]
fn test_render_json() {
    let output = rattler_build_matrix(&[
        "render",
        "recipes/numpy_matrix",
        "recipes/skip_py3k/meta.yaml",
        "--index",
        "channel/linux-64/repodata.json",
        "--target-platform",
        "linux-64",
        "--output",
        "json",
    ]);
    assert!(
        output.status.success(),
        "{}",
        String::from_utf8_lossy(&output.stderr)
    );

    let rendered: Value = serde_json::from_slice(&output.stdout).unwrap();
    let dist_names: Vec<&str> = rendered
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["dist_name"].as_str().unwrap())
        .collect();
    assert_eq!(
        dist_names,
        vec![
            "test_numpy_matrix-1.0-np18py27_0",
            "test_numpy_matrix-1.0-np18py35_0",
            "test_numpy_matrix-1.0-np19py35_0",
            "test_skip_py3k-1.0-py26_0",
            "test_skip_py3k-1.0-py27_0",
        ]
    );

    let first = &rendered[0];
    assert_eq!(first["variables"]["python"], "2.7.2");
    assert_eq!(first["variables"]["numpy"], "1.8.0");
    assert_eq!(first["build_env"]["CONDA_PY"], "27");
    assert_eq!(first["build_env"]["CONDA_NPY"], "18");
}

#[test]
fn test_render_with_condition() {
    let output = rattler_build_matrix(&[
        "render",
        "recipes/python_only",
        "--index",
        "channel/linux-64/repodata.json",
        "--matrix-condition",
        "python 2.6.*|>=3",
        "--output",
        "json",
    ]);
    assert!(output.status.success());

    let rendered: Value = serde_json::from_slice(&output.stdout).unwrap();
    let build_ids: Vec<&str> = rendered
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["build_id"].as_str().unwrap())
        .collect();
    assert_eq!(build_ids, vec!["py26_0", "py35_0"]);
}

#[test]
fn test_render_table() {
    let output = rattler_build_matrix(&[
        "render",
        "recipes/perl_r",
        "--index",
        "channel/linux-64/repodata.json",
    ]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("perl5.22.0r3.2.2_1"));
    assert!(stdout.contains("perl=5.22.0, r=3.2.2"));
}

#[test]
fn test_render_errors() {
    let output = rattler_build_matrix(&[
        "render",
        "recipes/numpy_matrix",
        "--index",
        "channel/linux-64/repodata.json",
        "--matrix-condition",
        "python >=2.7;numpy >=2",
    ]);
    // extra conditions alone never make a recipe unsatisfiable
    assert!(output.status.success());

    let output = rattler_build_matrix(&[
        "render",
        "recipes/numpy_matrix",
        "--index",
        "missing.json",
    ]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("missing.json"));
}
