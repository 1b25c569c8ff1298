//! Command-line process tests: flags, output files, and exit codes.
//!
//! Drives the `sweeproute` entry point through the `cli_fixture` binary.

use std::path::Path;
use std::process::{Command, Output};

fn run(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_cli_fixture"))
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("spawn cli_fixture")
}

fn write_targets(dir: &Path) -> String {
    let path = dir.join("targets.txt");
    std::fs::write(&path, "# x y mass\n1 0 1\n2 0 1\n0 1 1\n").unwrap();
    path.to_string_lossy().to_string()
}

#[test]
fn writes_script_and_report() {
    let dir = tempfile::tempdir().unwrap();
    let targets = write_targets(dir.path());
    let script = dir.path().join("out").join("robot_script.txt");
    let report = dir.path().join("out").join("report.json");

    let output = run(
        dir.path(),
        &[
            "--targets",
            &targets,
            "--iterations",
            "2000",
            "--workers",
            "2",
            "--seed",
            "3",
            "--script",
            &script.to_string_lossy(),
            "--report",
            &report.to_string_lossy(),
            "--log-level",
            "warn",
        ],
    );
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("reward=3"), "stdout: {stdout}");

    let text = std::fs::read_to_string(&script).unwrap();
    assert!(text.ends_with("FINISH"));
    assert!(text.lines().filter(|l| l.starts_with("GO ")).count() >= 2);

    let json: serde_json::Value = serde_json::from_slice(&std::fs::read(&report).unwrap()).unwrap();
    assert_eq!(json["workers"].as_array().unwrap().len(), 2);
    assert_eq!(json["config"]["base_seed"], 3);
    assert_eq!(json["classification"]["missed"], 0);
}

#[test]
fn config_file_is_overridden_by_flags() {
    let dir = tempfile::tempdir().unwrap();
    let targets = write_targets(dir.path());
    let config = dir.path().join("solver.json");
    std::fs::write(&config, r#"{"iterations": 100, "workers": 1, "base_seed": 8}"#).unwrap();
    let report = dir.path().join("report.json");

    let output = run(
        dir.path(),
        &[
            "--targets",
            &targets,
            "--config",
            &config.to_string_lossy(),
            "--workers",
            "3",
            "--report",
            &report.to_string_lossy(),
        ],
    );
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&std::fs::read(&report).unwrap()).unwrap();
    assert_eq!(json["config"]["iterations"], 100);
    assert_eq!(json["config"]["base_seed"], 8);
    assert_eq!(json["config"]["workers"], "3");
    assert!(dir.path().join("results").join("robot_script.txt").exists());
}

#[test]
fn malformed_targets_exit_non_zero() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.txt");
    std::fs::write(&path, "1 2\n").unwrap();
    let output = run(dir.path(), &["--targets", &path.to_string_lossy()]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("line 1"));
}

#[test]
fn oversized_worker_count_exits_non_zero() {
    let dir = tempfile::tempdir().unwrap();
    let targets = write_targets(dir.path());
    let output = run(
        dir.path(),
        &["--targets", &targets, "--workers", "18446744073709551615"],
    );
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid worker count"), "stderr: {stderr}");
    assert!(!stderr.contains("panicked"), "stderr: {stderr}");
}

#[test]
fn invalid_config_exits_non_zero() {
    let dir = tempfile::tempdir().unwrap();
    let targets = write_targets(dir.path());
    let output = run(dir.path(), &["--targets", &targets, "--iterations", "0"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("iteration"));
}
