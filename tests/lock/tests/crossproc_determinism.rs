//! Cross-process determinism of the ensemble.
//!
//! Spawns the `route_fixture` binary under several process-level variants
//! (cwd, locale, spurious env vars) and asserts byte-identical output for a
//! fixed base seed and worker count. Thread scheduling differs between runs;
//! the output must not.

use std::path::Path;
use std::process::Command;

fn workspace_root() -> String {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .and_then(Path::parent)
        .expect("workspace root exists")
        .to_string_lossy()
        .to_string()
}

/// Run the fixture and return its stdout.
fn run_variant(work_dir: &str, args: &[&str], env_overrides: &[(&str, &str)]) -> String {
    let bin = env!("CARGO_BIN_EXE_route_fixture");

    let mut command = Command::new(bin);
    command.args(args).current_dir(work_dir);
    command
        .env_remove("LC_ALL")
        .env_remove("LC_COLLATE")
        .env_remove("LANG")
        .env_remove("LANGUAGE")
        .env_remove("RAYON_NUM_THREADS");
    for &(key, val) in env_overrides {
        command.env(key, val);
    }

    let output = command.output().unwrap_or_else(|e| {
        panic!("failed to spawn {bin} (work_dir={work_dir}, overrides={env_overrides:?}): {e}")
    });
    assert!(
        output.status.success(),
        "route_fixture exited with {}: stderr={}",
        output.status,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).expect("stdout is valid UTF-8")
}

#[test]
fn crossproc_determinism_env_variants() {
    let root = workspace_root();
    let args = ["42", "4"];
    let baseline = run_variant(&root, &args, &[]);

    assert!(baseline.contains("instance_digest=sha256:"));
    assert!(baseline.contains("result_digest=sha256:"));
    assert_eq!(baseline.lines().filter(|l| l.starts_with("worker=")).count(), 4);

    let alt_cwd = if cfg!(target_os = "windows") { "C:\\" } else { "/tmp" };
    assert_eq!(
        baseline,
        run_variant(alt_cwd, &args, &[]),
        "output differs when cwd changes from {root} to {alt_cwd}"
    );
    assert_eq!(
        baseline,
        run_variant(&root, &args, &[("LC_ALL", "C"), ("LANG", "C")]),
        "output differs when LC_ALL=C LANG=C"
    );
    assert_eq!(
        baseline,
        run_variant(
            &root,
            &args,
            &[
                ("SWEEPROUTE_NOISE", "should_not_matter"),
                ("TZ", "America/New_York"),
                ("RAYON_NUM_THREADS", "1"),
            ],
        ),
        "output differs with spurious env vars"
    );
}

#[test]
fn crossproc_repeated_runs_agree() {
    let root = workspace_root();
    let first = run_variant(&root, &["7", "3"], &[]);
    for _ in 0..3 {
        assert_eq!(first, run_variant(&root, &["7", "3"], &[]));
    }
}

#[test]
fn base_seed_changes_worker_seeds() {
    let root = workspace_root();
    let a = run_variant(&root, &["1", "2"], &[]);
    let b = run_variant(&root, &["2", "2"], &[]);
    let seeds = |out: &str| -> Vec<String> {
        out.lines()
            .filter(|l| l.starts_with("worker="))
            .filter_map(|l| l.split_whitespace().nth(1).map(str::to_string))
            .collect()
    };
    assert_ne!(seeds(&a), seeds(&b));
    let instance = |out: &str| out.lines().next().map(str::to_string);
    assert_eq!(instance(&a), instance(&b), "the instance does not depend on the seed");
}
