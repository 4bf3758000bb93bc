//! Integration tests for top-level CLI behavior.

use std::path::Path;
use std::process::Command;

const CONFIG_VARS: [&str; 9] = [
    "NOTION_TOKEN",
    "NOTION_DATABASE_ID",
    "GITHUB_REPO",
    "BRANCH_PREFIX",
    "DRY_RUN",
    "WAIT_FOR_CI",
    "CI_TIMEOUT_SECS",
    "PIPELINE_RECORD",
    "PIPELINE_ON_ERROR",
];

/// Runs the binary in `cwd` with every pipeline variable cleared.
fn run_pipeline(cwd: &Path, args: &[&str], env: &[(&str, &str)]) -> std::process::Output {
    let bin = env!("CARGO_BIN_EXE_agent-pipeline");
    let mut command = Command::new(bin);
    command.current_dir(cwd).args(args);
    for var in CONFIG_VARS {
        command.env_remove(var);
    }
    command.envs(env.iter().copied());
    command.output().expect("failed to run agent-pipeline binary")
}

#[test]
fn branch_name_prints_derived_name() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_pipeline(dir.path(), &["branch-name", "abc12345-xyz", "Fix Login Bug!!"], &[]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "feature/abc12345-fix-login-bug\n");
}

#[test]
fn branch_name_honours_prefix() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_pipeline(
        dir.path(),
        &["branch-name", "9f8e", "!!!", "--prefix", "bugfix"],
        &[],
    );
    assert_eq!(String::from_utf8_lossy(&output.stdout), "bugfix/9f8e-task\n");
}

#[test]
fn run_without_configuration_exits_with_code_two() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_pipeline(dir.path(), &["run"], &[("NOTION_DATABASE_ID", "db1")]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr.contains("Missing required env vars: NOTION_TOKEN, GITHUB_REPO"));
}

#[test]
fn dotenv_file_supplies_configuration() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join(".env"),
        "NOTION_TOKEN=secret\nNOTION_DATABASE_ID=db1\nGITHUB_REPO=acme/app\nCI_TIMEOUT_SECS=never\n",
    )
    .unwrap();
    let output = run_pipeline(dir.path(), &["run"], &[]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr.contains("Invalid value for CI_TIMEOUT_SECS"));
}

#[test]
fn validate_mock_accepts_complete_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ok.mock.json");
    std::fs::write(
        &path,
        r#"{"task_id": "1", "title": "t", "description": "", "inputs": {}, "outputs": {},
            "cases": [], "notes": "", "owner": "qa"}"#,
    )
    .unwrap();

    let output = run_pipeline(dir.path(), &["validate-mock", path.to_str().unwrap()], &[]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).starts_with("Mock OK: "));
}

#[test]
fn validate_mock_lists_missing_fields() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.mock.json");
    std::fs::write(&path, r#"{"task_id": "1", "title": "t", "inputs": {}}"#).unwrap();

    let output = run_pipeline(dir.path(), &["validate-mock", path.to_str().unwrap()], &[]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr)
        .contains("mock missing required fields: cases, description, notes, outputs"));
}

#[test]
fn unknown_subcommand_is_a_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_pipeline(dir.path(), &["deploy"], &[]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn run_help_lists_flags() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_pipeline(dir.path(), &["run", "--help"], &[]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("--dry-run"));
    assert!(stdout.contains("--wait-for-ci"));
    assert!(stdout.contains("--root"));
}
