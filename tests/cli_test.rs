// tests/cli_test.rs
use std::process::{Command, Output};

fn git_versioning(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_git-versioning"))
        .args(args)
        .output()
        .expect("Failed to execute git-versioning")
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

#[test]
fn test_help() {
    let output = git_versioning(&["--help"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("Derive a build version"));
}

#[test]
fn test_version_from_flags() {
    let output = git_versioning(&[
        "--ref-type",
        "branch",
        "--ref-name",
        "feature/x",
        "--commit",
        "abc1234def5678",
        "--distance",
        "7",
    ]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "feature/x-abc1234\n");
}

#[test]
fn test_version_from_snapshot_file_with_channel() {
    let output = git_versioning(&[
        "--snapshot",
        "tests/fixtures/snapshot_develop.toml",
        "--channel",
    ]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "1.5.0.7-SNAPSHOT\nsnapshot\n");
}

#[test]
fn test_tag_is_release_channel() {
    let output = git_versioning(&[
        "--ref-type",
        "tag",
        "--ref-name",
        "v1.2.3",
        "--commit",
        "abc1234def5678",
        "--channel",
        "--require-semver",
    ]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "1.2.3\nrelease\n");
}

#[test]
fn test_require_semver_rejects_branch_version() {
    let output = git_versioning(&[
        "--ref-type",
        "branch",
        "--ref-name",
        "main",
        "--commit",
        "abc1234def5678",
        "--require-semver",
    ]);
    assert!(!output.status.success());
    assert!(stdout(&output).is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not a semantic version"));
}

#[test]
fn test_no_matching_rule_fails() {
    let output = git_versioning(&[
        "--config",
        "tests/fixtures/custom.toml",
        "--ref-type",
        "branch",
        "--ref-name",
        "hotfix",
        "--commit",
        "abc1234def5678",
    ]);
    assert!(!output.status.success());
    assert!(stdout(&output).is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No rule matches branch ref 'hotfix'"));
}

#[test]
fn test_check_reports_invalid_configuration() {
    let output = git_versioning(&["--config", "tests/fixtures/invalid_tag_pattern.toml", "--check"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid pattern"));

    let output = git_versioning(&["--config", "tests/fixtures/custom.toml", "--check"]);
    assert!(output.status.success());
}

#[test]
fn test_snapshot_flags_require_ref_type() {
    for flag in [&["--dirty"][..], &["--distance", "3"][..]] {
        let output = git_versioning(flag);
        assert!(!output.status.success());
        assert!(stdout(&output).is_empty());
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("--ref-type"), "{}", stderr);
    }
}

#[test]
fn test_out_of_range_describe_tag_fails() {
    let output = git_versioning(&[
        "--ref-type",
        "branch",
        "--ref-name",
        "develop",
        "--commit",
        "abc1234def5678",
        "--describe-tag",
        "v1.99999999999999999999.0",
        "--distance",
        "3",
    ]);
    assert!(!output.status.success());
    assert!(stdout(&output).is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("out of range"));
}
