//! CLI integration tests
//!
//! These tests verify that the CLI works correctly with various options.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Get the path to the test fixtures directory
fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn overridelint() -> Command {
    Command::cargo_bin("overridelint").expect("binary should be built")
}

/// Copy the widget fixture into a scratch directory so fixes can be written
fn stage_widget() -> TempDir {
    let dir = TempDir::new().unwrap();
    let from = fixtures_path().join("widget");
    for name in ["widget.ts", "widget.ts.snapshot.json"] {
        std::fs::copy(from.join(name), dir.path().join(name)).unwrap();
    }
    dir
}

fn json_output(args: &[&str], path: &Path) -> serde_json::Value {
    let output = overridelint()
        .arg(path)
        .args(["--format", "json", "-q"])
        .args(args)
        .output()
        .unwrap();
    serde_json::from_slice(&output.stdout).expect("stdout should be a JSON report")
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_cli_help() {
    overridelint()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("overridelint"))
        .stdout(predicate::str::contains("--style"))
        .stdout(predicate::str::contains("--fix"));
}

#[test]
fn test_cli_version() {
    overridelint()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_cli_clean_fixture_succeeds() {
    overridelint()
        .arg(fixtures_path().join("clean"))
        .assert()
        .success()
        .stdout(predicate::str::contains("No override issues found!"));
}

#[test]
fn test_cli_findings_exit_nonzero() {
    overridelint()
        .arg(fixtures_path().join("widget"))
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Found 3 override issues"))
        .stdout(predicate::str::contains("OVR001"))
        .stdout(predicate::str::contains("[fixable]"));
}

#[test]
fn test_cli_empty_directory() {
    let dir = TempDir::new().unwrap();
    overridelint()
        .arg(dir.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("No snapshots found."));
}

#[test]
fn test_cli_invalid_style_rejected() {
    overridelint()
        .arg(fixtures_path().join("widget"))
        .args(["--style", "strict"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("strict"));
}

// ============================================================================
// Output Formats
// ============================================================================

#[test]
fn test_cli_json_format() {
    let report = json_output(&[], &fixtures_path().join("widget"));

    assert_eq!(report["total_issues"], 3);
    assert_eq!(report["files_checked"], 1);
    assert_eq!(report["summary"]["by_kind"]["missing-tag"], 1);
    assert_eq!(report["summary"]["by_kind"]["missing-either"], 1);
    assert_eq!(report["summary"]["by_kind"]["unnecessary-tag"], 1);
}

#[test]
fn test_cli_style_flag() {
    let report = json_output(&["--style", "both"], &fixtures_path().join("widget"));
    assert_eq!(report["total_issues"], 4);
    assert_eq!(report["summary"]["by_kind"]["missing-both"], 1);
}

#[test]
fn test_cli_single_snapshot_path() {
    let snapshot = fixtures_path().join("heuristic").join("shapes.ts.snapshot.yaml");
    let report = json_output(&["--style", "keyword-only"], &snapshot);

    assert_eq!(report["total_issues"], 1);
    assert_eq!(report["issues"][0]["code"], "OVR002");
    assert_eq!(report["issues"][0]["line"], 10);
}

#[test]
fn test_cli_sarif_output_file() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("report.sarif");

    overridelint()
        .arg(fixtures_path().join("widget"))
        .args(["--format", "sarif", "--output"])
        .arg(&out)
        .assert()
        .code(1);

    let sarif: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(sarif["version"], "2.1.0");
    assert_eq!(sarif["runs"][0]["results"].as_array().unwrap().len(), 3);
}

#[test]
fn test_cli_parallel_matches_sequential() {
    let root = fixtures_path();
    let sequential = json_output(&[], &root);
    let parallel = json_output(&["--parallel"], &root);
    assert_eq!(sequential, parallel);
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_cli_config_file() {
    let dir = stage_widget();
    std::fs::write(
        dir.path().join(".overridelint.yml"),
        "policy:\n  style: keyword-only\nreport:\n  format: json\n",
    )
    .unwrap();

    let output = overridelint().arg(dir.path()).arg("-q").output().unwrap();
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["summary"]["by_kind"]["missing-keyword"], 1);
}

#[test]
fn test_cli_exclude_pattern() {
    let report = json_output(&["--exclude", "**/widget/**"], &fixtures_path());
    assert_eq!(report["files_checked"], 2);
    assert_eq!(report["total_issues"], 1);
}

// ============================================================================
// Fix Mode
// ============================================================================

#[test]
fn test_cli_fix_rewrites_source() {
    let dir = stage_widget();

    overridelint()
        .arg(dir.path())
        .args(["--fix", "-q"])
        .assert()
        .success();

    let fixed = std::fs::read_to_string(dir.path().join("widget.ts")).unwrap();
    assert!(fixed.contains("  /** @override */\n  render(): void {}"));
    assert!(fixed.contains("   * Size of the widget.\n   * @override\n   */"));
    assert!(!fixed.contains("/** @override */\n  helper"));
}

#[test]
fn test_cli_dry_run_keeps_source() {
    let dir = stage_widget();
    let before = std::fs::read_to_string(dir.path().join("widget.ts")).unwrap();

    overridelint()
        .arg(dir.path())
        .args(["--fix", "--dry-run"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Dry run"));

    let after = std::fs::read_to_string(dir.path().join("widget.ts")).unwrap();
    assert_eq!(before, after);
}

#[test]
fn test_cli_fix_writes_undo_script() {
    let dir = stage_widget();
    let undo = dir.path().join("undo.sh");

    overridelint()
        .arg(dir.path())
        .args(["--fix", "-q", "--undo-script"])
        .arg(&undo)
        .assert()
        .success();

    let script = std::fs::read_to_string(&undo).unwrap();
    assert!(script.contains("widget.ts"));
}

// ============================================================================
// Baseline
// ============================================================================

#[test]
fn test_cli_baseline_round_trip() {
    let dir = stage_widget();
    let baseline = dir.path().join("baseline.json");

    overridelint()
        .arg(dir.path())
        .arg("--generate-baseline")
        .arg(&baseline)
        .assert()
        .success();
    assert!(baseline.exists());

    overridelint()
        .arg(dir.path())
        .arg("--baseline")
        .arg(&baseline)
        .assert()
        .success()
        .stdout(predicate::str::contains("No override issues found!"));

    let report = json_output(
        &["--style", "both", "--baseline", baseline.to_str().unwrap()],
        dir.path(),
    );
    // Only the findings the stricter style adds are new
    assert_eq!(report["total_issues"], 2);
}
