//! Integration tests for fixes
//!
//! Fixes computed from the snapshot fixtures are applied to the fixture
//! source text and compared with hand-written expectations.

use overridelint::analysis::{DeclarationForm, PolicyConfiguration, PolicyStyle};
use overridelint::fix::{apply_fixes, FileFixes, FixApplier, PendingFix};
use overridelint::{AnalysisUnit, Driver, FileReport, Fix};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn load(relative: &str) -> AnalysisUnit {
    AnalysisUnit::load(&fixtures_path().join(relative)).expect("Failed to load snapshot")
}

fn fixes(report: &FileReport) -> Vec<&Fix> {
    report
        .findings
        .iter()
        .filter_map(|f| f.diagnostic.fix.as_ref())
        .collect()
}

fn fixed(relative: &str, policy: PolicyConfiguration) -> String {
    let unit = load(relative);
    let report = Driver::new(policy).run_unit(&unit);
    let outcome = apply_fixes(&unit.source, fixes(&report));
    assert_eq!(outcome.skipped, 0, "no fix should conflict");
    outcome.output
}

const RENDER: &str = "  render(): void {}\n";
const RENDER_TAGGED: &str = "  /** @override */\n  render(): void {}\n";
const WIDGET_SIZE: &str = "  /** Size of the widget. */\n  get size(): number { return 1; }";
const HELPER: &str = "  /** @override */\n  helper(): void {}";

fn widget_source() -> String {
    load("widget/widget.ts.snapshot.json").source
}

// ============================================================================
// Either style
// ============================================================================

#[test]
fn test_widget_either_fix() {
    let expected = widget_source()
        .replacen(RENDER, RENDER_TAGGED, 1)
        .replace(
            WIDGET_SIZE,
            "  /**\n   * Size of the widget.\n   * @override\n   */\n  get size(): number { return 1; }",
        )
        .replace(HELPER, "  helper(): void {}");

    assert_eq!(
        fixed("widget/widget.ts.snapshot.json", PolicyConfiguration::default()),
        expected
    );
}

#[test]
fn test_widget_either_prefers_keyword() {
    let policy = PolicyConfiguration::new(PolicyStyle::Either).with_prefer(DeclarationForm::Keyword);
    let expected = widget_source()
        .replacen(RENDER, RENDER_TAGGED, 1)
        .replace(
            WIDGET_SIZE,
            "  /** Size of the widget. */\n  override get size(): number { return 1; }",
        )
        .replace(HELPER, "  helper(): void {}");

    assert_eq!(fixed("widget/widget.ts.snapshot.json", policy), expected);
}

// ============================================================================
// Strict styles
// ============================================================================

#[test]
fn test_widget_tag_only_fix() {
    let expected = widget_source()
        .replacen(RENDER, RENDER_TAGGED, 1)
        .replace(
            "   * Refresh state.\n   */\n  override update(): void {}",
            "   * Refresh state.\n   * @override\n   */\n  update(): void {}",
        )
        .replace(
            WIDGET_SIZE,
            "  /**\n   * Size of the widget.\n   * @override\n   */\n  get size(): number { return 1; }",
        )
        .replace(HELPER, "  helper(): void {}");

    assert_eq!(
        fixed(
            "widget/widget.ts.snapshot.json",
            PolicyConfiguration::new(PolicyStyle::TagOnly)
        ),
        expected
    );
}

#[test]
fn test_widget_both_fix() {
    let expected = widget_source()
        .replacen(RENDER, RENDER_TAGGED, 1)
        .replace(
            "   * Refresh state.\n   */\n  override update(): void {}",
            "   * Refresh state.\n   * @override\n   */\n  override update(): void {}",
        )
        .replace(
            WIDGET_SIZE,
            "  /**\n   * Size of the widget.\n   * @override\n   */\n  override get size(): number { return 1; }",
        )
        .replace(HELPER, "  helper(): void {}");

    assert_eq!(
        fixed(
            "widget/widget.ts.snapshot.json",
            PolicyConfiguration::new(PolicyStyle::Both)
        ),
        expected
    );
}

#[test]
fn test_heuristic_keyword_only_fix() {
    let unit = load("heuristic/shapes.ts.snapshot.yaml");
    let expected = unit
        .source
        .replace("  area(): number {", "  override area(): number {");

    assert_eq!(
        fixed(
            "heuristic/shapes.ts.snapshot.yaml",
            PolicyConfiguration::new(PolicyStyle::KeywordOnly)
        ),
        expected
    );
}

// ============================================================================
// Writing to disk
// ============================================================================

/// Copy a fixture's source and snapshot into `dir`
fn stage(dir: &Path, fixture_dir: &str, source: &str, snapshot: &str) -> AnalysisUnit {
    let from = fixtures_path().join(fixture_dir);
    std::fs::copy(from.join(source), dir.join(source)).unwrap();
    std::fs::copy(from.join(snapshot), dir.join(snapshot)).unwrap();
    AnalysisUnit::load(&dir.join(snapshot)).unwrap()
}

fn file_fixes<'a>(unit: &'a AnalysisUnit, report: &'a FileReport) -> FileFixes<'a> {
    FileFixes {
        path: report.file.clone(),
        expected_source: &unit.source,
        fixes: report
            .findings
            .iter()
            .filter_map(|f| {
                f.diagnostic.fix.as_ref().map(|fix| PendingFix {
                    label: f.diagnostic.member_name.clone(),
                    fix,
                })
            })
            .collect(),
    }
}

#[test]
fn test_applier_writes_file_and_undo_script() {
    let dir = TempDir::new().unwrap();
    let unit = stage(dir.path(), "widget", "widget.ts", "widget.ts.snapshot.json");
    let report = Driver::new(PolicyConfiguration::default()).run_unit(&unit);
    let undo = dir.path().join("undo.sh");

    let summary = FixApplier::new(false, false, Some(undo.clone()))
        .apply(&[file_fixes(&unit, &report)])
        .unwrap();

    assert_eq!(summary.files_changed, 1);
    assert_eq!(summary.fixes_applied, 3);
    assert_eq!(summary.stale_files, 0);

    let written = std::fs::read_to_string(dir.path().join("widget.ts")).unwrap();
    assert!(written.contains(RENDER_TAGGED));
    assert!(!written.contains(HELPER));

    let script = std::fs::read_to_string(&undo).unwrap();
    assert!(script.starts_with("#!/bin/bash"));
    assert!(script.contains("Refresh state."));
}

#[test]
fn test_applier_dry_run_leaves_file() {
    let dir = TempDir::new().unwrap();
    let unit = stage(dir.path(), "widget", "widget.ts", "widget.ts.snapshot.json");
    let report = Driver::new(PolicyConfiguration::default()).run_unit(&unit);

    let summary = FixApplier::new(false, true, None)
        .apply(&[file_fixes(&unit, &report)])
        .unwrap();

    assert_eq!(summary.fixes_applied, 0);
    let on_disk = std::fs::read_to_string(dir.path().join("widget.ts")).unwrap();
    assert_eq!(on_disk, unit.source);
}

#[test]
fn test_applier_skips_stale_file() {
    let dir = TempDir::new().unwrap();
    let unit = stage(dir.path(), "widget", "widget.ts", "widget.ts.snapshot.json");
    let report = Driver::new(PolicyConfiguration::default()).run_unit(&unit);

    let edited = format!("// edited\n{}", unit.source);
    std::fs::write(dir.path().join("widget.ts"), &edited).unwrap();

    let summary = FixApplier::new(false, false, None)
        .apply(&[file_fixes(&unit, &report)])
        .unwrap();

    assert_eq!(summary.stale_files, 1);
    assert_eq!(summary.fixes_applied, 0);
    assert_eq!(summary.fixes_skipped, 3);
    assert_eq!(
        std::fs::read_to_string(dir.path().join("widget.ts")).unwrap(),
        edited
    );
}
