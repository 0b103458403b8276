//! Integration tests for the override engine
//!
//! These tests load the snapshot fixtures and run them through the driver.

use overridelint::analysis::{DeclarationForm, MessageKind, PolicyConfiguration, PolicyStyle};
use overridelint::hierarchy::TypeKind;
use overridelint::{AnalysisUnit, Config, Driver, FileFinder, Finding};
use std::path::PathBuf;

/// Get the path to the test fixtures directory
fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn load(relative: &str) -> AnalysisUnit {
    AnalysisUnit::load(&fixtures_path().join(relative)).expect("Failed to load snapshot")
}

fn check(relative: &str, style: PolicyStyle) -> Vec<Finding> {
    Driver::new(PolicyConfiguration::new(style))
        .run_unit(&load(relative))
        .findings
}

fn summary(findings: &[Finding]) -> Vec<(String, MessageKind)> {
    findings
        .iter()
        .map(|f| (f.diagnostic.member_name.clone(), f.diagnostic.message_kind))
        .collect()
}

// ============================================================================
// Resolution with type information
// ============================================================================

#[test]
fn test_widget_either_style() {
    let findings = check("widget/widget.ts.snapshot.json", PolicyStyle::Either);

    assert_eq!(
        summary(&findings),
        vec![
            ("render".to_string(), MessageKind::MissingTag),
            ("size".to_string(), MessageKind::MissingEither),
            ("helper".to_string(), MessageKind::UnnecessaryTag),
        ]
    );
}

#[test]
fn test_interface_member_names_interface() {
    let findings = check("widget/widget.ts.snapshot.json", PolicyStyle::KeywordOnly);
    let render = findings
        .iter()
        .find(|f| f.diagnostic.member_name == "render")
        .expect("render should be reported");

    let source = render.diagnostic.source.as_ref().unwrap();
    assert_eq!(source.kind, TypeKind::Interface);
    assert_eq!(source.name, "Renderable");
    assert_eq!(render.diagnostic.message_kind, MessageKind::MissingTag);
    assert_eq!(
        render.diagnostic.message(),
        "Method 'render' implements interface 'Renderable' but has no @override tag"
    );
}

#[test]
fn test_widget_keyword_only_style() {
    let findings = check("widget/widget.ts.snapshot.json", PolicyStyle::KeywordOnly);

    assert_eq!(
        summary(&findings),
        vec![
            ("render".to_string(), MessageKind::MissingTag),
            ("size".to_string(), MessageKind::MissingKeyword),
            ("helper".to_string(), MessageKind::UnnecessaryTag),
        ]
    );
}

#[test]
fn test_widget_tag_only_style() {
    let findings = check("widget/widget.ts.snapshot.json", PolicyStyle::TagOnly);

    assert_eq!(
        summary(&findings),
        vec![
            ("render".to_string(), MessageKind::MissingTag),
            ("update".to_string(), MessageKind::MissingTag),
            ("update".to_string(), MessageKind::UnnecessaryKeyword),
            ("size".to_string(), MessageKind::MissingTag),
            ("helper".to_string(), MessageKind::UnnecessaryTag),
        ]
    );
}

#[test]
fn test_widget_both_style() {
    let findings = check("widget/widget.ts.snapshot.json", PolicyStyle::Both);

    assert_eq!(
        summary(&findings),
        vec![
            ("render".to_string(), MessageKind::MissingTag),
            ("update".to_string(), MessageKind::MissingTag),
            ("size".to_string(), MessageKind::MissingBoth),
            ("helper".to_string(), MessageKind::UnnecessaryTag),
        ]
    );
}

#[test]
fn test_finding_positions() {
    let findings = check("widget/widget.ts.snapshot.json", PolicyStyle::Either);
    let positions: Vec<(usize, usize)> = findings.iter().map(|f| (f.line, f.column)).collect();
    assert_eq!(positions, vec![(13, 3), (21, 3), (24, 3)]);

    let expected = fixtures_path().join("widget").join("widget.ts");
    assert!(findings.iter().all(|f| f.file == expected));
}

#[test]
fn test_every_finding_is_fixable() {
    let findings = check("widget/widget.ts.snapshot.json", PolicyStyle::Both);
    assert!(findings.iter().all(Finding::is_fixable));
}

#[test]
fn test_clean_fixture_has_no_findings() {
    for style in [
        PolicyStyle::Either,
        PolicyStyle::TagOnly,
        PolicyStyle::Both,
    ] {
        assert!(
            check("clean/clean.ts.snapshot.json", style).is_empty(),
            "clean fixture should pass under {}",
            style
        );
    }
}

// ============================================================================
// Heuristic fallback without type information
// ============================================================================

#[test]
fn test_heuristic_fixture_has_no_types() {
    let unit = load("heuristic/shapes.ts.snapshot.yaml");
    assert!(unit.types.is_none());
    assert_eq!(unit.member_count(), 5);
}

#[test]
fn test_heuristic_skips_constructor_and_static() {
    let findings = check("heuristic/shapes.ts.snapshot.yaml", PolicyStyle::Either);

    assert_eq!(
        summary(&findings),
        vec![("area".to_string(), MessageKind::MissingEither)]
    );
    let source = findings[0].diagnostic.source.as_ref().unwrap();
    assert_eq!(source.name, "Shape");
    assert_eq!((findings[0].line, findings[0].column), (10, 3));
}

#[test]
fn test_heuristic_tag_only_flags_keyword() {
    let findings = check("heuristic/shapes.ts.snapshot.yaml", PolicyStyle::TagOnly);

    assert_eq!(
        summary(&findings),
        vec![
            ("area".to_string(), MessageKind::MissingTag),
            ("load".to_string(), MessageKind::MissingTag),
            ("load".to_string(), MessageKind::UnnecessaryKeyword),
        ]
    );
}

// ============================================================================
// Discovery and configuration
// ============================================================================

#[test]
fn test_discovery_finds_all_fixtures() {
    let config = Config::default();
    let files = FileFinder::new(&config)
        .find_files(&fixtures_path())
        .expect("Discovery should succeed");

    let names: Vec<String> = files
        .iter()
        .map(|f| f.path.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(
        names,
        vec![
            "clean.ts.snapshot.json",
            "shapes.ts.snapshot.yaml",
            "widget.ts.snapshot.json",
        ]
    );
}

#[test]
fn test_run_all_matches_run_unit() {
    let units = vec![
        load("widget/widget.ts.snapshot.json"),
        load("heuristic/shapes.ts.snapshot.yaml"),
    ];
    let driver = Driver::new(PolicyConfiguration::default());

    let parallel = driver.run_all(&units);
    let sequential: Vec<_> = units.iter().map(|u| driver.run_unit(u)).collect();
    assert_eq!(parallel, sequential);
}

#[test]
fn test_skip_classes_from_config() {
    let mut config = Config::default();
    config.policy = PolicyConfiguration::new(PolicyStyle::Both).with_prefer(DeclarationForm::Keyword);
    config.skip_classes = vec!["Wid*".to_string()];

    let report = Driver::from_config(&config).run_unit(&load("widget/widget.ts.snapshot.json"));
    assert!(report.findings.is_empty());
}
