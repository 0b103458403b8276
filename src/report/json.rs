use super::display_path;
use crate::analysis::MessageKind;
use crate::fix::Edit;
use crate::host::Finding;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::collections::BTreeMap;

/// JSON reporter for programmatic output
pub struct JsonReporter;

impl JsonReporter {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, findings: &[Finding], files_checked: usize) -> Result<String> {
        let report = JsonReport::from_findings(findings, files_checked);
        let mut json = serde_json::to_string_pretty(&report).into_diagnostic()?;
        json.push('\n');
        Ok(json)
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    version: &'static str,
    files_checked: usize,
    total_issues: usize,
    issues: Vec<JsonIssue<'a>>,
    summary: JsonSummary,
}

#[derive(Serialize)]
struct JsonIssue<'a> {
    code: &'static str,
    kind: MessageKind,
    severity: &'static str,
    message: String,
    file: String,
    line: usize,
    column: usize,
    member: JsonMember<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    overrides: Option<JsonSource<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fix: Option<&'a [Edit]>,
}

#[derive(Serialize)]
struct JsonMember<'a> {
    name: &'a str,
    kind: &'static str,
    class: &'a str,
}

#[derive(Serialize)]
struct JsonSource<'a> {
    kind: &'static str,
    name: &'a str,
}

#[derive(Serialize)]
struct JsonSummary {
    fixable: usize,
    by_kind: BTreeMap<&'static str, usize>,
}

impl<'a> JsonReport<'a> {
    fn from_findings(findings: &'a [Finding], files_checked: usize) -> Self {
        let mut by_kind = BTreeMap::new();
        let mut fixable = 0;

        let issues = findings
            .iter()
            .map(|finding| {
                let diagnostic = &finding.diagnostic;
                *by_kind.entry(diagnostic.message_kind.as_str()).or_insert(0) += 1;
                if finding.is_fixable() {
                    fixable += 1;
                }

                JsonIssue {
                    code: diagnostic.message_kind.code(),
                    kind: diagnostic.message_kind,
                    severity: diagnostic.severity.as_str(),
                    message: diagnostic.message(),
                    file: display_path(&finding.file),
                    line: finding.line,
                    column: finding.column,
                    member: JsonMember {
                        name: &diagnostic.member_name,
                        kind: diagnostic.member_kind_label,
                        class: &diagnostic.class_name,
                    },
                    overrides: diagnostic.source.as_ref().map(|source| JsonSource {
                        kind: source.kind.as_str(),
                        name: &source.name,
                    }),
                    fix: diagnostic.fix.as_ref().map(|fix| fix.edits()),
                }
            })
            .collect();

        Self {
            version: "1.0",
            files_checked,
            total_issues: findings.len(),
            issues,
            summary: JsonSummary { fixable, by_kind },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{Diagnostic, OverrideSource};
    use crate::fix::build_fix;
    use crate::syntax::TextRange;
    use std::path::PathBuf;

    #[test]
    fn test_json_document() {
        let findings = vec![
            Finding {
                file: PathBuf::from("src/widget.ts"),
                line: 2,
                column: 3,
                diagnostic: Diagnostic::new(
                    MessageKind::MissingKeyword,
                    "render",
                    "method",
                    TextRange::new(30, 41),
                )
                .with_class("Widget")
                .with_source(Some(OverrideSource::class("Base")))
                .with_fix(build_fix(vec![Edit::insert(30, "override ")])),
            },
            Finding {
                file: PathBuf::from("src/widget.ts"),
                line: 5,
                column: 3,
                diagnostic: Diagnostic::new(
                    MessageKind::UnnecessaryTag,
                    "size",
                    "getter",
                    TextRange::new(50, 70),
                )
                .with_class("Widget"),
            },
        ];

        let json = JsonReporter::new().render(&findings, 1).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["total_issues"], 2);
        assert_eq!(value["summary"]["fixable"], 1);
        assert_eq!(value["summary"]["by_kind"]["missing-keyword"], 1);
        assert_eq!(value["summary"]["by_kind"]["unnecessary-tag"], 1);

        let first = &value["issues"][0];
        assert_eq!(first["code"], "OVR002");
        assert_eq!(first["kind"], "missing-keyword");
        assert_eq!(first["member"]["class"], "Widget");
        assert_eq!(first["overrides"]["name"], "Base");
        assert_eq!(first["fix"][0]["replacement"], "override ");
        assert!(value["issues"][1].get("fix").is_none());
    }
}
