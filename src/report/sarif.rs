use super::display_path;
use crate::analysis::{MessageKind, Severity};
use crate::host::Finding;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;

/// SARIF reporter for CI/CD integration (GitHub, Azure DevOps, etc.)
pub struct SarifReporter;

impl SarifReporter {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, findings: &[Finding]) -> Result<String> {
        let sarif = SarifReport::from_findings(findings);
        let mut json = serde_json::to_string_pretty(&sarif).into_diagnostic()?;
        json.push('\n');
        Ok(json)
    }
}

impl Default for SarifReporter {
    fn default() -> Self {
        Self::new()
    }
}

/// SARIF 2.1.0 format
#[derive(Serialize)]
struct SarifReport {
    #[serde(rename = "$schema")]
    schema: &'static str,
    version: &'static str,
    runs: Vec<SarifRun>,
}

#[derive(Serialize)]
struct SarifRun {
    tool: SarifTool,
    results: Vec<SarifResult>,
}

#[derive(Serialize)]
struct SarifTool {
    driver: SarifDriver,
}

#[derive(Serialize)]
struct SarifDriver {
    name: &'static str,
    version: &'static str,
    rules: Vec<SarifRule>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifRule {
    id: &'static str,
    name: &'static str,
    short_description: SarifMessage,
    default_configuration: SarifConfiguration,
}

#[derive(Serialize)]
struct SarifConfiguration {
    level: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifResult {
    rule_id: &'static str,
    rule_index: usize,
    level: &'static str,
    message: SarifMessage,
    locations: Vec<SarifLocation>,
}

#[derive(Serialize)]
struct SarifMessage {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifLocation {
    physical_location: SarifPhysicalLocation,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifPhysicalLocation {
    artifact_location: SarifArtifactLocation,
    region: SarifRegion,
}

#[derive(Serialize)]
struct SarifArtifactLocation {
    uri: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifRegion {
    start_line: usize,
    start_column: usize,
}

fn sarif_level(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "error",
        Severity::Warning => "warning",
        Severity::Info => "note",
    }
}

impl SarifReport {
    fn from_findings(findings: &[Finding]) -> Self {
        let rules = MessageKind::ALL
            .iter()
            .map(|kind| SarifRule {
                id: kind.code(),
                name: kind.as_str(),
                short_description: SarifMessage {
                    text: kind.description().to_string(),
                },
                default_configuration: SarifConfiguration {
                    level: sarif_level(kind.default_severity()),
                },
            })
            .collect();

        let results = findings
            .iter()
            .map(|finding| {
                let diagnostic = &finding.diagnostic;
                SarifResult {
                    rule_id: diagnostic.message_kind.code(),
                    rule_index: MessageKind::ALL
                        .iter()
                        .position(|k| *k == diagnostic.message_kind)
                        .unwrap_or_default(),
                    level: sarif_level(diagnostic.severity),
                    message: SarifMessage {
                        text: diagnostic.message(),
                    },
                    locations: vec![SarifLocation {
                        physical_location: SarifPhysicalLocation {
                            artifact_location: SarifArtifactLocation {
                                uri: display_path(&finding.file),
                            },
                            region: SarifRegion {
                                start_line: finding.line,
                                start_column: finding.column,
                            },
                        },
                    }],
                }
            })
            .collect();

        SarifReport {
            schema: "https://raw.githubusercontent.com/oasis-tcs/sarif-spec/master/Schemata/sarif-schema-2.1.0.json",
            version: "2.1.0",
            runs: vec![SarifRun {
                tool: SarifTool {
                    driver: SarifDriver {
                        name: "overridelint",
                        version: env!("CARGO_PKG_VERSION"),
                        rules,
                    },
                },
                results,
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Diagnostic;
    use crate::syntax::TextRange;
    use std::path::PathBuf;

    #[test]
    fn test_sarif_document() {
        let findings = vec![Finding {
            file: PathBuf::from("src/widget.ts"),
            line: 7,
            column: 5,
            diagnostic: Diagnostic::new(
                MessageKind::UnnecessaryKeyword,
                "size",
                "getter",
                TextRange::new(0, 4),
            )
            .with_class("Widget"),
        }];

        let json = SarifReporter::new().render(&findings).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["version"], "2.1.0");
        let run = &value["runs"][0];
        assert_eq!(run["tool"]["driver"]["rules"].as_array().unwrap().len(), 6);
        assert_eq!(run["tool"]["driver"]["rules"][0]["id"], "OVR001");

        let result = &run["results"][0];
        assert_eq!(result["ruleId"], "OVR006");
        assert_eq!(result["ruleIndex"], 5);
        assert_eq!(result["level"], "warning");
        let region = &result["locations"][0]["physicalLocation"]["region"];
        assert_eq!(region["startLine"], 7);
        assert_eq!(region["startColumn"], 5);
        assert_eq!(
            result["locations"][0]["physicalLocation"]["artifactLocation"]["uri"],
            "src/widget.ts"
        );
    }
}
