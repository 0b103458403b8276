mod json;
mod sarif;
mod terminal;

pub use json::JsonReporter;
pub use sarif::SarifReporter;
pub use terminal::TerminalReporter;

use crate::host::Finding;
use miette::{IntoDiagnostic, Result};
use std::path::{Path, PathBuf};

/// Output format for reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportFormat {
    #[default]
    Terminal,
    Json,
    Sarif,
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "terminal" | "text" => Ok(ReportFormat::Terminal),
            "json" => Ok(ReportFormat::Json),
            "sarif" => Ok(ReportFormat::Sarif),
            other => Err(format!(
                "unknown report format '{}' (expected terminal, json or sarif)",
                other
            )),
        }
    }
}

/// Reporter for outputting override findings
pub struct Reporter {
    format: ReportFormat,
    output_path: Option<PathBuf>,
    show_fix_hints: bool,
}

impl Reporter {
    pub fn new(format: ReportFormat, output_path: Option<PathBuf>) -> Self {
        Self {
            format,
            output_path,
            show_fix_hints: true,
        }
    }

    pub fn with_fix_hints(mut self, show: bool) -> Self {
        self.show_fix_hints = show;
        self
    }

    /// Report the findings of a run over `files_checked` units
    pub fn report(&self, findings: &[Finding], files_checked: usize) -> Result<()> {
        let rendered = match self.format {
            ReportFormat::Terminal => TerminalReporter::new()
                .with_fix_hints(self.show_fix_hints)
                .render(findings, files_checked),
            ReportFormat::Json => JsonReporter::new().render(findings, files_checked)?,
            ReportFormat::Sarif => SarifReporter::new().render(findings)?,
        };

        match &self.output_path {
            Some(path) => write_report(path, &rendered),
            None => {
                print!("{}", rendered);
                Ok(())
            }
        }
    }
}

fn write_report(path: &Path, rendered: &str) -> Result<()> {
    std::fs::write(path, rendered).into_diagnostic()?;
    eprintln!("Report written to: {}", path.display());
    Ok(())
}

fn display_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
