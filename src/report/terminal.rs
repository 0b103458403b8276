use super::display_path;
use crate::analysis::{MessageKind, Severity};
use crate::host::Finding;
use colored::Colorize;
use std::collections::BTreeMap;
use std::fmt::Write;
use std::path::Path;

/// Terminal reporter with colored output
pub struct TerminalReporter {
    /// Mark findings that `--fix` can resolve
    show_fix_hints: bool,
}

impl TerminalReporter {
    pub fn new() -> Self {
        Self {
            show_fix_hints: true,
        }
    }

    pub fn with_fix_hints(mut self, show: bool) -> Self {
        self.show_fix_hints = show;
        self
    }

    pub fn render(&self, findings: &[Finding], files_checked: usize) -> String {
        let mut out = String::new();

        if findings.is_empty() {
            let _ = writeln!(
                out,
                "{} ({} files checked)",
                "No override issues found!".green().bold(),
                files_checked
            );
            return out;
        }

        let mut by_file: BTreeMap<&Path, Vec<&Finding>> = BTreeMap::new();
        for finding in findings {
            by_file.entry(finding.file.as_path()).or_default().push(finding);
        }

        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "{}",
            format!("Found {} override issues:", findings.len())
                .yellow()
                .bold()
        );
        let _ = writeln!(out);

        for (file, items) in &by_file {
            let _ = writeln!(out, "{}", display_path(file).cyan().bold());
            for item in items {
                self.write_item(&mut out, item);
            }
            let _ = writeln!(out);
        }

        self.write_summary(&mut out, findings, files_checked);
        out
    }

    fn write_item(&self, out: &mut String, item: &Finding) {
        let diagnostic = &item.diagnostic;
        let severity = match diagnostic.severity {
            Severity::Error => "error".red().bold(),
            Severity::Warning => "warning".yellow().bold(),
            Severity::Info => "info".blue().bold(),
        };
        let location = format!("{}:{}", item.line, item.column);
        let fix_badge = if self.show_fix_hints && item.is_fixable() {
            format!(" {}", "[fixable]".green())
        } else {
            String::new()
        };

        let _ = writeln!(
            out,
            "  {} {} [{}] {}{}",
            location.dimmed(),
            severity,
            diagnostic.message_kind.code().dimmed(),
            diagnostic.message(),
            fix_badge
        );
        let _ = writeln!(
            out,
            "    {} in class '{}'",
            "→".dimmed(),
            diagnostic.class_name.white()
        );
    }

    fn write_summary(&self, out: &mut String, findings: &[Finding], files_checked: usize) {
        let mut by_kind: BTreeMap<MessageKind, usize> = BTreeMap::new();
        for finding in findings {
            *by_kind.entry(finding.diagnostic.message_kind).or_default() += 1;
        }
        let fixable = findings.iter().filter(|f| f.is_fixable()).count();

        let _ = writeln!(out, "{}", "─".repeat(60).dimmed());
        let parts: Vec<String> = by_kind
            .iter()
            .map(|(kind, count)| format!("{} {}", count, kind))
            .collect();
        let _ = writeln!(
            out,
            "Summary: {} issues in {} files checked ({})",
            findings.len(),
            files_checked,
            parts.join(", ")
        );

        if self.show_fix_hints && fixable > 0 {
            let _ = writeln!(out);
            let _ = writeln!(
                out,
                "{}",
                format!("Tip: {} issues can be fixed with --fix", fixable).dimmed()
            );
        }
    }
}

impl Default for TerminalReporter {
    fn default() -> Self {
        Self::new()
    }
}
