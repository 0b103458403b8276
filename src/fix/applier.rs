use super::{FileEditor, Fix, UndoScript};
use colored::Colorize;
use dialoguer::{theme::ColorfulTheme, Confirm};
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;
use tracing::warn;

/// One fix waiting to be applied, with the line shown to the user
pub struct PendingFix<'a> {
    pub label: String,
    pub fix: &'a Fix,
}

/// Every pending fix for one file
pub struct FileFixes<'a> {
    pub path: PathBuf,

    /// Text the fixes were computed against
    pub expected_source: &'a str,

    pub fixes: Vec<PendingFix<'a>>,
}

/// Totals for one `--fix` run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplySummary {
    pub files_changed: usize,
    pub fixes_applied: usize,
    pub fixes_skipped: usize,
    pub stale_files: usize,
}

/// Applies fixes to files on disk, optionally confirming each file
pub struct FixApplier {
    interactive: bool,
    dry_run: bool,
    undo_script_path: Option<PathBuf>,
    editor: FileEditor,
}

impl FixApplier {
    pub fn new(interactive: bool, dry_run: bool, undo_script_path: Option<PathBuf>) -> Self {
        Self {
            interactive,
            dry_run,
            undo_script_path,
            editor: FileEditor::new(),
        }
    }

    pub fn apply(&self, files: &[FileFixes]) -> Result<ApplySummary> {
        let total: usize = files.iter().map(|f| f.fixes.len()).sum();
        let mut summary = ApplySummary::default();

        if total == 0 {
            eprintln!("{}", "No fixable findings.".green());
            return Ok(summary);
        }

        if self.dry_run {
            eprintln!();
            eprintln!("{}", "Dry run - would apply:".yellow().bold());
            for file in files.iter().filter(|f| !f.fixes.is_empty()) {
                eprintln!("  {}", file.path.display().to_string().white().bold());
                for pending in &file.fixes {
                    eprintln!("    {}", pending.label);
                }
            }
            eprintln!();
            eprintln!("{}", format!("Total: {} fixes would be applied", total).dimmed());
            return Ok(summary);
        }

        let mut undo_script = self.undo_script_path.as_ref().map(|_| UndoScript::new());

        eprintln!();
        eprintln!("{}", "Applying fixes...".cyan().bold());

        for file in files.iter().filter(|f| !f.fixes.is_empty()) {
            if !self.editor.is_current(&file.path, file.expected_source)? {
                warn!(
                    "{} changed since the snapshot was taken, skipping",
                    file.path.display()
                );
                eprintln!(
                    "  {} Skipped {} (file changed since snapshot)",
                    "✗".red(),
                    file.path.display()
                );
                summary.stale_files += 1;
                summary.fixes_skipped += file.fixes.len();
                continue;
            }

            if self.interactive && !self.confirm(file)? {
                summary.fixes_skipped += file.fixes.len();
                continue;
            }

            if let Some(script) = undo_script.as_mut() {
                script.record_file_state(&file.path, file.expected_source);
            }

            let fixes: Vec<&Fix> = file.fixes.iter().map(|p| p.fix).collect();
            let outcome = self.editor.write_fixes(&file.path, &fixes)?;

            summary.fixes_applied += outcome.applied;
            summary.fixes_skipped += outcome.skipped;
            if outcome.changed() {
                summary.files_changed += 1;
            }
            eprintln!(
                "  {} {}: {} applied{}",
                "✓".green(),
                file.path.display(),
                outcome.applied,
                if outcome.skipped > 0 {
                    format!(", {} skipped (overlapping)", outcome.skipped)
                } else {
                    String::new()
                }
            );
        }

        if let (Some(script), Some(path)) = (undo_script, &self.undo_script_path) {
            script.write(path)?;
            eprintln!();
            eprintln!("{} Undo script saved to: {}", "→".dimmed(), path.display());
        }

        Ok(summary)
    }

    fn confirm(&self, file: &FileFixes) -> Result<bool> {
        eprintln!();
        eprintln!("{}", file.path.display().to_string().white().bold());
        for pending in &file.fixes {
            eprintln!("    {}", pending.label);
        }

        Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!(
                "Apply {} fixes to {}?",
                file.fixes.len(),
                file.path.display()
            ))
            .default(false)
            .interact()
            .into_diagnostic()
    }
}
