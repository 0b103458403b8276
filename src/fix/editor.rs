use super::{apply_fixes, Fix, FixOutcome};
use miette::{IntoDiagnostic, Result, WrapErr};
use std::path::Path;

/// Reads source files and writes fixed text back
pub struct FileEditor;

impl FileEditor {
    pub fn new() -> Self {
        Self
    }

    pub fn read(&self, path: &Path) -> Result<String> {
        std::fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to read {}", path.display()))
    }

    /// Whether the file on disk still holds `expected`
    pub fn is_current(&self, path: &Path, expected: &str) -> Result<bool> {
        Ok(self.read(path)? == expected)
    }

    /// Apply `fixes` to the file and write it back if anything changed
    pub fn write_fixes(&self, path: &Path, fixes: &[&Fix]) -> Result<FixOutcome> {
        let contents = self.read(path)?;
        let outcome = apply_fixes(&contents, fixes.iter().copied());

        if outcome.changed() {
            std::fs::write(path, &outcome.output)
                .into_diagnostic()
                .wrap_err_with(|| format!("Failed to write {}", path.display()))?;
        }

        Ok(outcome)
    }
}

impl Default for FileEditor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fix::{build_fix, Edit};
    use crate::syntax::TextRange;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_write_fixes() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "  override run() {{}}").unwrap();

        let fix = build_fix(vec![Edit::delete(TextRange::new(2, 11))]).unwrap();
        let editor = FileEditor::new();
        let outcome = editor.write_fixes(file.path(), &[&fix]).unwrap();

        assert_eq!(outcome.applied, 1);
        let contents = std::fs::read_to_string(file.path()).unwrap();
        assert_eq!(contents, "  run() {}");
    }

    #[test]
    fn test_is_current() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "class A {{}}").unwrap();

        let editor = FileEditor::new();
        assert!(editor.is_current(file.path(), "class A {}").unwrap());
        assert!(!editor.is_current(file.path(), "class B {}").unwrap());
    }

    #[test]
    fn test_missing_file_is_error() {
        let editor = FileEditor::new();
        assert!(editor.read(Path::new("/nonexistent/overridelint/file.ts")).is_err());
    }
}
