use miette::{IntoDiagnostic, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

const DELIMITER: &str = "OVERRIDELINT_EOF";

/// Generates a shell script restoring every file a fix run touched
pub struct UndoScript {
    /// Original file contents before fixing
    file_states: BTreeMap<PathBuf, String>,
}

impl UndoScript {
    pub fn new() -> Self {
        Self {
            file_states: BTreeMap::new(),
        }
    }

    /// Record the state of a file before modification; the first record wins
    pub fn record_file_state(&mut self, path: &Path, contents: &str) {
        self.file_states
            .entry(path.to_path_buf())
            .or_insert_with(|| contents.to_string());
    }

    pub fn render(&self) -> String {
        let mut script = String::new();

        script.push_str("#!/bin/bash\n");
        script.push_str("# overridelint undo script\n");
        script.push_str("# Run to restore files changed by --fix\n\n");
        script.push_str("set -e\n\n");

        for (file_path, contents) in &self.file_states {
            let quoted = file_path.display().to_string().replace('\'', "'\\''");

            script.push_str(&format!("# Restore {}\n", file_path.display()));
            if contents.ends_with('\n') || contents.is_empty() {
                script.push_str(&format!("cat > '{}' << '{}'\n", quoted, DELIMITER));
                script.push_str(contents);
                script.push_str(DELIMITER);
                script.push('\n');
            } else {
                // Command substitution drops the newline the heredoc adds
                script.push_str(&format!("printf '%s' \"$(cat << '{}'\n", DELIMITER));
                script.push_str(contents);
                script.push('\n');
                script.push_str(DELIMITER);
                script.push_str(&format!("\n)\" > '{}'\n", quoted));
            }
            script.push_str(&format!("echo '  Restored: {}'\n\n", quoted));
        }

        script.push_str("echo 'Done.'\n");
        script
    }

    /// Write the undo script to a file
    pub fn write(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.render()).into_diagnostic()?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(path).into_diagnostic()?.permissions();
            perms.set_mode(0o755);
            std::fs::set_permissions(path, perms).into_diagnostic()?;
        }

        Ok(())
    }

    pub fn file_count(&self) -> usize {
        self.file_states.len()
    }
}

impl Default for UndoScript {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_first_state_wins() {
        let mut script = UndoScript::new();
        script.record_file_state(Path::new("widget.ts"), "class Widget {}\n");
        script.record_file_state(Path::new("widget.ts"), "changed");

        assert_eq!(script.file_count(), 1);
        assert!(script.render().contains("class Widget {}\n"));
        assert!(!script.render().contains("changed"));
    }

    #[test]
    fn test_file_without_trailing_newline() {
        let mut script = UndoScript::new();
        script.record_file_state(Path::new("a.ts"), "class A {}");
        let rendered = script.render();
        assert!(rendered.contains("printf '%s'"));
        assert!(rendered.contains("> 'a.ts'"));
    }

    #[test]
    fn test_undo_script_write() {
        let temp_dir = TempDir::new().unwrap();
        let script_path = temp_dir.path().join("restore.sh");

        let mut script = UndoScript::new();
        script.record_file_state(Path::new("widget.ts"), "class Widget {}\n");
        script.write(&script_path).unwrap();

        let contents = std::fs::read_to_string(&script_path).unwrap();
        assert!(contents.starts_with("#!/bin/bash"));
        assert!(contents.contains("cat > 'widget.ts' << 'OVERRIDELINT_EOF'"));
    }
}
