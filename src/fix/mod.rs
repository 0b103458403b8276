//! Fix edits and their application
//!
//! The position calculator turns a member into [`Edit`]s, the fixer groups
//! them into one [`Fix`] per diagnostic, and the applier, editor and undo
//! script write the result back to disk.

mod applier;
mod editor;
mod fixer;
pub mod positions;
mod undo;

pub use applier::{ApplySummary, FileFixes, FixApplier, PendingFix};
pub use editor::FileEditor;
pub use fixer::{apply_fixes, build_fix, FixOutcome};
pub use undo::UndoScript;

use crate::syntax::TextRange;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when a fix does not fit the text it is applied to
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FixError {
    #[error("Edit range {range} is outside the text ({len} bytes)")]
    OutOfBounds { range: TextRange, len: usize },

    #[error("Edit boundary {0} is not on a character boundary")]
    NotCharBoundary(usize),

    #[error("Edits {0} and {1} overlap")]
    Overlap(TextRange, TextRange),
}

/// Replace the text at `range` with `replacement`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edit {
    pub range: TextRange,
    pub replacement: String,
}

impl Edit {
    pub fn insert(offset: usize, text: impl Into<String>) -> Self {
        Self {
            range: TextRange::empty(offset),
            replacement: text.into(),
        }
    }

    pub fn delete(range: TextRange) -> Self {
        Self {
            range,
            replacement: String::new(),
        }
    }

    pub fn replace(range: TextRange, text: impl Into<String>) -> Self {
        Self {
            range,
            replacement: text.into(),
        }
    }

    pub fn is_insertion(&self) -> bool {
        self.range.is_empty()
    }

    /// Check the edit against text of length `text.len()`
    pub fn validate(&self, text: &str) -> Result<(), FixError> {
        if self.range.start > self.range.end || self.range.end > text.len() {
            return Err(FixError::OutOfBounds {
                range: self.range,
                len: text.len(),
            });
        }
        for offset in [self.range.start, self.range.end] {
            if !text.is_char_boundary(offset) {
                return Err(FixError::NotCharBoundary(offset));
            }
        }
        Ok(())
    }
}

/// Non-overlapping edits sorted by offset, applied together
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fix {
    edits: Vec<Edit>,
}

impl Fix {
    /// Callers must hand in sorted, non-overlapping edits; see [`build_fix`]
    pub(crate) fn from_sorted(edits: Vec<Edit>) -> Self {
        Self { edits }
    }

    pub fn edits(&self) -> &[Edit] {
        &self.edits
    }

    /// Smallest range covering every edit
    pub fn span(&self) -> TextRange {
        let start = self.edits.first().map(|e| e.range.start).unwrap_or(0);
        let end = self.edits.iter().map(|e| e.range.end).max().unwrap_or(start);
        TextRange::new(start, end)
    }

    /// Whether any edit of `self` collides with any edit of `other`
    pub fn conflicts_with(&self, other: &Fix) -> bool {
        self.edits
            .iter()
            .any(|a| other.edits.iter().any(|b| a.range.overlaps(&b.range)))
    }

    /// Apply every edit to `text` in one pass
    pub fn apply(&self, text: &str) -> Result<String, FixError> {
        for edit in &self.edits {
            edit.validate(text)?;
        }
        // Deserialized fixes bypass `build_fix`
        for pair in self.edits.windows(2) {
            if pair[0].range.overlaps(&pair[1].range) || pair[0].range.start > pair[1].range.start {
                return Err(FixError::Overlap(pair[0].range, pair[1].range));
            }
        }
        Ok(splice(text, &self.edits))
    }
}

/// Apply sorted, validated, non-overlapping edits back to front
pub(crate) fn splice(text: &str, edits: &[Edit]) -> String {
    let mut output = text.to_string();
    for edit in edits.iter().rev() {
        output.replace_range(edit.range.start..edit.range.end, &edit.replacement);
    }
    output
}
