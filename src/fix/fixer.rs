// Fixer: groups edits into fixes and applies many fixes to one file

use super::{splice, Edit, Fix};
use tracing::debug;

/// Compose the edits of one diagnostic into a fix
///
/// Edits are sorted by offset; insertions at the same offset are merged in
/// the order given. Returns `None` when there is nothing to do or when two
/// edits overlap.
pub fn build_fix(edits: Vec<Edit>) -> Option<Fix> {
    if edits.is_empty() {
        return None;
    }

    let mut edits = edits;
    edits.sort_by_key(|edit| (edit.range.start, edit.range.end));

    let mut merged: Vec<Edit> = Vec::with_capacity(edits.len());
    for edit in edits {
        if let Some(last) = merged.last_mut() {
            if last.is_insertion() && edit.is_insertion() && last.range.start == edit.range.start {
                last.replacement.push_str(&edit.replacement);
                continue;
            }
        }
        merged.push(edit);
    }

    for (i, a) in merged.iter().enumerate() {
        if let Some(b) = merged[i + 1..].iter().find(|b| a.range.overlaps(&b.range)) {
            debug!("Dropping fix: edits {} and {} overlap", a.range, b.range);
            return None;
        }
    }

    Some(Fix::from_sorted(merged))
}

/// Result of applying several fixes to one text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixOutcome {
    pub output: String,
    pub applied: usize,
    pub skipped: usize,
}

impl FixOutcome {
    pub fn changed(&self) -> bool {
        self.applied > 0
    }
}

/// Apply fixes in order, skipping any that collide with one already taken
/// or that do not fit the text
pub fn apply_fixes<'f, I>(text: &str, fixes: I) -> FixOutcome
where
    I: IntoIterator<Item = &'f Fix>,
{
    let mut accepted: Vec<&Fix> = Vec::new();
    let mut skipped = 0;

    for fix in fixes {
        if let Some(err) = fix.edits().iter().find_map(|edit| edit.validate(text).err()) {
            debug!("Skipping fix at {}: {}", fix.span(), err);
            skipped += 1;
            continue;
        }
        if accepted.iter().any(|taken| taken.conflicts_with(fix)) {
            debug!("Skipping fix at {}: overlaps an earlier fix", fix.span());
            skipped += 1;
            continue;
        }
        accepted.push(fix);
    }

    let mut edits: Vec<Edit> = accepted
        .iter()
        .flat_map(|fix| fix.edits().iter().cloned())
        .collect();
    edits.sort_by_key(|edit| (edit.range.start, edit.range.end));

    FixOutcome {
        output: splice(text, &edits),
        applied: accepted.len(),
        skipped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::TextRange;

    #[test]
    fn test_empty_edits_give_no_fix() {
        assert!(build_fix(Vec::new()).is_none());
    }

    #[test]
    fn test_same_offset_insertions_merge_in_order() {
        let fix = build_fix(vec![
            Edit::insert(4, "/** @override */\n    "),
            Edit::insert(4, "override "),
        ])
        .unwrap();
        assert_eq!(fix.edits().len(), 1);
        assert_eq!(
            fix.apply("    run() {}").unwrap(),
            "    /** @override */\n    override run() {}"
        );
    }

    #[test]
    fn test_overlapping_edits_rejected() {
        let fix = build_fix(vec![
            Edit::delete(TextRange::new(0, 5)),
            Edit::replace(TextRange::new(3, 8), "x"),
        ]);
        assert!(fix.is_none());
    }

    #[test]
    fn test_apply_fixes_skips_conflicts() {
        let text = "abcdefghij";
        let first = build_fix(vec![Edit::delete(TextRange::new(0, 3))]).unwrap();
        let clash = build_fix(vec![Edit::delete(TextRange::new(2, 4))]).unwrap();
        let later = build_fix(vec![Edit::insert(8, "-")]).unwrap();
        let broken = build_fix(vec![Edit::delete(TextRange::new(9, 30))]).unwrap();

        let outcome = apply_fixes(text, [&first, &clash, &later, &broken]);
        assert_eq!(outcome.output, "defgh-ij");
        assert_eq!(outcome.applied, 2);
        assert_eq!(outcome.skipped, 2);
        assert!(outcome.changed());
    }
}
