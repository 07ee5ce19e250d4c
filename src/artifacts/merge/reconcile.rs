use crate::artifacts::diff::lcs::{DiffAlgorithm, Edit, LcsDiff};
use derive_new::new;

pub const CONFLICT_START: &str = "<<<<<<<";
pub const CONFLICT_SEPARATOR: &str = "=======";
pub const CONFLICT_END: &str = ">>>>>>>";

/// Names written after the opening and closing conflict markers.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct ConflictLabels {
    ours: String,
    theirs: String,
}

impl ConflictLabels {
    /// `HEAD` against the incoming branch.
    pub fn merge(branch: &str) -> Self {
        Self::new("HEAD".to_string(), branch.to_string())
    }

    /// The working tree against a stash entry.
    pub fn stash(tag: &str) -> Self {
        Self::new("CURRENT".to_string(), tag.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciled {
    pub lines: Vec<String>,
    /// Whether at least one conflict block was written
    pub conflicted: bool,
}

impl Reconciled {
    /// File content: every line terminated by a newline.
    pub fn to_content(&self) -> String {
        self.lines.iter().map(|line| format!("{}\n", line)).collect()
    }
}

/// Merge `ours` and `theirs` line by line.
///
/// Runs of non-common lines are split by side, keeping their original
/// order. A run with lines from both sides becomes a conflict block, any
/// other run is copied through.
pub fn reconcile(ours: &[String], theirs: &[String], labels: &ConflictLabels) -> Reconciled {
    let edits = LcsDiff::new(ours, theirs).diff();
    let mut lines = Vec::with_capacity(edits.len());
    let mut conflicted = false;

    let mut edits = edits.into_iter().peekable();
    while let Some(edit) = edits.next() {
        let mut block = match edit {
            Edit::Equal { value, .. } => {
                lines.push(value);
                continue;
            }
            other => vec![other],
        };
        while let Some(next) = edits.next_if(|edit| !edit.is_equal()) {
            block.push(next);
        }

        let (ours_block, theirs_block): (Vec<_>, Vec<_>) = block
            .into_iter()
            .partition(|edit| matches!(edit, Edit::Delete { .. }));
        let ours_block = ours_block.into_iter().map(|edit| edit.value().clone());
        let theirs_block = theirs_block.into_iter().map(|edit| edit.value().clone());

        if ours_block.len() > 0 && theirs_block.len() > 0 {
            conflicted = true;
            lines.push(format!("{} {}", CONFLICT_START, labels.ours));
            lines.extend(ours_block);
            lines.push(CONFLICT_SEPARATOR.to_string());
            lines.extend(theirs_block);
            lines.push(format!("{} {}", CONFLICT_END, labels.theirs));
        } else {
            lines.extend(ours_block);
            lines.extend(theirs_block);
        }
    }

    Reconciled { lines, conflicted }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn lines(text: &str) -> Vec<String> {
        text.lines().map(str::to_string).collect()
    }

    #[test]
    fn diverging_lines_become_a_conflict_block() {
        let merged = reconcile(
            &lines("title\nmaster line"),
            &lines("title\nfeature line"),
            &ConflictLabels::merge("b1"),
        );

        assert!(merged.conflicted);
        assert_eq!(
            merged.to_content(),
            "title\n<<<<<<< HEAD\nmaster line\n=======\nfeature line\n>>>>>>> b1\n"
        );
    }

    #[test]
    fn one_sided_additions_pass_through() {
        let merged = reconcile(
            &lines("a\nb"),
            &lines("a\nb\nc"),
            &ConflictLabels::merge("topic"),
        );

        assert!(!merged.conflicted);
        assert_eq!(merged.lines, lines("a\nb\nc"));
    }

    #[test]
    fn stash_labels_name_the_entry() {
        let merged = reconcile(&lines("x"), &lines("y"), &ConflictLabels::stash("stash{0}"));

        assert_eq!(merged.lines.first().map(String::as_str), Some("<<<<<<< CURRENT"));
        assert_eq!(merged.lines.last().map(String::as_str), Some(">>>>>>> stash{0}"));
    }

    proptest! {
        #[test]
        fn identical_inputs_never_conflict(a in proptest::collection::vec("[a-c]{1,3}", 0..20)) {
            let merged = reconcile(&a, &a, &ConflictLabels::merge("other"));

            prop_assert!(!merged.conflicted);
            prop_assert_eq!(merged.lines, a);
        }
    }
}
