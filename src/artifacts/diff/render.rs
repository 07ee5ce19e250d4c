//! Per-file diff listing
//!
//! ```text
//! diff --vcs a/notes.txt b/notes.txt
//! --- a/notes.txt
//! +++ b/notes.txt
//! lines: -1 +1
//! -1 +1 |   unchanged
//!  # +2 | + added
//! -2  # | - removed
//! ```
//!
//! Line numbers are padded to the width of the longer side; `#` fills the
//! column of the side a line is missing from.

use crate::artifacts::diff::diff_target::DiffTarget;
use crate::artifacts::diff::lcs::{DiffAlgorithm, DiffStats, Edit, LcsDiff};
use colored::Colorize;

/// Render the comparison of two versions of a file, or nothing when they
/// are identical.
pub fn render_file_diff(a: &DiffTarget, b: &DiffTarget) -> Vec<String> {
    if a.is_same_as(b) {
        return Vec::new();
    }

    let file = a.file().display().to_string();
    let mut output = vec![format!("diff --vcs a/{} b/{}", file, file).bold().to_string()];

    match (&a.mode, &b.mode) {
        (None, Some(_)) => output.push(format!("new file mode {}", b.pretty_mode()).bold().to_string()),
        (Some(_), None) => {
            output.push(format!("deleted file mode {}", a.pretty_mode()).bold().to_string())
        }
        (Some(old), Some(new)) if old != new => {
            output.push(format!("old mode {}", a.pretty_mode()).bold().to_string());
            output.push(format!("new mode {}", b.pretty_mode()).bold().to_string());
        }
        _ => {}
    }

    if a.oid == b.oid {
        return output;
    }

    output.push(format!("--- {}", a.diff_path("a")).bold().to_string());
    output.push(format!("+++ {}", b.diff_path("b")).bold().to_string());
    output.extend(render_lines(&a.data, &b.data));

    output
}

/// The `lines:` summary followed by one row per edit.
pub fn render_lines(a: &[String], b: &[String]) -> Vec<String> {
    let edits = LcsDiff::new(a, b).diff();
    let stats = DiffStats::of(&edits);
    let width = a.len().max(b.len()).to_string().len();
    let gap = "#".repeat(width);

    let mut output = vec![format!("lines: -{} +{}", stats.deletions, stats.additions)];

    output.extend(edits.iter().map(|edit| match edit {
        Edit::Equal {
            a_line,
            b_line,
            value,
        } => format!(
            "{} {} |   {}",
            number('-', *a_line, width),
            number('+', *b_line, width),
            value
        ),
        Edit::Delete { a_line, value } => {
            format!("{}  {} | - {}", number('-', *a_line, width), gap, value)
                .red()
                .to_string()
        }
        Edit::Insert { b_line, value } => {
            format!(" {} {} | + {}", gap, number('+', *b_line, width), value)
                .green()
                .to_string()
        }
    }));

    output
}

fn number(sign: char, line: usize, width: usize) -> String {
    format!("{}{:<width$}", sign, line, width = width)
}
