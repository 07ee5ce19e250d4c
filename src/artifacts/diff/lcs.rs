//! LCS edit scripts
//!
//! `dp[i][j]` holds the length of the longest common subsequence of
//! `a[..i]` and `b[..j]`. Backtracking starts at `(n, m)`: equal elements
//! are kept, otherwise the step that keeps the larger score wins, and on a
//! tie the element of `a` is dropped first (it ends up after the insertions
//! once the script is reversed).

use derive_new::new;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit<T> {
    /// Present on both sides; 1-based line numbers in `a` and `b`
    Equal { a_line: usize, b_line: usize, value: T },
    /// Only in `a`
    Delete { a_line: usize, value: T },
    /// Only in `b`
    Insert { b_line: usize, value: T },
}

impl<T> Edit<T> {
    pub fn value(&self) -> &T {
        match self {
            Edit::Equal { value, .. } | Edit::Delete { value, .. } | Edit::Insert { value, .. } => {
                value
            }
        }
    }

    pub fn is_equal(&self) -> bool {
        matches!(self, Edit::Equal { .. })
    }
}

pub trait DiffAlgorithm<T> {
    type Table;

    fn compute_table(&self) -> Self::Table;
    fn diff(&self) -> Vec<Edit<T>>;
}

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct LcsDiff<'d, T> {
    a: &'d [T],
    b: &'d [T],
}

impl<T: Eq + Clone> DiffAlgorithm<T> for LcsDiff<'_, T> {
    type Table = Vec<Vec<usize>>;

    fn compute_table(&self) -> Self::Table {
        let (n, m) = (self.a.len(), self.b.len());
        let mut dp = vec![vec![0; m + 1]; n + 1];

        for i in 1..=n {
            for j in 1..=m {
                dp[i][j] = if self.a[i - 1] == self.b[j - 1] {
                    dp[i - 1][j - 1] + 1
                } else {
                    dp[i - 1][j].max(dp[i][j - 1])
                };
            }
        }

        dp
    }

    fn diff(&self) -> Vec<Edit<T>> {
        let dp = self.compute_table();
        let (mut i, mut j) = (self.a.len(), self.b.len());
        let mut edits = Vec::with_capacity(i + j);

        while i > 0 && j > 0 {
            if self.a[i - 1] == self.b[j - 1] {
                edits.push(Edit::Equal {
                    a_line: i,
                    b_line: j,
                    value: self.a[i - 1].clone(),
                });
                i -= 1;
                j -= 1;
            } else if dp[i - 1][j] >= dp[i][j - 1] {
                edits.push(Edit::Delete {
                    a_line: i,
                    value: self.a[i - 1].clone(),
                });
                i -= 1;
            } else {
                edits.push(Edit::Insert {
                    b_line: j,
                    value: self.b[j - 1].clone(),
                });
                j -= 1;
            }
        }

        for i in (1..=i).rev() {
            edits.push(Edit::Delete {
                a_line: i,
                value: self.a[i - 1].clone(),
            });
        }
        for j in (1..=j).rev() {
            edits.push(Edit::Insert {
                b_line: j,
                value: self.b[j - 1].clone(),
            });
        }

        edits.reverse();
        edits
    }
}

/// Counts of removed and added lines in an edit script.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffStats {
    pub deletions: usize,
    pub additions: usize,
}

impl DiffStats {
    pub fn of<T>(edits: &[Edit<T>]) -> Self {
        edits.iter().fold(DiffStats::default(), |mut stats, edit| {
            match edit {
                Edit::Delete { .. } => stats.deletions += 1,
                Edit::Insert { .. } => stats.additions += 1,
                Edit::Equal { .. } => {}
            }
            stats
        })
    }
}
