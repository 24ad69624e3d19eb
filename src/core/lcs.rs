//! Longest-common-subsequence table and edit-op backtracking.

use crate::metrics::{self, Phase};

/// Dynamic-programming table of LCS lengths.
///
/// `get(i, j)` is the LCS length of the first `i` base lines and the first
/// `j` modified lines. Stored row-major in a single allocation of
/// `(rows + 1) * (cols + 1)` cells.
#[derive(Debug, Clone)]
pub struct LcsTable {
    rows: usize,
    cols: usize,
    cells: Vec<u32>,
}

impl LcsTable {
    /// Build the table for `base` (m lines) against `modified` (n lines).
    ///
    /// O(m·n) time and space. Callers guard against large inputs upstream.
    pub fn build<T: PartialEq>(base: &[T], modified: &[T]) -> Self {
        let _timer = metrics::Timer::start(Phase::LcsTable);

        let rows = base.len();
        let cols = modified.len();
        let width = cols + 1;
        let mut cells = vec![0u32; (rows + 1) * width];

        for i in 1..=rows {
            for j in 1..=cols {
                cells[i * width + j] = if base[i - 1] == modified[j - 1] {
                    cells[(i - 1) * width + (j - 1)] + 1
                } else {
                    cells[(i - 1) * width + j].max(cells[i * width + (j - 1)])
                };
            }
        }

        Self { rows, cols, cells }
    }

    /// LCS length of the first `i` base lines and first `j` modified lines.
    ///
    /// # Panics
    ///
    /// Panics if `i > m` or `j > n`.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> u32 {
        assert!(i <= self.rows && j <= self.cols, "lcs index out of range");
        self.cells[i * (self.cols + 1) + j]
    }

    /// Length of the full longest common subsequence.
    pub fn lcs_len(&self) -> usize {
        self.get(self.rows, self.cols) as usize
    }

    /// `(m, n)`: number of base and modified lines the table was built over.
    pub fn dims(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }
}

/// One step of the edit script. Line numbers are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOp {
    /// Line present on both sides.
    Equal {
        /// Base line number.
        old: usize,
        /// Modified line number.
        new: usize,
    },
    /// Line only in the modified side.
    Added {
        /// Modified line number.
        new: usize,
    },
    /// Line only in the base side.
    Removed {
        /// Base line number.
        old: usize,
    },
}

/// Walk `table` from `(m, n)` back to `(0, 0)` and return the edit script in
/// forward order.
///
/// When both neighbouring cells are equal the walk prefers `Added`, so within
/// a changed region removals come out ahead of additions.
pub fn backtrack<T: PartialEq>(table: &LcsTable, base: &[T], modified: &[T]) -> Vec<EditOp> {
    let _timer = metrics::Timer::start(Phase::Backtrack);
    debug_assert_eq!(table.dims(), (base.len(), modified.len()));

    let mut ops = Vec::with_capacity(base.len().max(modified.len()));
    let mut i = base.len();
    let mut j = modified.len();

    while i > 0 || j > 0 {
        if i > 0 && j > 0 && base[i - 1] == modified[j - 1] {
            ops.push(EditOp::Equal { old: i, new: j });
            i -= 1;
            j -= 1;
        } else if j > 0 && (i == 0 || table.get(i, j - 1) >= table.get(i - 1, j)) {
            ops.push(EditOp::Added { new: j });
            j -= 1;
        } else {
            ops.push(EditOp::Removed { old: i });
            i -= 1;
        }
    }

    ops.reverse();
    ops
}

/// Build the table and backtrack in one call.
pub fn edit_ops<T: PartialEq>(base: &[T], modified: &[T]) -> Vec<EditOp> {
    let table = LcsTable::build(base, modified);
    backtrack(&table, base, modified)
}
