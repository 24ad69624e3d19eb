//! Hunk extraction and hunk navigation.

use serde::Serialize;

use crate::core::{DiffLine, DiffLineType, DiffResult, DiffRow};

/// A contiguous window of rows: changes plus surrounding context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffHunk {
    /// `hunk-<n>` in emission order.
    pub id: String,
    /// First row index (inclusive).
    pub start_index: usize,
    /// One past the last row index.
    pub end_index: usize,
    /// Rows in this hunk.
    pub lines: Vec<DiffRow>,
}

impl DiffHunk {
    pub(crate) fn new(
        ordinal: usize,
        start_index: usize,
        end_index: usize,
        lines: Vec<DiffRow>,
    ) -> Self {
        Self {
            id: format!("hunk-{ordinal}"),
            start_index,
            end_index,
            lines,
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the hunk has no rows.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Whether `row` falls inside `[start_index, end_index)`.
    pub fn contains_row(&self, row: usize) -> bool {
        (self.start_index..self.end_index).contains(&row)
    }

    /// Base line range as `(first line number, count)`; `(0, 0)` if the hunk
    /// has no base lines.
    pub fn old_range(&self) -> (usize, usize) {
        line_range(self.lines.iter().map(|r| &r.left))
    }

    /// Modified line range as `(first line number, count)`; `(0, 0)` if the
    /// hunk has no modified lines.
    pub fn new_range(&self) -> (usize, usize) {
        line_range(self.lines.iter().map(|r| &r.right))
    }
}

fn line_range<'a>(lines: impl Iterator<Item = &'a DiffLine>) -> (usize, usize) {
    let mut numbers = lines.filter_map(|l| l.line_number);
    match numbers.next() {
        Some(first) => (first, 1 + numbers.count()),
        None => (0, 0),
    }
}

/// Group changed rows into hunks with `context` rows on each side.
///
/// Two changed rows separated by more than `2 * context` unchanged rows land
/// in different hunks; anything closer is merged, since the context windows
/// would overlap or touch. Windows are clamped to the result bounds.
pub fn extract_hunks(result: &DiffResult, context: usize) -> Vec<DiffHunk> {
    let max_gap = context.saturating_mul(2);

    // (first changed row, last changed row) per region
    let mut regions: Vec<(usize, usize)> = Vec::new();
    for (idx, (left, right)) in result.rows().enumerate() {
        if left.kind == DiffLineType::Equal && right.kind == DiffLineType::Equal {
            continue;
        }
        match regions.last_mut() {
            Some((_, last)) if idx - *last - 1 <= max_gap => *last = idx,
            _ => regions.push((idx, idx)),
        }
    }

    let len = result.len();
    regions
        .into_iter()
        .enumerate()
        .map(|(ordinal, (first, last))| {
            let start = first.saturating_sub(context);
            let end = last.saturating_add(context).saturating_add(1).min(len);
            let lines = (start..end)
                .filter_map(|i| result.row(i))
                .map(|(left, right)| DiffRow {
                    left: left.clone(),
                    right: right.clone(),
                })
                .collect();
            DiffHunk::new(ordinal, start, end, lines)
        })
        .collect()
}

/// The first hunk starting after `row` (for "next change" navigation).
pub fn next_hunk(hunks: &[DiffHunk], row: usize) -> Option<&DiffHunk> {
    let idx = hunks.partition_point(|h| h.start_index <= row);
    hunks.get(idx)
}

/// The last hunk starting before `row` (for "previous change" navigation).
pub fn prev_hunk(hunks: &[DiffHunk], row: usize) -> Option<&DiffHunk> {
    let idx = hunks.partition_point(|h| h.start_index < row);
    idx.checked_sub(1).and_then(|i| hunks.get(i))
}

/// The hunk whose window contains `row`, if any.
///
/// `row` must index the same rows the hunks were cut from. For hunks of a
/// parsed patch that is the uncollapsed patch order; map rows of the
/// collapsed result with [`crate::core::ParsedPatch::hunk_for_result_row`].
pub fn hunk_at_row(hunks: &[DiffHunk], row: usize) -> Option<&DiffHunk> {
    let idx = hunks.partition_point(|h| h.end_index <= row);
    hunks.get(idx).filter(|h| h.contains_row(row))
}
