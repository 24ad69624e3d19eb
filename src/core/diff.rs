//! Side-by-side diff model and row collapsing.

use serde::{Deserialize, Serialize};

use crate::core::lcs::{edit_ops, EditOp};
use crate::core::text::split_lines;

/// Kind of a diff row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DiffLineType {
    /// Both sides carry the same line.
    Equal,
    /// Line exists only on the right side.
    Added,
    /// Line exists only on the left side.
    Removed,
    /// Old line on the left was replaced by the new line on the right.
    Modified,
}

/// One side of a diff row.
///
/// `line_number` is `None` exactly when the line is padding, i.e. the row has
/// no counterpart on this side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffLine {
    /// Line content, without terminator.
    pub content: String,
    /// Row kind (shared by both sides of a row).
    #[serde(rename = "type")]
    pub kind: DiffLineType,
    /// 1-based line number on this side.
    pub line_number: Option<usize>,
}

impl DiffLine {
    /// Create a real line.
    pub fn new(kind: DiffLineType, content: impl Into<String>, line_number: usize) -> Self {
        Self {
            content: content.into(),
            kind,
            line_number: Some(line_number),
        }
    }

    /// Create a padding line for a row of `kind`.
    pub fn padding(kind: DiffLineType) -> Self {
        Self {
            content: String::new(),
            kind,
            line_number: None,
        }
    }

    /// Whether this is a padding placeholder.
    pub fn is_padding(&self) -> bool {
        self.line_number.is_none()
    }
}

/// A left/right pair at one row index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffRow {
    /// Base side.
    pub left: DiffLine,
    /// Modified side.
    pub right: DiffLine,
}

impl DiffRow {
    /// Unchanged line present on both sides.
    pub fn equal(content: &str, old: usize, new: usize) -> Self {
        Self {
            left: DiffLine::new(DiffLineType::Equal, content, old),
            right: DiffLine::new(DiffLineType::Equal, content, new),
        }
    }

    /// Line removed from the base side, padded on the right.
    pub fn removed(content: impl Into<String>, old: usize) -> Self {
        Self {
            left: DiffLine::new(DiffLineType::Removed, content, old),
            right: DiffLine::padding(DiffLineType::Removed),
        }
    }

    /// Line added on the modified side, padded on the left.
    pub fn added(content: impl Into<String>, new: usize) -> Self {
        Self {
            left: DiffLine::padding(DiffLineType::Added),
            right: DiffLine::new(DiffLineType::Added, content, new),
        }
    }

    /// Row kind. Taken from the left side; both sides agree for rows built
    /// by this crate.
    pub fn kind(&self) -> DiffLineType {
        self.left.kind
    }

    /// Whether the row is anything other than unchanged.
    pub fn is_change(&self) -> bool {
        self.left.kind != DiffLineType::Equal || self.right.kind != DiffLineType::Equal
    }
}

/// Row counts by kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DiffStats {
    /// Unchanged rows.
    pub equal: usize,
    /// Pure additions.
    pub added: usize,
    /// Pure removals.
    pub removed: usize,
    /// Paired replacements.
    pub modified: usize,
}

/// Two length-matched columns of diff lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiffResult {
    left: Vec<DiffLine>,
    right: Vec<DiffLine>,
}

impl DiffResult {
    /// Compute the collapsed diff of two texts.
    pub fn compute(base: &str, modified: &str) -> Self {
        compute_diff(base, modified)
    }

    /// Assemble a result from rows, keeping both columns the same length.
    pub fn from_rows(rows: impl IntoIterator<Item = DiffRow>) -> Self {
        let (left, right) = rows.into_iter().map(|r| (r.left, r.right)).unzip();
        Self { left, right }
    }

    /// Base column.
    pub fn left(&self) -> &[DiffLine] {
        &self.left
    }

    /// Modified column.
    pub fn right(&self) -> &[DiffLine] {
        &self.right
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.left.len()
    }

    /// No rows at all (both inputs empty).
    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }

    /// Row pair at `index`.
    pub fn row(&self, index: usize) -> Option<(&DiffLine, &DiffLine)> {
        Some((self.left.get(index)?, self.right.get(index)?))
    }

    /// Iterate row pairs in order.
    pub fn rows(&self) -> impl Iterator<Item = (&DiffLine, &DiffLine)> + '_ {
        self.left.iter().zip(self.right.iter())
    }

    /// Consume into owned rows.
    pub fn into_rows(self) -> Vec<DiffRow> {
        self.left
            .into_iter()
            .zip(self.right)
            .map(|(left, right)| DiffRow { left, right })
            .collect()
    }

    /// Re-run the collapsing pass. A no-op on already collapsed results.
    pub fn collapsed(self) -> Self {
        Self::from_rows(collapse_rows(self.into_rows()))
    }

    /// Whether any row is a change.
    pub fn has_changes(&self) -> bool {
        self.rows()
            .any(|(l, r)| l.kind != DiffLineType::Equal || r.kind != DiffLineType::Equal)
    }

    /// Count rows by kind.
    pub fn stats(&self) -> DiffStats {
        let mut stats = DiffStats::default();
        for line in &self.left {
            match line.kind {
                DiffLineType::Equal => stats.equal += 1,
                DiffLineType::Added => stats.added += 1,
                DiffLineType::Removed => stats.removed += 1,
                DiffLineType::Modified => stats.modified += 1,
            }
        }
        stats
    }
}

/// Diff two texts: split, LCS, backtrack, align and collapse.
///
/// Runs the O(m·n) table unconditionally; see [`crate::core::DiffEngine`]
/// for the guarded entry point.
pub fn compute_diff(base: &str, modified: &str) -> DiffResult {
    let base_lines = split_lines(base);
    let modified_lines = split_lines(modified);
    let ops = edit_ops(&base_lines, &modified_lines);
    let rows = rows_from_ops(&ops, &base_lines, &modified_lines);
    DiffResult::from_rows(collapse_rows(rows))
}

/// Expand an edit script into uncollapsed rows: one row per op, removals and
/// additions padded on the opposite side.
pub fn rows_from_ops(ops: &[EditOp], base: &[&str], modified: &[&str]) -> Vec<DiffRow> {
    ops.iter()
        .map(|op| match *op {
            EditOp::Equal { old, new } => DiffRow::equal(base[old - 1], old, new),
            EditOp::Removed { old } => DiffRow::removed(base[old - 1], old),
            EditOp::Added { new } => DiffRow::added(modified[new - 1], new),
        })
        .collect()
}

/// Pair each maximal run of removed rows with the run of added rows directly
/// after it.
///
/// The first `min(removed, added)` pairs become `Modified` rows; the rest stay
/// as padded `Removed` or `Added` rows. `Equal` and `Modified` rows pass
/// through. Both the LCS path and the patch path go through here.
pub fn collapse_rows(rows: Vec<DiffRow>) -> Vec<DiffRow> {
    let mut out = Vec::with_capacity(rows.len());
    let mut removed: Vec<DiffLine> = Vec::new();
    let mut added: Vec<DiffLine> = Vec::new();

    for row in rows {
        match row.kind() {
            DiffLineType::Removed => {
                // A removal after additions starts a new run
                if !added.is_empty() {
                    flush_run(&mut out, &mut removed, &mut added);
                }
                removed.push(row.left);
            }
            DiffLineType::Added => added.push(row.right),
            DiffLineType::Equal | DiffLineType::Modified => {
                flush_run(&mut out, &mut removed, &mut added);
                out.push(row);
            }
        }
    }
    flush_run(&mut out, &mut removed, &mut added);

    out
}

fn flush_run(out: &mut Vec<DiffRow>, removed: &mut Vec<DiffLine>, added: &mut Vec<DiffLine>) {
    let paired = removed.len().min(added.len());
    let mut removed = removed.drain(..);
    let mut added = added.drain(..);

    for (mut old, mut new) in removed.by_ref().zip(added.by_ref()).take(paired) {
        old.kind = DiffLineType::Modified;
        new.kind = DiffLineType::Modified;
        out.push(DiffRow {
            left: old,
            right: new,
        });
    }
    for old in removed {
        out.push(DiffRow {
            left: old,
            right: DiffLine::padding(DiffLineType::Removed),
        });
    }
    for new in added {
        out.push(DiffRow {
            left: DiffLine::padding(DiffLineType::Added),
            right: new,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(result: &DiffResult) -> Vec<DiffLineType> {
        result.left().iter().map(|l| l.kind).collect()
    }

    #[test]
    fn empty_diff() {
        let result = compute_diff("", "");
        assert!(result.is_empty());
        assert!(!result.has_changes());
    }

    #[test]
    fn identical_files() {
        let text = "line1\nline2\nline3\n";
        let result = compute_diff(text, text);
        assert_eq!(result.len(), 3);
        assert!(!result.has_changes());
        assert!(result.rows().all(|(l, r)| l.line_number == r.line_number));
    }

    #[test]
    fn single_modified_row() {
        let result = compute_diff("a\nb\nc", "a\nx\nc");
        assert_eq!(
            kinds(&result),
            vec![
                DiffLineType::Equal,
                DiffLineType::Modified,
                DiffLineType::Equal
            ]
        );
        let (left, right) = result.row(1).unwrap();
        assert_eq!(left.content, "b");
        assert_eq!(right.content, "x");
        assert_eq!(right.kind, DiffLineType::Modified);
        assert_eq!((left.line_number, right.line_number), (Some(2), Some(2)));
    }

    #[test]
    fn trailing_insert() {
        let result = compute_diff("a\nb", "a\nb\nc");
        assert_eq!(result.len(), 3);
        let (left, right) = result.row(2).unwrap();
        assert_eq!(left.kind, DiffLineType::Added);
        assert!(left.is_padding());
        assert_eq!(left.content, "");
        assert_eq!(right.content, "c");
        assert_eq!(right.line_number, Some(3));
    }

    #[test]
    fn simple_delete() {
        let result = compute_diff("line1\nline2\nline3\n", "line1\nline3\n");
        let (left, right) = result.row(1).unwrap();
        assert_eq!(left.kind, DiffLineType::Removed);
        assert_eq!(left.content, "line2");
        assert!(right.is_padding());
        assert_eq!(right.kind, DiffLineType::Removed);
    }

    #[test]
    fn unbalanced_changes() {
        // More removals than additions
        let result = compute_diff("a\nb\nc\n", "x\n");
        let stats = result.stats();
        assert_eq!(stats.modified, 1);
        assert_eq!(stats.removed, 2);
        assert_eq!(stats.added, 0);
        assert_eq!(result.left().len(), result.right().len());
    }

    #[test]
    fn multi_line_replace_pairs_in_order() {
        let result = compute_diff("a\nb\nc\n", "x\ny\nz\n");
        assert_eq!(result.stats().modified, 3);
        let (left, right) = result.row(0).unwrap();
        assert_eq!((left.content.as_str(), right.content.as_str()), ("a", "x"));
    }

    #[test]
    fn crlf_and_lf_compare_equal() {
        let result = compute_diff("a\r\nb\r\n", "a\nb\n");
        assert!(!result.has_changes());
    }

    #[test]
    fn collapse_pairs_removed_then_added() {
        let rows = vec![
            DiffRow::equal("a", 1, 1),
            DiffRow::removed("b", 2),
            DiffRow::removed("c", 3),
            DiffRow::added("x", 2),
            DiffRow::equal("d", 4, 3),
        ];
        let collapsed = collapse_rows(rows);
        let kinds: Vec<_> = collapsed.iter().map(DiffRow::kind).collect();
        assert_eq!(
            kinds,
            vec![
                DiffLineType::Equal,
                DiffLineType::Modified,
                DiffLineType::Removed,
                DiffLineType::Equal
            ]
        );
        assert_eq!(collapsed[1].left.content, "b");
        assert_eq!(collapsed[1].right.content, "x");
        assert_eq!(collapsed[2].left.content, "c");
        assert!(collapsed[2].right.is_padding());
    }

    #[test]
    fn collapse_does_not_pair_added_with_later_removed() {
        let rows = vec![DiffRow::added("x", 1), DiffRow::removed("a", 1)];
        let collapsed = collapse_rows(rows.clone());
        assert_eq!(collapsed, rows);
    }

    #[test]
    fn collapse_is_idempotent() {
        let result = compute_diff("a\nb\nc\nd\ne\n", "a\nX\nY\nZ\nd\nQ\n");
        let again = result.clone().collapsed();
        assert_eq!(result, again);
    }

    #[test]
    fn line_numbers_are_contiguous() {
        let result = compute_diff("a\nb\nc\nd\n", "b\nc\nx\nd\ne\n");
        let old: Vec<_> = result.left().iter().filter_map(|l| l.line_number).collect();
        let new: Vec<_> = result.right().iter().filter_map(|l| l.line_number).collect();
        assert_eq!(old, vec![1, 2, 3, 4]);
        assert_eq!(new, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn serializes_with_type_tag() {
        let line = DiffLine::new(DiffLineType::Modified, "x", 4);
        let json = serde_json::to_string(&line).unwrap();
        assert_eq!(json, r#"{"content":"x","type":"modified","lineNumber":4}"#);
        let pad = serde_json::to_string(&DiffLine::padding(DiffLineType::Added)).unwrap();
        assert_eq!(pad, r#"{"content":"","type":"added","lineNumber":null}"#);
    }
}
