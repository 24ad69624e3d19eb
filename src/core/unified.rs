//! Lenient parser for single-file unified diff text.
//!
//! This is the second way into the engine: patch text from a VCS backend is
//! turned straight into rows and hunks without running the LCS table.

use serde::Serialize;

use crate::core::{collapse_rows, split_lines, DiffHunk, DiffResult, DiffRow};
use crate::metrics::{self, Phase};

/// Numbers from a `@@ -old_start,old_len +new_start,new_len @@` line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HunkHeader {
    /// First base line covered.
    pub old_start: usize,
    /// Base lines covered.
    pub old_len: usize,
    /// First modified line covered.
    pub new_start: usize,
    /// Modified lines covered.
    pub new_len: usize,
}

impl HunkHeader {
    /// Parse a header, substituting 0 for anything unreadable.
    ///
    /// An omitted length (`@@ -3 +3 @@`) means 1.
    pub fn parse_lenient(line: &str) -> Self {
        let mut header = Self::default();
        for token in header_ranges(line) {
            if let Some(range) = token.strip_prefix('-') {
                (header.old_start, header.old_len) = lenient_range(range);
            } else if let Some(range) = token.strip_prefix('+') {
                (header.new_start, header.new_len) = lenient_range(range);
            }
        }
        header
    }

    /// Parse a header, returning `None` unless both ranges are well formed.
    pub fn parse_strict(line: &str) -> Option<Self> {
        if !line.starts_with("@@") {
            return None;
        }
        let mut tokens = header_ranges(line);
        let (old_start, old_len) = strict_range(tokens.next()?.strip_prefix('-')?)?;
        let (new_start, new_len) = strict_range(tokens.next()?.strip_prefix('+')?)?;
        Some(Self {
            old_start,
            old_len,
            new_start,
            new_len,
        })
    }
}

/// Range tokens between the opening `@@` and the closing `@@`.
fn header_ranges(line: &str) -> impl Iterator<Item = &str> {
    let body = line.strip_prefix("@@").unwrap_or(line);
    let body = body.split("@@").next().unwrap_or("");
    body.split_whitespace()
}

fn lenient_range(range: &str) -> (usize, usize) {
    match range.split_once(',') {
        Some((start, len)) => (start.parse().unwrap_or(0), len.parse().unwrap_or(0)),
        None => (range.parse().unwrap_or(0), 1),
    }
}

fn strict_range(range: &str) -> Option<(usize, usize)> {
    match range.split_once(',') {
        Some((start, len)) => Some((start.parse().ok()?, len.parse().ok()?)),
        None => Some((range.parse().ok()?, 1)),
    }
}

/// Result of parsing one file's patch.
///
/// `result` is the whole row sequence collapsed once, for side-by-side and
/// inline display. `hunks` keep one row per literal patch line, uncollapsed,
/// so every hunk row addresses exactly one `+`, `-` or context line; their
/// `start_index`/`end_index` refer to that uncollapsed order, not to rows of
/// `result`. Use [`ParsedPatch::hunk_for_result_row`] to go from a `result`
/// row (or an inline row's `source_index`) back to its hunk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedPatch {
    /// Collapsed rows across all hunks.
    pub result: DiffResult,
    /// Hunks in patch order.
    pub hunks: Vec<DiffHunk>,
}

impl ParsedPatch {
    /// The hunk a row of `result` came from.
    ///
    /// Matched by base line number, or by modified line number for pure
    /// additions. A modified row paired across a hunk boundary belongs to the
    /// hunk holding its removed half.
    pub fn hunk_for_result_row(&self, row: usize) -> Option<&DiffHunk> {
        let (left, right) = self.result.row(row)?;
        self.hunks.iter().find(|hunk| {
            hunk.lines.iter().any(|r| match (left.line_number, right.line_number) {
                (Some(old), _) => r.left.line_number == Some(old),
                (None, Some(new)) => r.right.line_number == Some(new),
                (None, None) => false,
            })
        })
    }
}

/// Parse unified diff text for a single file.
///
/// Never fails: preamble lines are ignored, unknown prefixes inside a hunk
/// are skipped, bad header numbers read as 0, and a patch without hunks
/// yields an empty result. A second `diff --git` section ends parsing.
///
/// # Examples
///
/// ```rust
/// use linediff::core::parse_patch;
///
/// let patch = parse_patch("@@ -1,2 +1,2 @@\n keep\n-old\n+new\n");
/// assert_eq!(patch.hunks.len(), 1);
/// assert_eq!(patch.hunks[0].lines.len(), 3);
/// assert_eq!(patch.result.len(), 2);
/// ```
pub fn parse_patch(text: &str) -> ParsedPatch {
    let _timer = metrics::Timer::start(Phase::ParsePatch);

    let mut rows: Vec<DiffRow> = Vec::new();
    let mut spans: Vec<(usize, usize)> = Vec::new();
    let mut open: Option<usize> = None;
    let mut old_ln = 0usize;
    let mut new_ln = 0usize;
    let mut skipped = 0usize;

    for line in split_lines(text) {
        if line.starts_with("diff --git ") {
            if open.is_some() || !spans.is_empty() {
                log::debug!("stopping at second file section in patch");
                break;
            }
            continue;
        }

        if line.starts_with("@@") {
            if let Some(start) = open.take() {
                spans.push((start, rows.len()));
            }
            let header = HunkHeader::parse_lenient(line);
            old_ln = header.old_start;
            new_ln = header.new_start;
            open = Some(rows.len());
            continue;
        }

        // File header lines before the first hunk
        if open.is_none() {
            continue;
        }

        if let Some(content) = line.strip_prefix('+') {
            rows.push(DiffRow::added(content, new_ln));
            new_ln = new_ln.saturating_add(1);
        } else if let Some(content) = line.strip_prefix('-') {
            rows.push(DiffRow::removed(content, old_ln));
            old_ln = old_ln.saturating_add(1);
        } else if line.is_empty() || line.starts_with(' ') {
            rows.push(DiffRow::equal(line.get(1..).unwrap_or(""), old_ln, new_ln));
            old_ln = old_ln.saturating_add(1);
            new_ln = new_ln.saturating_add(1);
        } else {
            // "\ No newline at end of file" and the like
            skipped += 1;
        }
    }

    if let Some(start) = open {
        spans.push((start, rows.len()));
    }

    let hunks: Vec<DiffHunk> = spans
        .iter()
        .enumerate()
        .map(|(ordinal, &(start, end))| {
            DiffHunk::new(ordinal, start, end, rows[start..end].to_vec())
        })
        .collect();

    log::debug!(
        "parsed patch: {} hunks, {} rows, {} lines skipped",
        hunks.len(),
        rows.len(),
        skipped
    );

    ParsedPatch {
        result: DiffResult::from_rows(collapse_rows(rows)),
        hunks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DiffLineType;

    const TWO_HUNKS: &str = "\
diff --git a/src/lib.rs b/src/lib.rs
index abc123..def456 100644
--- a/src/lib.rs
+++ b/src/lib.rs
@@ -1,4 +1,4 @@
 fn main() {
-    old();
+    new();
 }
@@ -20,3 +20,5 @@ impl Foo {
 a
+b
+c
 d
";

    #[test]
    fn header_lenient_full() {
        let h = HunkHeader::parse_lenient("@@ -12,7 +14,9 @@ fn context()");
        assert_eq!(
            h,
            HunkHeader {
                old_start: 12,
                old_len: 7,
                new_start: 14,
                new_len: 9
            }
        );
    }

    #[test]
    fn header_lenient_omitted_len() {
        let h = HunkHeader::parse_lenient("@@ -3 +4 @@");
        assert_eq!((h.old_start, h.old_len, h.new_start, h.new_len), (3, 1, 4, 1));
    }

    #[test]
    fn header_lenient_garbage_reads_zero() {
        let h = HunkHeader::parse_lenient("@@ -x,y +1,z @@");
        assert_eq!((h.old_start, h.old_len, h.new_start, h.new_len), (0, 0, 1, 0));
        assert_eq!(HunkHeader::parse_lenient("@@"), HunkHeader::default());
    }

    #[test]
    fn header_strict() {
        assert!(HunkHeader::parse_strict("@@ -1,2 +3,4 @@").is_some());
        assert!(HunkHeader::parse_strict("@@ -1,a +3,4 @@").is_none());
        assert!(HunkHeader::parse_strict("@@ +3,4 -1,2 @@").is_none());
        assert!(HunkHeader::parse_strict("@@ -1,2 @@").is_none());
        assert!(HunkHeader::parse_strict("not a header").is_none());
    }

    #[test]
    fn two_hunks_line_counts() {
        let patch = parse_patch(TWO_HUNKS);
        assert_eq!(patch.hunks.len(), 2);
        assert_eq!(patch.hunks[0].id, "hunk-0");
        assert_eq!(patch.hunks[0].lines.len(), 4);
        assert_eq!(patch.hunks[1].id, "hunk-1");
        assert_eq!(patch.hunks[1].lines.len(), 4);
        assert_eq!((patch.hunks[0].start_index, patch.hunks[0].end_index), (0, 4));
        assert_eq!((patch.hunks[1].start_index, patch.hunks[1].end_index), (4, 8));
    }

    #[test]
    fn line_numbers_follow_headers() {
        let patch = parse_patch(TWO_HUNKS);
        let second = &patch.hunks[1].lines;
        assert_eq!(second[0].left.line_number, Some(20));
        assert_eq!(second[0].right.line_number, Some(20));
        assert_eq!(second[1].right.line_number, Some(21));
        assert!(second[1].left.is_padding());
        assert_eq!(second[3].left.line_number, Some(21));
        assert_eq!(second[3].right.line_number, Some(23));
    }

    #[test]
    fn hunks_stay_uncollapsed_result_collapses() {
        let patch = parse_patch(TWO_HUNKS);
        let first = &patch.hunks[0].lines;
        assert_eq!(first[1].kind(), DiffLineType::Removed);
        assert_eq!(first[2].kind(), DiffLineType::Added);

        // Removal and addition merge into one modified row
        assert_eq!(patch.result.len(), 7);
        let (left, right) = patch.result.row(1).unwrap();
        assert_eq!(left.kind, DiffLineType::Modified);
        assert_eq!(left.content, "    old();");
        assert_eq!(right.content, "    new();");
    }

    #[test]
    fn collapse_runs_over_whole_patch() {
        let text = "@@ -1,1 +1,0 @@\n-gone\n@@ -10,0 +9,1 @@\n+fresh\n";
        let patch = parse_patch(text);
        let kinds: Vec<_> = patch.result.left().iter().map(|l| l.kind).collect();
        assert_eq!(kinds, vec![DiffLineType::Modified]);
        assert_eq!(patch.result.left()[0].content, "gone");
        assert_eq!(patch.result.right()[0].content, "fresh");

        // Hunk lists stay literal
        assert_eq!(patch.hunks.len(), 2);
        assert_eq!(patch.hunks[0].lines[0].kind(), DiffLineType::Removed);
        assert_eq!(patch.hunks[1].lines[0].kind(), DiffLineType::Added);
        assert_eq!(
            patch.hunk_for_result_row(0).map(|h| h.id.as_str()),
            Some("hunk-0")
        );
    }

    #[test]
    fn result_rows_map_to_hunks() {
        let patch = parse_patch(TWO_HUNKS);
        // Collapsed: 3 rows from the first hunk, 4 from the second
        assert_eq!(patch.result.len(), 7);
        let id = |row| patch.hunk_for_result_row(row).map(|h| h.id.as_str());
        assert_eq!(id(1), Some("hunk-0"));
        assert_eq!(id(2), Some("hunk-0"));
        assert_eq!(id(3), Some("hunk-1"));
        // Pure addition, matched by new line number
        assert_eq!(id(4), Some("hunk-1"));
        assert!(id(7).is_none());
    }

    #[test]
    fn huge_header_numbers_saturate() {
        let patch = parse_patch("@@ -18446744073709551615,1 +1,1 @@\n a\n b\n-c\n+d\n");
        let rows = &patch.hunks[0].lines;
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].left.line_number, Some(usize::MAX));
        assert_eq!(rows[1].left.line_number, Some(usize::MAX));
        assert_eq!(rows[1].right.line_number, Some(2));
    }

    #[test]
    fn empty_and_headerless_input() {
        assert_eq!(parse_patch(""), ParsedPatch::default());
        let patch = parse_patch("diff --git a/x b/x\nBinary files differ\n");
        assert!(patch.hunks.is_empty());
        assert!(patch.result.is_empty());
    }

    #[test]
    fn empty_line_is_context() {
        let patch = parse_patch("@@ -1,3 +1,3 @@\n a\n\n-b\n+c\n");
        let rows = &patch.hunks[0].lines;
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[1].kind(), DiffLineType::Equal);
        assert_eq!(rows[1].left.content, "");
        assert_eq!(rows[1].left.line_number, Some(2));
        assert_eq!(rows[2].left.line_number, Some(3));
    }

    #[test]
    fn no_newline_marker_skipped() {
        let text = "@@ -1 +1 @@\n-a\n\\ No newline at end of file\n+b\n\\ No newline at end of file\n";
        let patch = parse_patch(text);
        assert_eq!(patch.hunks[0].lines.len(), 2);
        assert_eq!(patch.result.len(), 1);
        assert_eq!(patch.result.left()[0].kind, DiffLineType::Modified);
    }

    #[test]
    fn stops_at_second_file() {
        let text = "\
diff --git a/a b/a
@@ -1 +1 @@
-x
+y
diff --git a/b b/b
@@ -1 +1 @@
-p
+q
";
        let patch = parse_patch(text);
        assert_eq!(patch.hunks.len(), 1);
        assert_eq!(patch.result.len(), 1);
    }

    #[test]
    fn crlf_patch() {
        let patch = parse_patch("@@ -1,2 +1,2 @@\r\n a\r\n-b\r\n+c\r\n");
        assert_eq!(patch.hunks[0].lines.len(), 3);
        assert_eq!(patch.result.right()[1].content, "c");
    }

    #[test]
    fn new_file_patch() {
        let patch = parse_patch("--- /dev/null\n+++ b/new.txt\n@@ -0,0 +1,2 @@\n+line 1\n+line 2\n");
        assert_eq!(patch.result.len(), 2);
        assert!(patch.result.left().iter().all(|l| l.is_padding()));
        let numbers: Vec<_> = patch.result.right().iter().map(|l| l.line_number).collect();
        assert_eq!(numbers, vec![Some(1), Some(2)]);
    }
}
