//! Line addressing for partial stage/unstage, and single-line patch building.
//!
//! A rendering layer turns a selected row into a [`DiffStageLineTarget`]. The
//! staging backend diffs the file with `--unified=0`, parses that with
//! [`StagePatch::parse`], and applies the patch from
//! [`StagePatch::line_patch`] to the index (reversed for unstaging).

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{split_lines, DiffLine, DiffLineType, HunkHeader, InlineDiffLine};

/// Identifies exactly one changed line (or one modified pair) in a diff.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffStageLineTarget {
    /// Base line number of the removed side.
    pub old_line_number: Option<usize>,
    /// Modified line number of the added side.
    pub new_line_number: Option<usize>,
}

impl DiffStageLineTarget {
    /// Target for a side-by-side row. Unchanged rows have nothing to stage.
    pub fn from_pair(left: &DiffLine, right: &DiffLine) -> Option<Self> {
        match left.kind {
            DiffLineType::Equal => None,
            DiffLineType::Added | DiffLineType::Removed | DiffLineType::Modified => Some(Self {
                old_line_number: left.line_number,
                new_line_number: right.line_number,
            }),
        }
    }

    /// Target for an inline row. Unchanged rows have nothing to stage.
    pub fn from_inline(line: &InlineDiffLine) -> Option<Self> {
        match line.kind {
            DiffLineType::Equal => None,
            DiffLineType::Added | DiffLineType::Removed | DiffLineType::Modified => Some(Self {
                old_line_number: line.old_line_number,
                new_line_number: line.new_line_number,
            }),
        }
    }

    /// Whether neither side is addressed.
    pub fn is_empty(&self) -> bool {
        self.old_line_number.is_none() && self.new_line_number.is_none()
    }
}

/// Whether a line is moved into or out of the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StageDirection {
    /// Working tree to index.
    Stage,
    /// Index back to working tree.
    Unstage,
}

/// Everything a staging backend needs to stage or unstage one line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageLineRequest {
    /// Repository-relative file path.
    pub path: String,
    /// The addressed line.
    pub target: DiffStageLineTarget,
    /// Stage or unstage.
    pub direction: StageDirection,
}

/// Errors from building a single-line patch.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum StageError {
    /// No file header lines before the first hunk.
    #[error("unable to parse diff header")]
    MissingHeader,
    /// A `@@` line whose ranges could not be read.
    #[error("invalid hunk header '{0}'")]
    InvalidHunkHeader(String),
    /// The diff has a header but no hunks.
    #[error("no diff hunks available for selected file")]
    NoHunks,
    /// The addressed line is not a change in this diff.
    #[error("unable to find {kind} line {line} in diff")]
    LineNotFound {
        /// Which kind of line was searched for.
        kind: PatchLineKind,
        /// The line number searched for.
        line: usize,
    },
    /// A modified pair whose halves live in different hunks.
    #[error("selected modified line pair is in different hunks")]
    SplitAcrossHunks,
    /// Target with neither line number set.
    #[error("stage-line selection is empty")]
    EmptySelection,
}

/// Kind of a change line in a zero-context patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchLineKind {
    /// `+` line.
    Add,
    /// `-` line.
    Remove,
}

impl fmt::Display for PatchLineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatchLineKind::Add => f.write_str("added"),
            PatchLineKind::Remove => f.write_str("removed"),
        }
    }
}

/// One `+` or `-` line with its position on both sides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchLine {
    /// Add or remove.
    pub kind: PatchLineKind,
    /// Content without the prefix.
    pub content: String,
    /// Base line number (removals only).
    pub old_line: Option<usize>,
    /// Modified line number (additions only).
    pub new_line: Option<usize>,
    /// Base counter at this line.
    pub old_anchor: usize,
    /// Modified counter at this line.
    pub new_anchor: usize,
}

/// Change lines of one hunk; context lines only move the counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchHunk {
    /// `+`/`-` lines in order.
    pub lines: Vec<PatchLine>,
}

/// A parsed zero-context patch for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagePatch {
    header_lines: Vec<String>,
    hunks: Vec<PatchHunk>,
}

impl StagePatch {
    /// Parse `git diff --unified=0` output for a single file.
    pub fn parse(diff_output: &str) -> Result<Self, StageError> {
        let lines = split_lines(diff_output);

        let mut header_lines = Vec::new();
        let mut index = 0;
        while index < lines.len() {
            let line = lines[index];
            if line.starts_with("@@")
                || (line.starts_with("diff --git ") && !header_lines.is_empty())
            {
                break;
            }
            header_lines.push(line.to_string());
            index += 1;
        }
        if header_lines.is_empty() {
            return Err(StageError::MissingHeader);
        }

        let mut hunks = Vec::new();
        while index < lines.len() {
            let line = lines[index];
            if line.starts_with("diff --git ") && !hunks.is_empty() {
                break;
            }
            if !line.starts_with("@@") {
                index += 1;
                continue;
            }
            let (hunk, next) = parse_hunk(&lines, index)?;
            hunks.push(hunk);
            index = next;
        }
        if hunks.is_empty() {
            return Err(StageError::NoHunks);
        }

        log::debug!("parsed zero-context patch with {} hunks", hunks.len());
        Ok(Self {
            header_lines,
            hunks,
        })
    }

    /// File header lines (`diff --git`, `index`, `---`, `+++`).
    pub fn header_lines(&self) -> &[String] {
        &self.header_lines
    }

    /// Parsed hunks.
    pub fn hunks(&self) -> &[PatchHunk] {
        &self.hunks
    }

    /// Build a patch that touches only the addressed line(s).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use linediff::core::{DiffStageLineTarget, StagePatch};
    ///
    /// let diff = "diff --git a/f b/f\n--- a/f\n+++ b/f\n@@ -2 +2 @@\n-b\n+B\n";
    /// let patch = StagePatch::parse(diff).unwrap();
    /// let target = DiffStageLineTarget { old_line_number: None, new_line_number: Some(2) };
    /// let out = patch.line_patch(&target).unwrap();
    /// assert!(out.ends_with("@@ -3,0 +2,1 @@\n+B\n"));
    /// ```
    pub fn line_patch(&self, target: &DiffStageLineTarget) -> Result<String, StageError> {
        let mut out = self.header_lines.clone();

        match (target.old_line_number, target.new_line_number) {
            (Some(old), Some(new)) => {
                let (remove_hunk, removed) = self.find(PatchLineKind::Remove, old)?;
                let (add_hunk, added) = self.find(PatchLineKind::Add, new)?;
                if remove_hunk != add_hunk {
                    return Err(StageError::SplitAcrossHunks);
                }
                out.push(format!("@@ -{old},1 +{new},1 @@"));
                out.push(format!("-{}", removed.content));
                out.push(format!("+{}", added.content));
            }
            (Some(old), None) => {
                let (_, removed) = self.find(PatchLineKind::Remove, old)?;
                out.push(format!("@@ -{old},1 +{},0 @@", removed.new_anchor));
                out.push(format!("-{}", removed.content));
            }
            (None, Some(new)) => {
                let (_, added) = self.find(PatchLineKind::Add, new)?;
                out.push(format!("@@ -{},0 +{new},1 @@", added.old_anchor));
                out.push(format!("+{}", added.content));
            }
            (None, None) => return Err(StageError::EmptySelection),
        }

        let mut patch = out.join("\n");
        patch.push('\n');
        Ok(patch)
    }

    fn find(&self, kind: PatchLineKind, line: usize) -> Result<(usize, &PatchLine), StageError> {
        self.hunks
            .iter()
            .enumerate()
            .find_map(|(hunk_index, hunk)| {
                hunk.lines
                    .iter()
                    .find(|l| {
                        l.kind == kind
                            && match kind {
                                PatchLineKind::Add => l.new_line == Some(line),
                                PatchLineKind::Remove => l.old_line == Some(line),
                            }
                    })
                    .map(|l| (hunk_index, l))
            })
            .ok_or(StageError::LineNotFound { kind, line })
    }
}

fn parse_hunk(lines: &[&str], start: usize) -> Result<(PatchHunk, usize), StageError> {
    let header = lines[start];
    let invalid = || StageError::InvalidHunkHeader(header.to_string());
    let parsed = HunkHeader::parse_strict(header).ok_or_else(invalid)?;
    // None once a counter has run past usize::MAX
    let mut old_cursor = Some(parsed.old_start);
    let mut new_cursor = Some(parsed.new_start);

    let mut hunk = PatchHunk::default();
    let mut index = start + 1;

    while index < lines.len() {
        let line = lines[index];
        if line.starts_with("@@") || line.starts_with("diff --git ") {
            break;
        }
        index += 1;

        if let Some(content) = line.strip_prefix('+') {
            let new_line = new_cursor.ok_or_else(invalid)?;
            hunk.lines.push(PatchLine {
                kind: PatchLineKind::Add,
                content: content.to_string(),
                old_line: None,
                new_line: Some(new_line),
                old_anchor: old_cursor.ok_or_else(invalid)?,
                new_anchor: new_line,
            });
            new_cursor = new_line.checked_add(1);
        } else if let Some(content) = line.strip_prefix('-') {
            let old_line = old_cursor.ok_or_else(invalid)?;
            hunk.lines.push(PatchLine {
                kind: PatchLineKind::Remove,
                content: content.to_string(),
                old_line: Some(old_line),
                new_line: None,
                old_anchor: old_line,
                new_anchor: new_cursor.ok_or_else(invalid)?,
            });
            old_cursor = old_line.checked_add(1);
        } else if line.starts_with(' ') {
            old_cursor = old_cursor.and_then(|n| n.checked_add(1));
            new_cursor = new_cursor.and_then(|n| n.checked_add(1));
        }
    }

    Ok((hunk, index))
}
