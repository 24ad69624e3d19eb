//! Single-column projection of a side-by-side diff.

use serde::{Deserialize, Serialize};

use crate::core::{DiffLineType, DiffResult};

/// One row of the inline (unified) view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineDiffLine {
    /// Line content.
    pub content: String,
    /// `Equal`, `Added` or `Removed`; modified rows are split in two.
    #[serde(rename = "type")]
    pub kind: DiffLineType,
    /// Base line number, if the line exists in the base.
    pub old_line_number: Option<usize>,
    /// Modified line number, if the line exists in the modified side.
    pub new_line_number: Option<usize>,
    /// Row index in the originating [`DiffResult`].
    pub source_index: usize,
}

/// Flatten a collapsed result into inline order.
///
/// A `Modified` row becomes a `Removed` entry followed by an `Added` entry,
/// both pointing at the same source row.
pub fn project_inline(result: &DiffResult) -> Vec<InlineDiffLine> {
    let mut out = Vec::with_capacity(result.len() + result.len() / 4);

    for (source_index, (left, right)) in result.rows().enumerate() {
        match left.kind {
            DiffLineType::Equal => out.push(InlineDiffLine {
                content: left.content.clone(),
                kind: DiffLineType::Equal,
                old_line_number: left.line_number,
                new_line_number: right.line_number,
                source_index,
            }),
            DiffLineType::Modified => {
                out.push(InlineDiffLine {
                    content: left.content.clone(),
                    kind: DiffLineType::Removed,
                    old_line_number: left.line_number,
                    new_line_number: None,
                    source_index,
                });
                out.push(InlineDiffLine {
                    content: right.content.clone(),
                    kind: DiffLineType::Added,
                    old_line_number: None,
                    new_line_number: right.line_number,
                    source_index,
                });
            }
            DiffLineType::Removed => out.push(InlineDiffLine {
                content: left.content.clone(),
                kind: DiffLineType::Removed,
                old_line_number: left.line_number,
                new_line_number: None,
                source_index,
            }),
            DiffLineType::Added => out.push(InlineDiffLine {
                content: right.content.clone(),
                kind: DiffLineType::Added,
                old_line_number: None,
                new_line_number: right.line_number,
                source_index,
            }),
        }
    }

    out
}
