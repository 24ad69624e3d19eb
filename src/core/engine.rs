//! Guarded diff entry point and its options.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{
    compute_diff, exceeds_line_limit, extract_hunks, DiffHunk, DiffResult,
    LARGE_FILE_LINE_THRESHOLD,
};

/// Default number of context rows around each change.
pub const DEFAULT_CONTEXT_LINES: usize = 3;

/// Which input tripped a check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Side {
    /// The base (old) content.
    Base,
    /// The modified (new) content.
    Modified,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Base => f.write_str("base"),
            Side::Modified => f.write_str("modified"),
        }
    }
}

/// Errors from the guarded diff entry point.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum DiffError {
    /// One side has more lines than the configured threshold.
    #[error("{side} content exceeds {threshold} lines; diff not computed")]
    TooLarge {
        /// The offending side.
        side: Side,
        /// Threshold in effect.
        threshold: usize,
    },
}

/// Tunables for diffing and hunk extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DiffOptions {
    /// Context rows kept around each change in a hunk.
    pub context_lines: usize,
    /// Maximum newline count per side before diffing is refused.
    pub large_file_threshold: usize,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            context_lines: DEFAULT_CONTEXT_LINES,
            large_file_threshold: LARGE_FILE_LINE_THRESHOLD,
        }
    }
}

/// Diff engine bound to a set of [`DiffOptions`].
///
/// Stateless apart from its options; cheap to copy and safe to share across
/// threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiffEngine {
    options: DiffOptions,
}

impl DiffEngine {
    /// Create an engine with the given options.
    pub fn new(options: DiffOptions) -> Self {
        Self { options }
    }

    /// Options in effect.
    pub fn options(&self) -> &DiffOptions {
        &self.options
    }

    /// Diff two texts, refusing up front if either side is too large.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use linediff::core::{DiffEngine, DiffLineType};
    ///
    /// let engine = DiffEngine::default();
    /// let result = engine.diff("a\nb\nc", "a\nx\nc").unwrap();
    /// assert_eq!(result.left()[1].kind, DiffLineType::Modified);
    /// ```
    pub fn diff(&self, base: &str, modified: &str) -> Result<DiffResult, DiffError> {
        let threshold = self.options.large_file_threshold;
        for (side, content) in [(Side::Base, base), (Side::Modified, modified)] {
            if exceeds_line_limit(content, threshold) {
                log::debug!("skipping diff: {side} side exceeds {threshold} lines");
                return Err(DiffError::TooLarge { side, threshold });
            }
        }
        Ok(compute_diff(base, modified))
    }

    /// Extract hunks with the configured context.
    pub fn hunks(&self, result: &DiffResult) -> Vec<DiffHunk> {
        extract_hunks(result, self.options.context_lines)
    }
}
