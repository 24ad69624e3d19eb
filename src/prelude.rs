//! Common re-exports for convenient importing.
//!
//! # Example
//!
//! ```rust
//! use linediff::prelude::*;
//! ```

pub use crate::core::{
    compute_diff, extract_hunks, is_large_file, parse_patch, project_inline, DiffEngine,
    DiffError, DiffHunk, DiffLine, DiffLineType, DiffOptions, DiffResult, DiffRow,
    DiffStageLineTarget, InlineDiffLine, ParsedPatch, StagePatch,
};
