//! linediff - a line-level diff engine.
//!
//! Computes side-by-side aligned diffs (LCS based) or reads them from unified
//! diff text, groups changes into context hunks, projects rows into an inline
//! view, and addresses single lines for partial staging.
//!
//! # Quick Start
//!
//! ```rust
//! use linediff::prelude::*;
//!
//! let engine = DiffEngine::default();
//! let result = engine.diff("a\nb\nc\n", "a\nx\nc\n")?;
//! let hunks = engine.hunks(&result);
//! assert_eq!(hunks.len(), 1);
//! # Ok::<(), DiffError>(())
//! ```

#![deny(missing_docs)]

pub mod cli;
pub mod config;
pub mod core;
pub mod metrics;
pub mod prelude;
