//! Core diff engine (pure, no I/O).

mod diff;
mod engine;
mod guard;
mod hunk;
mod inline;
mod lcs;
mod stage;
mod text;
mod unified;

pub use diff::*;
pub use engine::*;
pub use guard::*;
pub use hunk::*;
pub use inline::*;
pub use lcs::*;
pub use stage::*;
pub use text::*;
pub use unified::*;
