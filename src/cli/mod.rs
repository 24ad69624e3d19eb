//! Command-line front end over the core engine.

mod commands;

pub use commands::*;
