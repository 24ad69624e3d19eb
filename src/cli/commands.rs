//! Subcommands: diff two files, parse a patch, build a single-line patch.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Subcommand, ValueEnum};
use serde::Serialize;

use crate::config::Config;
use crate::core::{
    looks_binary, parse_patch, project_inline, DiffEngine, DiffError, DiffHunk, DiffResult,
    DiffStageLineTarget, StagePatch,
};

/// What to print for a diff.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum View {
    /// Side-by-side columns.
    #[default]
    Rows,
    /// Context hunks.
    Hunks,
    /// Single-column unified order.
    Inline,
    /// Row counts by kind.
    Stats,
}

/// linediff subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Diff two files line by line
    Diff {
        /// Base file
        old: PathBuf,
        /// Modified file
        new: PathBuf,
        /// Output view
        #[arg(long, value_enum, default_value_t = View::Rows)]
        view: View,
        /// Context lines around each hunk (overrides config)
        #[arg(short = 'C', long)]
        context: Option<usize>,
    },
    /// Parse a single-file unified diff
    Patch {
        /// Patch file
        patch: PathBuf,
        /// Output view
        #[arg(long, value_enum, default_value_t = View::Rows)]
        view: View,
    },
    /// Print a patch staging one line of a zero-context diff
    StageLine {
        /// Output of `git diff --unified=0 -- <path>`
        patch: PathBuf,
        /// Old line number of the removed side
        #[arg(long, value_name = "N")]
        old: Option<usize>,
        /// New line number of the added side
        #[arg(long, value_name = "N")]
        new: Option<usize>,
    },
}

/// Shape of `diff` output when the guard refuses an input.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TooLarge<'a> {
    status: &'static str,
    reason: &'a str,
}

/// Run one subcommand, writing its output to `out`.
pub fn run_command(command: &Command, config: &Config, out: &mut dyn Write) -> Result<()> {
    match command {
        Command::Diff {
            old,
            new,
            view,
            context,
        } => {
            let mut options = config.diff;
            if let Some(context) = context {
                options.context_lines = *context;
            }
            let engine = DiffEngine::new(options);

            let base = read_text(old)?;
            let modified = read_text(new)?;
            if looks_binary(&base) || looks_binary(&modified) {
                bail!("binary content; not diffing");
            }

            match engine.diff(&base, &modified) {
                Ok(result) => {
                    let hunks = engine.hunks(&result);
                    write_view(out, *view, &result, &hunks)
                }
                Err(err @ DiffError::TooLarge { .. }) => {
                    log::info!("{err}");
                    let reason = err.to_string();
                    write_json(
                        out,
                        &TooLarge {
                            status: "tooLarge",
                            reason: &reason,
                        },
                    )
                }
            }
        }
        Command::Patch { patch, view } => {
            let text = read_text(patch)?;
            let parsed = parse_patch(&text);
            write_view(out, *view, &parsed.result, &parsed.hunks)
        }
        Command::StageLine { patch, old, new } => {
            let text = read_text(patch)?;
            let parsed = StagePatch::parse(&text)
                .with_context(|| format!("failed to parse {}", patch.display()))?;
            let target = DiffStageLineTarget {
                old_line_number: *old,
                new_line_number: *new,
            };
            let line_patch = parsed.line_patch(&target)?;
            out.write_all(line_patch.as_bytes())?;
            Ok(())
        }
    }
}

fn read_text(path: &Path) -> Result<String> {
    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn write_view(
    out: &mut dyn Write,
    view: View,
    result: &DiffResult,
    hunks: &[DiffHunk],
) -> Result<()> {
    match view {
        View::Rows => write_json(out, result),
        View::Hunks => write_json(out, &hunks),
        View::Inline => write_json(out, &project_inline(result)),
        View::Stats => write_json(out, &result.stats()),
    }
}

fn write_json<T: Serialize + ?Sized>(out: &mut dyn Write, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}
