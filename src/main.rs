//! linediff - line-level diff engine CLI.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use linediff::cli::{run_command, Command};
use linediff::config::Config;

/// Line-level diffs as JSON: side-by-side rows, hunks, inline rows, line staging.
#[derive(Parser, Debug)]
#[command(name = "linediff", version, about)]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    linediff::metrics::init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(1)
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    log::debug!("options: {:?}", config.diff);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_command(&cli.command, &config, &mut out)
}
