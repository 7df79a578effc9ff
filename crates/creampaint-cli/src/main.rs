//! creampaint CLI entry point.
//!
//! Thin wrapper: argument parsing, logging setup, config resolution, dispatch.

use anyhow::Result;
use clap::Parser;

use creampaint_cli::{load_config, logging, run, Cli};

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let cwd = std::env::current_dir()?;
    let config = load_config(cli.config.as_deref(), &cwd)?;

    let output = run(&cli.command, &config, cli.output)?;
    println!("{}", output);
    Ok(())
}
