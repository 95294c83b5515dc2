//! Main entry point for the readqc application.
//!
//! Parses a FASTQ file into an in-memory read collection, computes the
//! quality-control metrics over it, and reports per-metric verdicts.

mod cli;
mod io;
mod metrics;
mod pipeline;

use anyhow::Result;
use clap::Parser;
use cli::{run_cli, Cli};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    run_cli(cli)
}
