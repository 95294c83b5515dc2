//! Command-line interface.

use crate::metrics::QcConfig;
use crate::pipeline::{self, report};
use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

/// Quality-control metrics for FASTQ files.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Input FASTQ file (plain or .gz).
    pub input: PathBuf,

    /// Write the full report as JSON to this path.
    #[arg(short, long)]
    pub json: Option<PathBuf>,

    /// ASCII offset subtracted from quality characters (33 for Phred+33,
    /// 64 for Phred+64).
    #[arg(long, default_value_t = 33)]
    pub quality_offset: u8,

    /// Number of worker threads (0 = one per core).
    #[arg(short, long, default_value_t = 0)]
    pub threads: usize,
}

/// Runs one analysis: parse, compute every metric, print the text
/// summary, and optionally serialize the report as JSON.
pub fn run_cli(cli: Cli) -> Result<()> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(cli.threads)
        .build_global()
        .context("Failed to build thread pool")?;

    let config = QcConfig {
        quality_offset: cli.quality_offset,
    };

    let qc_report = pipeline::analyze_file(&cli.input, &config)
        .with_context(|| format!("Failed to analyze {}", cli.input.display()))?;

    println!("{}", report::render_text(&qc_report));

    if let Some(path) = &cli.json {
        let file = File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &qc_report)?;
        info!("Wrote JSON report to {}", path.display());
    }

    Ok(())
}
