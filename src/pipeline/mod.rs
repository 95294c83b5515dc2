//! Analysis orchestration.
//!
//! One run parses the input file once, hands the immutable read
//! collection to every metric group, and assembles the results into a
//! [`QcReport`]. The metric groups are mutually independent pure
//! functions of the collection, so they execute as parallel rayon tasks;
//! the assembled report is identical to sequential execution.

pub mod report;

use crate::io::{self, FastqError, FastqRecord};
use crate::metrics::{adapters, composition, encoding, quality, redundancy};
use crate::metrics::{MetricResult, QcConfig};
use indexmap::IndexMap;
use log::info;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Everything one analysis run produces: summary scalars plus the named
/// metric results, in a fixed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QcReport {
    pub source: String,
    pub total_reads: usize,
    pub encoding: String,
    pub min_length: usize,
    pub max_length: usize,
    pub gc_percent: f64,
    pub metrics: IndexMap<String, MetricResult>,
}

/// Parses a FASTQ file and analyzes it. A structural parse error aborts
/// the run before any metric is computed.
pub fn analyze_file(path: impl AsRef<Path>, config: &QcConfig) -> Result<QcReport, FastqError> {
    let path = path.as_ref();
    let reads = io::read_fastq_file(path)?;
    Ok(analyze_reads(&reads, config, &path.display().to_string()))
}

/// Runs every metric group over an already-parsed collection.
pub fn analyze_reads(reads: &[FastqRecord], config: &QcConfig, source: &str) -> QcReport {
    info!("Analyzing {} read(s) from {}", reads.len(), source);

    type MetricJob<'a> = (
        &'static str,
        Box<dyn Fn() -> MetricResult + Send + Sync + 'a>,
    );

    let jobs: Vec<MetricJob<'_>> = vec![
        (
            "sequence_length_distribution",
            Box::new(|| composition::length_distribution(reads)),
        ),
        ("gc_content", Box::new(|| composition::gc_distribution(reads))),
        ("n_content", Box::new(|| composition::n_content(reads))),
        (
            "per_base_sequence_content",
            Box::new(|| composition::base_proportions(reads)),
        ),
        (
            "per_base_quality",
            Box::new(|| quality::per_base_quality(reads, config)),
        ),
        (
            "per_sequence_quality",
            Box::new(|| quality::per_sequence_quality(reads, config)),
        ),
        (
            "duplication_levels",
            Box::new(|| redundancy::duplication_levels(reads)),
        ),
        (
            "overrepresented_sequences",
            Box::new(|| redundancy::overrepresented_sequences(reads)),
        ),
        ("adapter_content", Box::new(|| adapters::adapter_content(reads))),
    ];

    // Indexed parallel collect keeps the declared order, so task
    // completion order never shows up in the report.
    let computed: Vec<(&'static str, MetricResult)> = jobs
        .into_par_iter()
        .map(|(name, job)| (name, job()))
        .collect();

    let metrics: IndexMap<String, MetricResult> = computed
        .into_iter()
        .map(|(name, result)| (name.to_string(), result))
        .collect();

    let (min_length, max_length) = composition::length_range(reads).unwrap_or((0, 0));

    QcReport {
        source: source.to_string(),
        total_reads: reads.len(),
        encoding: encoding::detect_encoding(reads).to_string(),
        min_length,
        max_length,
        gc_percent: composition::overall_gc_percent(reads),
        metrics,
    }
}
