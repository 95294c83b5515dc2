//! Quality-score metrics: per-base quartiles and the per-sequence mean
//! quality histogram.
//!
//! Scores are `ascii_code - offset` with the offset taken from
//! [`QcConfig`](crate::metrics::QcConfig); the detected encoding label
//! never changes the conversion.

use crate::io::FastqRecord;
use crate::metrics::{MetricResult, MetricSeries, QcConfig, Verdict};
use statrs::statistics::{Data, OrderStatistics};
use std::collections::BTreeMap;

const PER_BASE_LQ_FAILURE: f64 = 5.0;
const PER_BASE_MEDIAN_FAILURE: f64 = 20.0;
const PER_BASE_LQ_WARNING: f64 = 10.0;
const PER_BASE_MEDIAN_WARNING: f64 = 25.0;

const MODAL_SCORE_FAILURE: i64 = 20;
const MODAL_SCORE_WARNING: i64 = 27;

/// Per-position median and lower-quartile quality.
///
/// Position `i` collects the score of every read whose quality string has
/// a character there; shorter reads contribute nothing (no padding
/// value), so each position's statistics cover only the reads that reach
/// it. Positions run up to the longest quality string in the collection.
pub fn per_base_quality(reads: &[FastqRecord], config: &QcConfig) -> MetricResult {
    let max_len = reads.iter().map(|r| r.quality.len()).max().unwrap_or(0);
    let offset = config.quality_offset as f64;

    let mut scores_at: Vec<Vec<f64>> = vec![Vec::new(); max_len];
    for read in reads {
        for (i, code) in read.quality.bytes().enumerate() {
            scores_at[i].push(code as f64 - offset);
        }
    }

    let mut median = Vec::with_capacity(max_len);
    let mut lower_quartile = Vec::with_capacity(max_len);
    for scores in scores_at {
        let mut data = Data::new(scores);
        median.push(data.median());
        lower_quartile.push(data.lower_quartile());
    }

    let has_failure = median
        .iter()
        .zip(&lower_quartile)
        .any(|(&m, &lq)| lq < PER_BASE_LQ_FAILURE || m < PER_BASE_MEDIAN_FAILURE);
    let has_warning = median
        .iter()
        .zip(&lower_quartile)
        .any(|(&m, &lq)| lq < PER_BASE_LQ_WARNING || m < PER_BASE_MEDIAN_WARNING);

    MetricResult::new(
        MetricSeries::QualityQuartiles {
            median,
            lower_quartile,
        },
        Verdict::from_flags(has_failure, has_warning),
    )
}

/// Histogram of per-read mean quality, keyed by the rounded mean.
///
/// Reads with an empty quality string carry no mean and are skipped. The
/// verdict checks every modal score: all keys that reach the maximum
/// frequency are examined, not just one of them.
pub fn per_sequence_quality(reads: &[FastqRecord], config: &QcConfig) -> MetricResult {
    let offset = config.quality_offset as i64;
    let mut counts: BTreeMap<i64, u64> = BTreeMap::new();

    for read in reads {
        if read.quality.is_empty() {
            continue;
        }
        let sum: i64 = read
            .quality
            .bytes()
            .map(|code| code as i64 - offset)
            .sum();
        let mean = (sum as f64 / read.quality.len() as f64).round() as i64;
        *counts.entry(mean).or_insert(0) += 1;
    }

    let verdict = match counts.values().max().copied() {
        Some(peak) => {
            let modal_scores = counts
                .iter()
                .filter(|(_, &freq)| freq == peak)
                .map(|(&score, _)| score);
            let mut has_failure = false;
            let mut has_warning = false;
            for score in modal_scores {
                if score < MODAL_SCORE_FAILURE {
                    has_failure = true;
                }
                if score < MODAL_SCORE_WARNING {
                    has_warning = true;
                }
            }
            Verdict::from_flags(has_failure, has_warning)
        }
        None => Verdict::Good,
    };

    MetricResult::new(MetricSeries::MeanQualityHistogram { counts }, verdict)
}
