//! Quality-control metrics over a parsed read collection.
//!
//! Every metric is a pure function of the immutable read collection: it
//! aggregates into structures local to one call and returns a
//! [`MetricResult`] pairing metric-specific series data with a
//! good/warning/failure verdict. No metric depends on another's output,
//! which is what lets the pipeline run them on independent worker threads.

pub mod adapters;
pub mod composition;
pub mod encoding;
pub mod quality;
pub mod redundancy;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Pass/warn/fail classification attached to every metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Good,
    Warning,
    Failure,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Verdict::Good => "good",
            Verdict::Warning => "warning",
            Verdict::Failure => "failure",
        };
        write!(f, "{}", label)
    }
}

impl Verdict {
    /// Collapses the usual "any position failed / any position warned"
    /// aggregation into a single verdict.
    pub fn from_flags(has_failure: bool, has_warning: bool) -> Self {
        if has_failure {
            Verdict::Failure
        } else if has_warning {
            Verdict::Warning
        } else {
            Verdict::Good
        }
    }
}

/// One overrepresented-sequence entry: the (possibly truncated) key, its
/// occurrence count, and its share of all reads as a percentage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverrepresentedEntry {
    pub sequence: String,
    pub count: u64,
    pub percentage: f64,
}

/// Metric-specific series data, one variant per metric kind.
///
/// Position-indexed vectors are 0-based and dense: index `i` is read
/// position `i`, with no gaps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MetricSeries {
    /// Read length -> number of reads with that length.
    LengthHistogram { counts: BTreeMap<usize, u64> },
    /// Empirical GC% bucket counts next to the fitted Gaussian, plus the
    /// mean absolute deviation between them (as % of the read count).
    GcDistribution {
        empirical: Vec<f64>,
        theoretical: Vec<f64>,
        deviation: f64,
    },
    /// Per-position percentage values (N content).
    PositionPercentages { percent: Vec<f64> },
    /// Per-position nucleotide proportions, one series per base.
    BaseProportions {
        a: Vec<f64>,
        t: Vec<f64>,
        g: Vec<f64>,
        c: Vec<f64>,
    },
    /// Per-position median and lower-quartile quality scores.
    QualityQuartiles {
        median: Vec<f64>,
        lower_quartile: Vec<f64>,
    },
    /// Rounded mean quality score -> number of reads.
    MeanQualityHistogram { counts: BTreeMap<i64, u64> },
    /// Duplication-level buckets: per bucket, the percentage of all reads
    /// contributed by its groups and the percentage of distinct sequences
    /// that are its groups.
    DuplicationLevels {
        percent_remaining: f64,
        total_percent: Vec<f64>,
        deduplicated_percent: Vec<f64>,
    },
    /// Overrepresented sequences, sorted by descending count.
    OverrepresentedList { entries: Vec<OverrepresentedEntry> },
    /// Adapter name -> per-position percentage of reads flagged.
    AdapterPercentages {
        per_adapter: IndexMap<String, Vec<f64>>,
    },
}

/// What every metric hands back: its series plus the verdict derived from
/// fixed thresholds over that series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricResult {
    pub series: MetricSeries,
    pub verdict: Verdict,
}

impl MetricResult {
    pub fn new(series: MetricSeries, verdict: Verdict) -> Self {
        MetricResult { series, verdict }
    }
}

/// Engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QcConfig {
    /// ASCII offset subtracted from quality characters. Fixed at 33 by
    /// default regardless of the detected encoding; the detector label is
    /// informational and does not gate score conversion.
    pub quality_offset: u8,
}

impl Default for QcConfig {
    fn default() -> Self {
        QcConfig { quality_offset: 33 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_display() {
        assert_eq!(Verdict::Good.to_string(), "good");
        assert_eq!(Verdict::Warning.to_string(), "warning");
        assert_eq!(Verdict::Failure.to_string(), "failure");
    }

    #[test]
    fn test_verdict_from_flags_precedence() {
        assert_eq!(Verdict::from_flags(true, true), Verdict::Failure);
        assert_eq!(Verdict::from_flags(false, true), Verdict::Warning);
        assert_eq!(Verdict::from_flags(false, false), Verdict::Good);
    }

    #[test]
    fn test_verdict_serializes_lowercase() {
        let json = serde_json::to_string(&Verdict::Warning).unwrap();
        assert_eq!(json, "\"warning\"");
    }

    #[test]
    fn test_default_quality_offset() {
        assert_eq!(QcConfig::default().quality_offset, 33);
    }
}
