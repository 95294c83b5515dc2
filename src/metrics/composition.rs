//! Sequence-composition metrics: length distribution, GC content,
//! N content, and per-base nucleotide proportions.

use crate::io::FastqRecord;
use crate::metrics::{MetricResult, MetricSeries, Verdict};
use itertools::{Itertools, MinMaxResult};
use statrs::distribution::{Continuous, Normal};
use statrs::statistics::{Data, OrderStatistics, Statistics};
use std::collections::BTreeMap;

/// Unit-width GC% buckets covering 0..99.
const GC_BUCKETS: usize = 99;

const GC_DEVIATION_FAILURE: f64 = 30.0;
const GC_DEVIATION_WARNING: f64 = 15.0;

const N_PERCENT_FAILURE: f64 = 20.0;
const N_PERCENT_WARNING: f64 = 5.0;

const BASE_IMBALANCE_FAILURE: f64 = 20.0;
const BASE_IMBALANCE_WARNING: f64 = 10.0;

/// Frequency histogram of read lengths.
///
/// Verdict: `failure` when any read has length zero, `warning` when the
/// lengths are not all identical, `good` otherwise (including the empty
/// collection).
pub fn length_distribution(reads: &[FastqRecord]) -> MetricResult {
    let mut counts: BTreeMap<usize, u64> = BTreeMap::new();
    for read in reads {
        *counts.entry(read.sequence.len()).or_insert(0) += 1;
    }

    let verdict = if counts.contains_key(&0) {
        Verdict::Failure
    } else if counts.len() > 1 {
        Verdict::Warning
    } else {
        Verdict::Good
    };

    MetricResult::new(MetricSeries::LengthHistogram { counts }, verdict)
}

/// Minimum and maximum read length, `None` for an empty collection.
/// Reported as a summary scalar, independent of any verdict.
pub fn length_range(reads: &[FastqRecord]) -> Option<(usize, usize)> {
    match reads.iter().map(|r| r.sequence.len()).minmax() {
        MinMaxResult::NoElements => None,
        MinMaxResult::OneElement(len) => Some((len, len)),
        MinMaxResult::MinMax(min, max) => Some((min, max)),
    }
}

/// GC percentage of a single non-empty sequence, case-insensitive.
fn gc_percent_of(sequence: &str) -> f64 {
    let gc = sequence
        .bytes()
        .filter(|b| matches!(b.to_ascii_uppercase(), b'G' | b'C'))
        .count();
    100.0 * gc as f64 / sequence.len() as f64
}

/// Whole-file GC percentage: G/C bases over all bases, one-decimal
/// rounding. `0.0` when the file contains no bases.
pub fn overall_gc_percent(reads: &[FastqRecord]) -> f64 {
    let mut gc_bases = 0u64;
    let mut total_bases = 0u64;
    for read in reads {
        for b in read.sequence.bytes() {
            total_bases += 1;
            if matches!(b.to_ascii_uppercase(), b'G' | b'C') {
                gc_bases += 1;
            }
        }
    }

    if total_bases == 0 {
        return 0.0;
    }
    (100.0 * gc_bases as f64 / total_bases as f64 * 10.0).round() / 10.0
}

/// Empirical GC% distribution against a fitted Gaussian.
///
/// The empirical curve counts per-read GC% values into unit-width buckets
/// (`[i, i+1]`, both ends inclusive). The theoretical curve is a Normal
/// density located at the sample median with the population standard
/// deviation as scale, scaled by the read count. The verdict thresholds
/// the mean absolute deviation between the two curves, expressed as a
/// percentage of the read count.
///
/// Zero-length reads carry no GC value and are skipped. When the spread
/// is zero (or nothing remains), the theoretical curve is all zeros and
/// the deviation is defined as zero.
pub fn gc_distribution(reads: &[FastqRecord]) -> MetricResult {
    let gc: Vec<f64> = reads
        .iter()
        .filter(|r| !r.sequence.is_empty())
        .map(|r| gc_percent_of(&r.sequence))
        .collect();

    if gc.is_empty() {
        let series = MetricSeries::GcDistribution {
            empirical: vec![0.0; GC_BUCKETS],
            theoretical: vec![0.0; GC_BUCKETS],
            deviation: 0.0,
        };
        return MetricResult::new(series, Verdict::Good);
    }

    let read_count = gc.len() as f64;

    let empirical: Vec<f64> = (0..GC_BUCKETS)
        .map(|i| {
            let low = i as f64;
            let high = low + 1.0;
            gc.iter().filter(|&&v| v >= low && v <= high).count() as f64
        })
        .collect();

    let center = Data::new(gc.clone()).median();
    let spread = gc.iter().population_std_dev();

    let fitted = if spread > 0.0 {
        Normal::new(center, spread).ok()
    } else {
        None
    };

    let (theoretical, deviation) = match fitted {
        Some(normal) => {
            let curve: Vec<f64> = (0..GC_BUCKETS)
                .map(|i| normal.pdf(i as f64) * read_count)
                .collect();
            let total: f64 = empirical
                .iter()
                .zip(&curve)
                .map(|(e, t)| (e - t).abs())
                .sum();
            (curve, total / read_count * 100.0)
        }
        None => (vec![0.0; GC_BUCKETS], 0.0),
    };

    let verdict = if deviation > GC_DEVIATION_FAILURE {
        Verdict::Failure
    } else if deviation > GC_DEVIATION_WARNING {
        Verdict::Warning
    } else {
        Verdict::Good
    };

    let series = MetricSeries::GcDistribution {
        empirical,
        theoretical,
        deviation,
    };
    MetricResult::new(series, verdict)
}

/// Per-position N percentage.
///
/// A read shorter than a position contributes to neither the numerator
/// nor the denominator there, so every reported position is backed by at
/// least one read.
pub fn n_content(reads: &[FastqRecord]) -> MetricResult {
    let max_len = reads.iter().map(|r| r.sequence.len()).max().unwrap_or(0);
    let mut n_counts = vec![0u64; max_len];
    let mut reads_at = vec![0u64; max_len];

    for read in reads {
        for (i, b) in read.sequence.bytes().enumerate() {
            reads_at[i] += 1;
            if b.eq_ignore_ascii_case(&b'N') {
                n_counts[i] += 1;
            }
        }
    }

    let percent: Vec<f64> = (0..max_len)
        .map(|i| 100.0 * n_counts[i] as f64 / reads_at[i] as f64)
        .collect();

    let has_failure = percent.iter().any(|&p| p > N_PERCENT_FAILURE);
    let has_warning = percent.iter().any(|&p| p > N_PERCENT_WARNING);

    MetricResult::new(
        MetricSeries::PositionPercentages { percent },
        Verdict::from_flags(has_failure, has_warning),
    )
}

/// Per-position A/T/G/C proportions.
///
/// Proportions are taken over the A/T/G/C total at each position
/// (case-insensitive; N and other letters are excluded from the
/// denominator). A position whose A/T/G/C total is zero reports four
/// zeros and is left out of the verdict. The verdict thresholds the
/// worst `|%A - %T|` and `|%G - %C|` imbalance across positions.
pub fn base_proportions(reads: &[FastqRecord]) -> MetricResult {
    let max_len = reads.iter().map(|r| r.sequence.len()).max().unwrap_or(0);
    let mut a_counts = vec![0u64; max_len];
    let mut t_counts = vec![0u64; max_len];
    let mut g_counts = vec![0u64; max_len];
    let mut c_counts = vec![0u64; max_len];

    for read in reads {
        for (i, b) in read.sequence.bytes().enumerate() {
            match b.to_ascii_uppercase() {
                b'A' => a_counts[i] += 1,
                b'T' => t_counts[i] += 1,
                b'G' => g_counts[i] += 1,
                b'C' => c_counts[i] += 1,
                _ => {}
            }
        }
    }

    let mut a = vec![0.0; max_len];
    let mut t = vec![0.0; max_len];
    let mut g = vec![0.0; max_len];
    let mut c = vec![0.0; max_len];
    let mut has_failure = false;
    let mut has_warning = false;

    for i in 0..max_len {
        let total = a_counts[i] + t_counts[i] + g_counts[i] + c_counts[i];
        if total == 0 {
            continue;
        }
        let total = total as f64;
        a[i] = 100.0 * a_counts[i] as f64 / total;
        t[i] = 100.0 * t_counts[i] as f64 / total;
        g[i] = 100.0 * g_counts[i] as f64 / total;
        c[i] = 100.0 * c_counts[i] as f64 / total;

        let at_gap = (a[i] - t[i]).abs();
        let gc_gap = (g[i] - c[i]).abs();
        if at_gap > BASE_IMBALANCE_FAILURE || gc_gap > BASE_IMBALANCE_FAILURE {
            has_failure = true;
        }
        if at_gap > BASE_IMBALANCE_WARNING || gc_gap > BASE_IMBALANCE_WARNING {
            has_warning = true;
        }
    }

    MetricResult::new(
        MetricSeries::BaseProportions { a, t, g, c },
        Verdict::from_flags(has_failure, has_warning),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn read(sequence: &str) -> FastqRecord {
        FastqRecord {
            id: "@r".to_string(),
            sequence: sequence.to_string(),
            separator: "+".to_string(),
            quality: "I".repeat(sequence.len()),
        }
    }

    #[test]
    fn test_length_distribution_uniform_is_good() {
        let reads = vec![read("ACGT"); 4];
        let result = length_distribution(&reads);
        assert_eq!(result.verdict, Verdict::Good);
        match result.series {
            MetricSeries::LengthHistogram { counts } => {
                assert_eq!(counts.get(&4), Some(&4));
                assert_eq!(counts.len(), 1);
            }
            other => panic!("unexpected series: {other:?}"),
        }
    }

    #[test]
    fn test_length_distribution_mixed_is_warning() {
        let reads = vec![read("ACGT"), read("ACGTA")];
        assert_eq!(length_distribution(&reads).verdict, Verdict::Warning);
    }

    #[test]
    fn test_length_distribution_zero_length_is_failure() {
        let reads = vec![read("ACGT"), read("")];
        assert_eq!(length_distribution(&reads).verdict, Verdict::Failure);
    }

    #[test]
    fn test_length_range() {
        let reads = vec![read("ACGT"), read("AC"), read("ACGTAC")];
        assert_eq!(length_range(&reads), Some((2, 6)));
        assert_eq!(length_range(&[]), None);
    }

    #[test]
    fn test_overall_gc_percent_half() {
        let reads = vec![read("ACGT"); 4];
        assert_relative_eq!(overall_gc_percent(&reads), 50.0);
    }

    #[test]
    fn test_overall_gc_percent_case_insensitive() {
        let reads = vec![read("acgt")];
        assert_relative_eq!(overall_gc_percent(&reads), 50.0);
    }

    #[test]
    fn test_overall_gc_percent_rounds_to_one_decimal() {
        // 1 GC base over 3 -> 33.333..% -> 33.3
        let reads = vec![read("AAG")];
        assert_relative_eq!(overall_gc_percent(&reads), 33.3);
    }

    #[test]
    fn test_overall_gc_percent_empty() {
        assert_relative_eq!(overall_gc_percent(&[]), 0.0);
    }

    #[test]
    fn test_gc_distribution_zero_spread_is_good() {
        let reads = vec![read("ACGT"); 10];
        let result = gc_distribution(&reads);
        assert_eq!(result.verdict, Verdict::Good);
        match result.series {
            MetricSeries::GcDistribution { deviation, .. } => {
                assert_relative_eq!(deviation, 0.0);
            }
            other => panic!("unexpected series: {other:?}"),
        }
    }

    #[test]
    fn test_gc_distribution_bimodal_is_failure() {
        // Half the reads at 0% GC and half at 100% are as far from a
        // Gaussian as it gets.
        let mut reads = vec![read("AAAA"); 5];
        reads.extend(vec![read("GGGG"); 5]);
        let result = gc_distribution(&reads);
        assert_eq!(result.verdict, Verdict::Failure);
    }

    #[test]
    fn test_gc_distribution_empty_collection() {
        let result = gc_distribution(&[]);
        assert_eq!(result.verdict, Verdict::Good);
        match result.series {
            MetricSeries::GcDistribution { empirical, .. } => {
                assert_eq!(empirical.len(), 99);
                assert!(empirical.iter().all(|&v| v == 0.0));
            }
            other => panic!("unexpected series: {other:?}"),
        }
    }

    #[test]
    fn test_n_content_thresholds() {
        // 1 N in 10 reads at position 0 -> 10% > 5% warning threshold
        let mut reads = vec![read("ACGT"); 9];
        reads.push(read("NCGT"));
        let result = n_content(&reads);
        assert_eq!(result.verdict, Verdict::Warning);

        // 3 N in 10 -> 30% > 20% failure threshold
        let mut reads = vec![read("ACGT"); 7];
        reads.extend(vec![read("NCGT"); 3]);
        assert_eq!(n_content(&reads).verdict, Verdict::Failure);
    }

    #[test]
    fn test_n_content_short_reads_excluded_positionally() {
        // The long read is alone at position 4, and carries N there: 100%.
        let reads = vec![read("ACGT"), read("ACGTN")];
        let result = n_content(&reads);
        match result.series {
            MetricSeries::PositionPercentages { percent } => {
                assert_eq!(percent.len(), 5);
                assert_relative_eq!(percent[0], 0.0);
                assert_relative_eq!(percent[4], 100.0);
            }
            other => panic!("unexpected series: {other:?}"),
        }
        assert_eq!(result.verdict, Verdict::Failure);
    }

    #[test]
    fn test_base_proportions_balanced() {
        // Every position sees each base exactly once across the 4 reads.
        let reads = vec![read("ACGT"), read("CGTA"), read("GTAC"), read("TACG")];
        let result = base_proportions(&reads);
        assert_eq!(result.verdict, Verdict::Good);
        match result.series {
            MetricSeries::BaseProportions { a, t, g, c } => {
                for i in 0..4 {
                    assert_relative_eq!(a[i] + t[i] + g[i] + c[i], 100.0);
                    assert_relative_eq!(a[i], 25.0);
                }
            }
            other => panic!("unexpected series: {other:?}"),
        }
    }

    #[test]
    fn test_base_proportions_skew_is_failure() {
        let reads = vec![read("AAAA"); 3];
        assert_eq!(base_proportions(&reads).verdict, Verdict::Failure);
    }

    #[test]
    fn test_base_proportions_all_n_position_reports_zeros() {
        let reads = vec![read("ACGN"), read("ACGN")];
        let result = base_proportions(&reads);
        match result.series {
            MetricSeries::BaseProportions { a, t, g, c } => {
                assert_relative_eq!(a[3] + t[3] + g[3] + c[3], 0.0);
            }
            other => panic!("unexpected series: {other:?}"),
        }
    }
}
