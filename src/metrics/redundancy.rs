//! Redundancy metrics: exact-duplicate bucketing and
//! overrepresented-sequence detection.

use crate::io::FastqRecord;
use crate::metrics::{MetricResult, MetricSeries, OverrepresentedEntry, Verdict};
use indexmap::IndexMap;

/// Lower edges of the duplication-level buckets; each bucket is
/// `[lower[i], lower[i+1])` with the last one open-ended.
const BUCKET_LOWER: [u64; 16] = [
    1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 50, 100, 500, 1000, 5000, 10000,
];

const NON_UNIQUE_FAILURE: f64 = 50.0;
const NON_UNIQUE_WARNING: f64 = 20.0;

/// Overrepresentation cutoff: 0.1% of all reads.
const OVERREPRESENTED_MIN_FRACTION: f64 = 0.001;
const OVERREPRESENTED_FAILURE_PERCENT: f64 = 1.0;

/// Keys longer reads by a prefix so long-read data does not fragment into
/// all-unique keys.
const TRUNCATION_LENGTH: usize = 75;
const TRUNCATED_KEY_LENGTH: usize = 50;

/// Exact-duplicate grouping bucketed by group size.
///
/// Per bucket the series reports the percentage of all reads contributed
/// by its groups and the percentage of distinct sequences that are its
/// groups. The verdict thresholds the fraction of reads sitting in any
/// group of size above one. An empty collection yields zero-filled
/// buckets and `good`.
pub fn duplication_levels(reads: &[FastqRecord]) -> MetricResult {
    let mut groups: IndexMap<&str, u64> = IndexMap::new();
    for read in reads {
        *groups.entry(read.sequence.as_str()).or_insert(0) += 1;
    }

    let total = reads.len() as f64;
    let distinct = groups.len() as f64;

    if reads.is_empty() {
        let series = MetricSeries::DuplicationLevels {
            percent_remaining: 0.0,
            total_percent: vec![0.0; BUCKET_LOWER.len()],
            deduplicated_percent: vec![0.0; BUCKET_LOWER.len()],
        };
        return MetricResult::new(series, Verdict::Good);
    }

    let percent_remaining = (100.0 * distinct / total * 100.0).round() / 100.0;

    let mut total_percent = Vec::with_capacity(BUCKET_LOWER.len());
    let mut deduplicated_percent = Vec::with_capacity(BUCKET_LOWER.len());
    for (i, &low) in BUCKET_LOWER.iter().enumerate() {
        let high = BUCKET_LOWER.get(i + 1).copied().unwrap_or(u64::MAX);
        let in_bucket = groups.values().filter(|&&size| size >= low && size < high);
        let (reads_in_bucket, groups_in_bucket) =
            in_bucket.fold((0u64, 0u64), |(sum, n), &size| (sum + size, n + 1));
        total_percent.push(100.0 * reads_in_bucket as f64 / total);
        deduplicated_percent.push(100.0 * groups_in_bucket as f64 / distinct);
    }

    let duplicated_reads: u64 = groups.values().filter(|&&size| size > 1).sum();
    let non_unique_frac = 100.0 * duplicated_reads as f64 / total;

    let verdict = if non_unique_frac > NON_UNIQUE_FAILURE {
        Verdict::Failure
    } else if non_unique_frac > NON_UNIQUE_WARNING {
        Verdict::Warning
    } else {
        Verdict::Good
    };

    let series = MetricSeries::DuplicationLevels {
        percent_remaining,
        total_percent,
        deduplicated_percent,
    };
    MetricResult::new(series, verdict)
}

/// Counting key for one read: the first 50 characters when the sequence
/// is longer than 75 characters, the full sequence otherwise.
fn sequence_key(sequence: &str) -> &str {
    if sequence.chars().count() > TRUNCATION_LENGTH {
        match sequence.char_indices().nth(TRUNCATED_KEY_LENGTH) {
            Some((end, _)) => &sequence[..end],
            None => sequence,
        }
    } else {
        sequence
    }
}

/// Sequences (or 50-character prefixes of reads longer than 75) occurring
/// in at least 0.1% of all reads.
///
/// Keys are counted in first-seen order and stable-sorted by descending
/// count, so ties keep their file order. The kept list is a prefix of the
/// sorted order: collection stops at the first entry under the cutoff.
/// Verdict: `good` with no entries, `failure` when the top entry exceeds
/// 1%, `warning` otherwise.
pub fn overrepresented_sequences(reads: &[FastqRecord]) -> MetricResult {
    let total = reads.len() as f64;
    let mut counts: IndexMap<&str, u64> = IndexMap::new();
    for read in reads {
        *counts.entry(sequence_key(&read.sequence)).or_insert(0) += 1;
    }

    let mut ranked: Vec<(&str, u64)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    let mut entries = Vec::new();
    for (key, count) in ranked {
        let fraction = count as f64 / total;
        if fraction < OVERREPRESENTED_MIN_FRACTION {
            break;
        }
        entries.push(OverrepresentedEntry {
            sequence: key.to_string(),
            count,
            percentage: fraction * 100.0,
        });
    }

    let verdict = match entries.first() {
        None => Verdict::Good,
        Some(top) if top.percentage > OVERREPRESENTED_FAILURE_PERCENT => Verdict::Failure,
        Some(_) => Verdict::Warning,
    };

    MetricResult::new(MetricSeries::OverrepresentedList { entries }, verdict)
}
