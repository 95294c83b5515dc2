//! Known-adapter contamination scanning.
//!
//! Each read is searched for every catalogued adapter, forward and
//! reverse-complement, by last-occurrence substring search. A hit flags
//! the read at every position from the match's final base through the
//! read's end, modelling cumulative 3' contamination rather than a single
//! point.

use crate::io::FastqRecord;
use crate::metrics::{MetricResult, MetricSeries, Verdict};
use indexmap::IndexMap;

/// Catalogue of library-preparation adapters searched in every read.
pub const KNOWN_ADAPTERS: [(&str, &str); 6] = [
    (
        "Illumina Universal Adapter",
        "AATGATACGGCGACCACCGAGATCTACACTCTTTCCCTACACGACGCTCTTCCGATCT",
    ),
    ("Illumina Small RNA 3' Adapter", "TGGAATTCTCGGGTGCCAAGG"),
    ("Illumina Small RNA 5' Adapter", "GUUCAGAGUUCUACAGUCCGACGAUC"),
    (
        "Nextera Transposase Sequence 1",
        "TCGTCGGCAGCGTCAGATGTGTATAAGAGACAG",
    ),
    (
        "Nextera Transposase Sequence 2",
        "GTCTCGTGGGCTCGGAGATGTGTATAAGAGACAG",
    ),
    (
        "SOLID Small RNA Adapter",
        "CCACTACGCCTCCGCTTTCCTCTCTATGGGCAGTCGGTGAT",
    ),
];

const ADAPTER_FRACTION_FAILURE: f64 = 0.10;
const ADAPTER_FRACTION_WARNING: f64 = 0.05;

/// Reverse complement with A<->T and C<->G swapped; any other character
/// (the small-RNA adapters carry U) passes through unchanged.
fn reverse_complement(adapter: &str) -> String {
    adapter
        .chars()
        .rev()
        .map(|c| match c {
            'A' => 'T',
            'T' => 'A',
            'C' => 'G',
            'G' => 'C',
            other => other,
        })
        .collect()
}

/// Per-adapter, per-position percentage of reads showing the adapter.
///
/// Searches are case-insensitive on the read side. The forward match wins
/// when forward and reverse-complement both occur. Matched adapters get a
/// dense series up to the longest read; adapters that never match still
/// get a zero-filled series as long as the shortest read, so consumers
/// never see missing positions. The verdict thresholds the highest
/// per-position flagged-read fraction across all adapters.
pub fn adapter_content(reads: &[FastqRecord]) -> MetricResult {
    let total = reads.len();
    let max_len = reads.iter().map(|r| r.sequence.len()).max().unwrap_or(0);
    let min_len = reads.iter().map(|r| r.sequence.len()).min().unwrap_or(0);

    let targets: Vec<(&str, &str, String)> = KNOWN_ADAPTERS
        .iter()
        .map(|&(name, sequence)| (name, sequence, reverse_complement(sequence)))
        .collect();

    let mut hit_counts: Vec<Vec<u64>> = vec![vec![0u64; max_len]; targets.len()];

    for read in reads {
        let sequence = read.sequence.to_ascii_uppercase();
        for (slot, (_, forward, reverse)) in targets.iter().enumerate() {
            let hit = sequence
                .rfind(forward)
                .map(|start| start + forward.len())
                .or_else(|| {
                    sequence
                        .rfind(reverse.as_str())
                        .map(|start| start + reverse.len())
                });
            if let Some(end) = hit {
                // Flag from the match's final base through the read's end.
                for position in (end - 1)..sequence.len() {
                    hit_counts[slot][position] += 1;
                }
            }
        }
    }

    let mut per_adapter: IndexMap<String, Vec<f64>> = IndexMap::new();
    let mut peak_count: u64 = 0;
    for ((name, _, _), counts) in targets.iter().zip(&hit_counts) {
        peak_count = peak_count.max(counts.iter().copied().max().unwrap_or(0));
        let series = if counts.iter().any(|&c| c > 0) {
            counts
                .iter()
                .map(|&c| 100.0 * c as f64 / total as f64)
                .collect()
        } else {
            vec![0.0; min_len]
        };
        per_adapter.insert((*name).to_string(), series);
    }

    let threshold_fraction = if total == 0 {
        0.0
    } else {
        peak_count as f64 / total as f64
    };

    let verdict = if threshold_fraction > ADAPTER_FRACTION_FAILURE {
        Verdict::Failure
    } else if threshold_fraction > ADAPTER_FRACTION_WARNING {
        Verdict::Warning
    } else {
        Verdict::Good
    };

    MetricResult::new(MetricSeries::AdapterPercentages { per_adapter }, verdict)
}
