//! Plain-text rendering of a finished analysis.
//!
//! Consumes the engine's outputs (series and verdicts) without recomputing
//! anything; plots and HTML are deliberately out of scope.

use crate::metrics::MetricSeries;
use crate::pipeline::QcReport;

/// Human-readable titles, in report order, for the metric map's keys.
const METRIC_TITLES: [(&str, &str); 9] = [
    ("sequence_length_distribution", "Sequence length distribution"),
    ("gc_content", "Per sequence GC content"),
    ("n_content", "Per base N content"),
    ("per_base_sequence_content", "Per base sequence content"),
    ("per_base_quality", "Per base sequence quality"),
    ("per_sequence_quality", "Per sequence quality scores"),
    ("duplication_levels", "Sequence duplication levels"),
    ("overrepresented_sequences", "Overrepresented sequences"),
    ("adapter_content", "Adapter content"),
];

/// Formats the full text report for one analysis run.
pub fn render_text(report: &QcReport) -> String {
    let mut out = String::new();

    out.push_str(&format!("QC report for {}\n", report.source));
    out.push_str("=================================================\n\n");

    out.push_str("Summary:\n");
    out.push_str(&format!("  Total reads: {}\n", report.total_reads));
    out.push_str(&format!("  Encoding: {}\n", report.encoding));
    out.push_str(&format!(
        "  Read length: {} - {}\n",
        report.min_length, report.max_length
    ));
    out.push_str(&format!("  Overall GC content: {:.1}%\n\n", report.gc_percent));

    out.push_str("Checks:\n");
    for (key, title) in METRIC_TITLES {
        if let Some(result) = report.metrics.get(key) {
            out.push_str(&format!("  [{}] {}\n", result.verdict, title));
        }
    }
    out.push('\n');

    if let Some(result) = report.metrics.get("duplication_levels") {
        if let MetricSeries::DuplicationLevels {
            percent_remaining, ..
        } = &result.series
        {
            out.push_str(&format!(
                "Percent of sequences remaining if deduplicated: {:.2}%\n",
                percent_remaining
            ));
        }
    }

    if let Some(result) = report.metrics.get("overrepresented_sequences") {
        if let MetricSeries::OverrepresentedList { entries } = &result.series {
            if entries.is_empty() {
                out.push_str("No overrepresented sequences.\n");
            } else {
                out.push_str("Overrepresented sequences:\n");
                for entry in entries {
                    out.push_str(&format!(
                        "  {}  count={}  ({:.2}%)\n",
                        entry.sequence, entry.count, entry.percentage
                    ));
                }
            }
        }
    }

    out
}
