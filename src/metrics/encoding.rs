//! Quality-score encoding detection.
//!
//! Scans every quality character in the collection, tracks the global
//! minimum and maximum ASCII codes, and classifies the range with ordered
//! first-match rules. The label is informational only; score conversion
//! elsewhere uses the configured offset.

use crate::io::FastqRecord;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Recognized quality-score encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Encoding {
    Phred33,
    Phred64,
    Solexa64,
    PacBio,
    Unknown,
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Encoding::Phred33 => "Phred+33",
            Encoding::Phred64 => "Phred+64",
            Encoding::Solexa64 => "Solexa+64",
            Encoding::PacBio => "PacBio",
            Encoding::Unknown => "Unknown",
        };
        write!(f, "{}", label)
    }
}

/// Infers the encoding from the observed ASCII range of quality scores.
///
/// Both extremes are true running extremes over all characters in all
/// records, so the result does not depend on record order. An empty
/// collection (or all-empty quality strings) yields [`Encoding::Unknown`].
pub fn detect_encoding(reads: &[FastqRecord]) -> Encoding {
    let mut min_code: Option<u8> = None;
    let mut max_code: Option<u8> = None;

    for read in reads {
        for &code in read.quality.as_bytes() {
            min_code = Some(min_code.map_or(code, |m| m.min(code)));
            max_code = Some(max_code.map_or(code, |m| m.max(code)));
        }
    }

    let (min, max) = match (min_code, max_code) {
        (Some(min), Some(max)) => (min, max),
        _ => return Encoding::Unknown,
    };

    if (33..59).contains(&min) && max <= 74 {
        Encoding::Phred33
    } else if min >= 64 && max > 73 && max <= 104 {
        Encoding::Phred64
    } else if (59..64).contains(&min) && max > 73 {
        Encoding::Solexa64
    } else if min >= 33 && max <= 104 {
        Encoding::PacBio
    } else {
        Encoding::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_with_quality(quality: &str) -> FastqRecord {
        FastqRecord {
            id: "@r".to_string(),
            sequence: "A".repeat(quality.len()),
            separator: "+".to_string(),
            quality: quality.to_string(),
        }
    }

    #[test]
    fn test_phred33_range() {
        // '!' = 33, 'I' = 73
        let reads = vec![read_with_quality("!I")];
        assert_eq!(detect_encoding(&reads), Encoding::Phred33);
    }

    #[test]
    fn test_phred64_range() {
        // '@' = 64, 'h' = 104
        let reads = vec![read_with_quality("@h")];
        assert_eq!(detect_encoding(&reads), Encoding::Phred64);
    }

    #[test]
    fn test_solexa64_range() {
        // ';' = 59, 'Z' = 90
        let reads = vec![read_with_quality(";Z")];
        assert_eq!(detect_encoding(&reads), Encoding::Solexa64);
    }

    #[test]
    fn test_pacbio_range() {
        // '!' = 33, 'Z' = 90: min below 59 but max above 74 falls through
        // the Phred+33 rule into the PacBio catch-all.
        let reads = vec![read_with_quality("!Z")];
        assert_eq!(detect_encoding(&reads), Encoding::PacBio);
    }

    #[test]
    fn test_out_of_range_is_unknown() {
        // 'z' = 122 exceeds every rule's ceiling
        let reads = vec![read_with_quality("!z")];
        assert_eq!(detect_encoding(&reads), Encoding::Unknown);
    }

    #[test]
    fn test_empty_collection_is_unknown() {
        assert_eq!(detect_encoding(&[]), Encoding::Unknown);
    }

    #[test]
    fn test_all_empty_quality_strings_are_unknown() {
        let reads = vec![read_with_quality(""), read_with_quality("")];
        assert_eq!(detect_encoding(&reads), Encoding::Unknown);
    }

    #[test]
    fn test_order_independent() {
        let forward = vec![read_with_quality("!!"), read_with_quality("II")];
        let reversed: Vec<_> = forward.iter().rev().cloned().collect();
        assert_eq!(detect_encoding(&forward), detect_encoding(&reversed));
    }

    #[test]
    fn test_display_labels() {
        assert_eq!(Encoding::Phred33.to_string(), "Phred+33");
        assert_eq!(Encoding::Solexa64.to_string(), "Solexa+64");
        assert_eq!(Encoding::Unknown.to_string(), "Unknown");
    }
}
