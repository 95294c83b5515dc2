//! Line-oriented FASTQ reading.
//!
//! A FASTQ record is four consecutive lines: identifier, base sequence,
//! separator, and per-base quality string. The reader groups lines into
//! records and refuses input whose line count is not a multiple of four;
//! a trailing partial record is an error, never silently dropped.
//!
//! No further validation happens here. Sequence/quality length mismatches
//! are left for the metrics to tolerate positionally.

use flate2::read::MultiGzDecoder;
use log::info;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FastqError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("truncated FASTQ input: {0} trailing line(s) do not form a complete record")]
    TruncatedInput(usize),
}

/// One sequencing read. All fields are kept verbatim (minus trailing
/// whitespace), including the separator line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastqRecord {
    pub id: String,
    pub sequence: String,
    pub separator: String,
    pub quality: String,
}

/// Reads every record from a FASTQ file, plain or gzip-compressed.
///
/// Compression is chosen by the `.gz` extension. The whole collection is
/// materialized in memory; record order is file order.
pub fn read_fastq_file(path: impl AsRef<Path>) -> Result<Vec<FastqRecord>, FastqError> {
    let path = path.as_ref();
    let file = File::open(path)?;

    let is_gzip = path
        .extension()
        .and_then(|e| e.to_str())
        .map_or(false, |e| e.eq_ignore_ascii_case("gz"));

    let records = if is_gzip {
        parse_reader(BufReader::new(MultiGzDecoder::new(file)))?
    } else {
        parse_reader(BufReader::new(file))?
    };

    info!("Read {} record(s) from {}", records.len(), path.display());
    Ok(records)
}

/// Parses FASTQ records from any readable source.
///
/// Trailing whitespace (including `\r`) is stripped from every line. Fails
/// with [`FastqError::TruncatedInput`] when the line count is not a
/// multiple of four, returning no partial collection.
pub fn parse_reader<R: Read>(reader: BufReader<R>) -> Result<Vec<FastqRecord>, FastqError> {
    let mut records = Vec::new();
    let mut pending: Vec<String> = Vec::with_capacity(4);

    for line in reader.lines() {
        let line = line?;
        pending.push(line.trim_end().to_string());

        if pending.len() == 4 {
            let mut chunk = pending.drain(..);
            records.push(FastqRecord {
                id: chunk.next().unwrap_or_default(),
                sequence: chunk.next().unwrap_or_default(),
                separator: chunk.next().unwrap_or_default(),
                quality: chunk.next().unwrap_or_default(),
            });
        }
    }

    if !pending.is_empty() {
        return Err(FastqError::TruncatedInput(pending.len()));
    }

    Ok(records)
}
