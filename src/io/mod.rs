//! Input/Output operations module.
//!
//! Reading FASTQ input is the only I/O the engine performs itself;
//! result serialization goes through serde at the caller's request.

pub mod fastq; // Sub-module specifically for FASTQ handling

pub use fastq::{read_fastq_file, FastqError, FastqRecord};
