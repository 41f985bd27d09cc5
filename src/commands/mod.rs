//! CLI command implementations for bam2fastq.
//!
//! - [`bam2fastq`] - Convert CCS BAM to FASTQ with an RQ filter

pub mod bam2fastq;
pub mod command;
