#![deny(unsafe_code)]
// Clippy lint configuration for CI
// - cast_*: read counts and thresholds are cast between numeric types on purpose
// - missing_errors_doc: anyhow-returning helpers document their errors in prose
#![allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::missing_errors_doc,
    clippy::uninlined_format_args
)]

//! # bam2fastq - PacBio CCS BAM to FASTQ conversion
//!
//! This library converts PacBio circular-consensus-sequence (CCS) reads stored in BAM into
//! FASTQ, keeping only reads whose predicted accuracy (`rq` tag) is above a threshold.
//!
//! ## Overview
//!
//! - **[`validation`]** - Checks on the input path, threshold and output path
//! - **[`bam_io`]** - Opens a CCS BAM and streams decoded [`ccs::CcsRead`]s
//! - **[`filter`]** - The read-quality gate ([`filter::Threshold`], [`filter::QualityFilter`])
//! - **[`fastq`]** - Phred+33 FASTQ encoding and the write-once [`fastq::FastqWriter`]
//! - **[`convert`]** - The streaming filter-and-convert loop and its [`convert::RunStats`]
//! - **[`errors`]** - Typed failures and their exit statuses
//! - **[`logging`]**, **[`progress`]** - Summary, timing and progress logging
//!
//! ## Quick Start
//!
//! ```no_run
//! use bam2fastq_lib::bam_io::{CcsBamReader, DecoderConfig};
//! use bam2fastq_lib::convert::filter_and_convert;
//! use bam2fastq_lib::fastq::FastqWriter;
//! use bam2fastq_lib::filter::QualityFilter;
//! use bam2fastq_lib::validation::parse_threshold;
//!
//! # fn main() -> anyhow::Result<()> {
//! let filter = QualityFilter::new(parse_threshold("0.99")?);
//! let reader = CcsBamReader::open("movie.ccs.bam", &DecoderConfig::default())?;
//! let mut writer = FastqWriter::create("movie.q20.fastq.gz")?;
//!
//! let stats = filter_and_convert(reader, &filter, &mut writer)?;
//! writer.finish()?;
//! println!("{stats}");
//! # Ok(())
//! # }
//! ```
//!
//! ## See Also
//!
//! - [noodles](https://github.com/zaeleus/noodles) - Rust bioinformatics I/O

pub mod bam_io;
pub mod ccs;
pub mod convert;
pub mod dna;
pub mod errors;
pub mod fastq;
pub mod filter;
pub mod logging;
pub mod progress;
pub mod validation;

pub use ccs::CcsRead;
pub use convert::{RunStats, filter_and_convert};
pub use errors::Bam2FastqError;
