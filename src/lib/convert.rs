//! The streaming filter-and-convert loop.
//!
//! Reads are pulled one at a time from the decoder, gated on read quality, and accepted reads
//! are handed to a [`ReadSink`] before the next read is requested. Nothing is buffered or
//! reordered: output order is decode order restricted to accepted reads.

use anyhow::Result;
use std::fmt;

use crate::ccs::CcsRead;
use crate::fastq::ReadSink;
use crate::filter::QualityFilter;
use crate::progress::ProgressTracker;

/// Counts for one conversion run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Total reads decoded
    pub total_reads: u64,
    /// Reads at or below the threshold
    pub filtered_reads: u64,
}

impl RunStats {
    /// Creates an empty set of counts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads written to the output.
    #[must_use]
    pub fn emitted_reads(&self) -> u64 {
        self.total_reads - self.filtered_reads
    }

    /// Fraction of reads that passed the filter (0 when no reads were seen).
    #[must_use]
    pub fn pass_rate(&self) -> f64 {
        if self.total_reads == 0 {
            0.0
        } else {
            self.emitted_reads() as f64 / self.total_reads as f64
        }
    }
}

impl fmt::Display for RunStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Parsed {} reads and filtered out {}", self.total_reads, self.filtered_reads)
    }
}

/// Filters `reads` and writes the accepted ones to `sink`.
///
/// Every read is either written or counted as filtered. The first decode or write error stops
/// the run and is returned unchanged.
///
/// # Errors
///
/// Returns the first error produced by `reads` or by `sink`.
///
/// # Examples
///
/// ```
/// use bam2fastq_lib::ccs::CcsRead;
/// use bam2fastq_lib::convert::filter_and_convert;
/// use bam2fastq_lib::fastq::ReadSink;
/// use bam2fastq_lib::filter::{QualityFilter, Threshold};
///
/// struct Names(Vec<String>);
/// impl ReadSink for Names {
///     fn write_read(&mut self, read: &CcsRead) -> anyhow::Result<()> {
///         self.0.push(read.name().to_string());
///         Ok(())
///     }
/// }
///
/// let reads = [0.95, 0.80, 0.50]
///     .into_iter()
///     .enumerate()
///     .map(|(i, rq)| CcsRead::new(format!("r{i}"), b"A".to_vec(), vec![30], rq));
///
/// let mut sink = Names(Vec::new());
/// let filter = QualityFilter::new(Threshold::new(0.8).unwrap());
/// let stats = filter_and_convert(reads, &filter, &mut sink).unwrap();
///
/// assert_eq!(sink.0, vec!["r0"]);
/// assert_eq!((stats.total_reads, stats.filtered_reads), (3, 2));
/// ```
pub fn filter_and_convert<I, S>(reads: I, filter: &QualityFilter, sink: &mut S) -> Result<RunStats>
where
    I: IntoIterator<Item = Result<CcsRead>>,
    S: ReadSink + ?Sized,
{
    let mut progress = ProgressTracker::new("Processed CCS reads").with_interval(100_000);
    let mut stats = RunStats::new();

    for read in reads {
        let read = read?;
        stats.total_reads += 1;

        if filter.accepts(read.rq()) {
            sink.write_read(&read)?;
        } else {
            stats.filtered_reads += 1;
        }

        progress.log_if_needed(1);
    }

    progress.log_final();
    Ok(stats)
}
