//! Log formatting for the converter.
//!
//! Read counts, elapsed time and throughput are formatted here so every log line reads the
//! same way. The run summary and [`OperationTimer`] build on them.

use std::time::{Duration, Instant};

use crate::convert::RunStats;
use crate::filter::Threshold;

/// Formats a count with thousands separators.
///
/// # Examples
///
/// ```
/// use bam2fastq_lib::logging::format_count;
///
/// assert_eq!(format_count(0), "0");
/// assert_eq!(format_count(1_234_567), "1,234,567");
/// ```
#[must_use]
pub fn format_count(n: u64) -> String {
    let s = n.to_string();
    let mut out = String::with_capacity(s.len() + s.len() / 3);
    for (i, ch) in s.chars().enumerate() {
        if i > 0 && (s.len() - i).is_multiple_of(3) {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Formats elapsed wall time for log lines.
///
/// Sub-minute times keep one decimal; longer times are split into zero-padded units.
///
/// # Examples
///
/// ```
/// use bam2fastq_lib::logging::format_elapsed;
/// use std::time::Duration;
///
/// assert_eq!(format_elapsed(Duration::from_millis(2_500)), "2.5s");
/// assert_eq!(format_elapsed(Duration::from_secs(135)), "2m05s");
/// assert_eq!(format_elapsed(Duration::from_secs(3_720)), "1h02m");
/// ```
#[must_use]
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    match secs {
        0..60 => format!("{:.1}s", elapsed.as_secs_f64()),
        60..3600 => format!("{}m{:02}s", secs / 60, secs % 60),
        _ => format!("{}h{:02}m", secs / 3600, (secs % 3600) / 60),
    }
}

/// Formats a read throughput, or `None` when too little time has passed to measure one.
///
/// # Examples
///
/// ```
/// use bam2fastq_lib::logging::reads_per_second;
/// use std::time::Duration;
///
/// assert_eq!(reads_per_second(12_000, Duration::from_secs(4)).as_deref(), Some("3,000 reads/s"));
/// assert_eq!(reads_per_second(12_000, Duration::ZERO), None);
/// ```
#[must_use]
pub fn reads_per_second(reads: u64, elapsed: Duration) -> Option<String> {
    let secs = elapsed.as_secs_f64();
    (secs >= 0.001).then(|| format!("{} reads/s", format_count((reads as f64 / secs) as u64)))
}

/// Logs a summary of a conversion run.
pub fn log_conversion_summary(stats: &RunStats, threshold: Threshold) {
    log::info!("Conversion Summary:");
    log::info!("  Input reads: {}", format_count(stats.total_reads));
    log::info!("  Written reads: {}", format_count(stats.emitted_reads()));
    log::info!("  Filtered reads (rq <= {threshold}): {}", format_count(stats.filtered_reads));
    if stats.total_reads > 0 {
        log::info!("  Pass rate: {:.2}%", stats.pass_rate() * 100.0);
    }
}

/// Times one operation and logs its throughput in reads.
///
/// # Examples
///
/// ```no_run
/// use bam2fastq_lib::logging::OperationTimer;
///
/// let timer = OperationTimer::new("Converting CCS reads");
///
/// // ... do work ...
///
/// timer.log_completion(10_000);
/// ```
pub struct OperationTimer {
    operation: String,
    start_time: Instant,
}

impl OperationTimer {
    /// Creates a new operation timer and logs the start.
    #[must_use]
    pub fn new(operation: &str) -> Self {
        log::info!("{operation} started");
        Self { operation: operation.to_string(), start_time: Instant::now() }
    }

    /// Logs the elapsed time and throughput for `reads` processed reads.
    pub fn log_completion(&self, reads: u64) {
        let elapsed = self.start_time.elapsed();
        match reads_per_second(reads, elapsed) {
            Some(rate) => log::info!(
                "{} finished: {} reads in {} ({rate})",
                self.operation,
                format_count(reads),
                format_elapsed(elapsed)
            ),
            None => log::info!("{} finished: {} reads", self.operation, format_count(reads)),
        }
    }
}
