//! Custom error types for bam2fastq operations.
//!
//! Argument and validation failures carry no side effects and are reported as a single
//! diagnostic line. [`Bam2FastqError::DecoderUnavailable`] is raised while opening the input and
//! is reported with remediation guidance. Everything else travels as an [`anyhow::Error`] with
//! its causal chain.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for bam2fastq operations
pub type Result<T> = std::result::Result<T, Bam2FastqError>;

/// Exit status for a successful run or a help request.
pub const EXIT_SUCCESS: u8 = 0;
/// Exit status for any failure not covered by a typed error.
pub const EXIT_FATAL: u8 = 1;
/// Exit status for a wrong number of arguments.
pub const EXIT_USAGE: u8 = 2;
/// Exit status for a failed input, threshold or output check.
pub const EXIT_VALIDATION: u8 = 3;
/// Exit status when no decoder is available for the input.
pub const EXIT_DECODER_UNAVAILABLE: u8 = 4;

/// Error type for bam2fastq operations
#[derive(Error, Debug)]
pub enum Bam2FastqError {
    /// Wrong number of positional arguments
    #[error("Expected 3 arguments (INPUT THRESHOLD OUTPUT), got {found}")]
    ArgumentCount {
        /// Number of arguments supplied
        found: usize,
    },

    /// Input path is missing or not a regular file
    #[error("Can't find file: {}", path.display())]
    InputNotFound {
        /// The input path
        path: PathBuf,
    },

    /// Threshold token is not a decimal number
    #[error(
        "Could not parse minimum threshold from: '{value}', expected decimal number in [0,1] interval"
    )]
    ThresholdParse {
        /// The raw threshold token
        value: String,
    },

    /// Threshold parsed but lies outside [0,1]
    #[error("Minimum RQ value: {value} was not in [0,1] interval")]
    ThresholdRange {
        /// The parsed threshold
        value: f64,
    },

    /// Output path already exists
    #[error(
        "The output file '{}' already exists, please specify a new name or delete the old one",
        path.display()
    )]
    OutputExists {
        /// The output path
        path: PathBuf,
    },

    /// No decoder for the input's container format
    #[error("No decoder available for {format} input '{}'", path.display())]
    DecoderUnavailable {
        /// Detected container format (e.g., "CRAM")
        format: String,
        /// The input path
        path: PathBuf,
        /// What the user can do about it
        remediation: String,
    },
}

impl Bam2FastqError {
    /// Process exit status for this error.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::ArgumentCount { .. } => EXIT_USAGE,
            Self::InputNotFound { .. }
            | Self::ThresholdParse { .. }
            | Self::ThresholdRange { .. }
            | Self::OutputExists { .. } => EXIT_VALIDATION,
            Self::DecoderUnavailable { .. } => EXIT_DECODER_UNAVAILABLE,
        }
    }
}
