//! Input validation utilities
//!
//! Validates the three positional inputs before any output is created. Each function
//! returns a structured [`Bam2FastqError`] describing the first problem found.

use crate::errors::{Bam2FastqError, Result};
use crate::filter::Threshold;
use std::ffi::OsStr;
use std::fs;
use std::path::Path;

/// Validate that the input exists and is a regular file
///
/// # Errors
/// Returns [`Bam2FastqError::InputNotFound`] if `path` is missing or is not a file
///
/// # Example
/// ```
/// use bam2fastq_lib::validation::validate_input_file;
///
/// assert!(validate_input_file("/nonexistent/reads.ccs.bam").is_err());
/// ```
pub fn validate_input_file<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(Bam2FastqError::InputNotFound { path: path.to_path_buf() });
    }
    Ok(())
}

/// Parse a read-quality threshold
///
/// Surrounding whitespace is ignored. The value must be a decimal number in [0, 1]; both
/// endpoints are accepted.
///
/// # Errors
/// Returns [`Bam2FastqError::ThresholdParse`] if `token` is not a number and
/// [`Bam2FastqError::ThresholdRange`] if it is outside [0, 1] (including NaN)
///
/// # Example
/// ```
/// use bam2fastq_lib::validation::parse_threshold;
///
/// assert_eq!(parse_threshold("0.99").unwrap().value(), 0.99);
/// assert!(parse_threshold("1.5").is_err());
/// assert!(parse_threshold("abc").is_err());
/// ```
pub fn parse_threshold(token: &str) -> Result<Threshold> {
    let value: f64 = token
        .trim()
        .parse()
        .map_err(|_| Bam2FastqError::ThresholdParse { value: token.to_string() })?;
    Threshold::new(value).ok_or(Bam2FastqError::ThresholdRange { value })
}

/// Parse a read-quality threshold straight from a command-line argument
///
/// # Errors
/// Returns [`Bam2FastqError::ThresholdParse`] if `arg` is not valid UTF-8, otherwise as
/// [`parse_threshold`]
pub fn parse_threshold_arg(arg: &OsStr) -> Result<Threshold> {
    let token = arg.to_str().ok_or_else(|| Bam2FastqError::ThresholdParse {
        value: arg.to_string_lossy().into_owned(),
    })?;
    parse_threshold(token)
}

/// Validate that nothing exists at the output path
///
/// Dangling symlinks count as existing so they are never written through.
///
/// # Errors
/// Returns [`Bam2FastqError::OutputExists`] if anything is present at `path`
pub fn validate_output_absent<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    if fs::symlink_metadata(path).is_ok() {
        return Err(Bam2FastqError::OutputExists { path: path.to_path_buf() });
    }
    Ok(())
}
