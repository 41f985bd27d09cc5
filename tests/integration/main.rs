//! Integration tests for the bam2fastq binary.
//!
//! These tests write real CCS BAM files, run the compiled binary against them and check
//! the FASTQ it produces, its summary line and its exit status.

mod test_convert_command;
mod test_error_paths;
