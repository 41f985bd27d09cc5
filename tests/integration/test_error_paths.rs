//! Exit statuses and diagnostics for invalid invocations and unreadable input.

use noodles::sam::alignment::record_buf::data::field::Value;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

use crate::helpers::{
    CcsRecordBuilder, assert_dir_entries, assert_exit_code, create_ccs_records, write_ccs_bam,
};

fn run(args: &[&str], cwd: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_bam2fastq"))
        .args(args)
        .current_dir(cwd)
        .output()
        .expect("Failed to run bam2fastq")
}

#[test]
fn test_help_tokens_exit_zero() {
    let temp_dir = TempDir::new().unwrap();
    for token in ["h", "help", "?", "-h"] {
        let output = run(&[token, "x.bam", "0.5", "out.fq"], temp_dir.path());
        assert_exit_code(&output, 0);
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("THRESHOLD"), "usage missing for {token}");
    }

    let output = run(&["help"], temp_dir.path());
    assert_exit_code(&output, 0);
    assert_dir_entries(temp_dir.path(), &[]);
}

#[test]
fn test_wrong_argument_count() {
    let temp_dir = TempDir::new().unwrap();

    for args in [&[][..], &["a.bam"][..], &["a.bam", "0.5"][..], &["a", "b", "c", "d"][..]] {
        let output = run(args, temp_dir.path());
        let stderr = assert_exit_code(&output, 2);
        assert!(stderr.contains("Expected 3 arguments"), "stderr: {stderr}");
        assert!(stderr.contains("INPUT"));
    }
    assert_dir_entries(temp_dir.path(), &[]);
}

#[test]
fn test_missing_input() {
    let temp_dir = TempDir::new().unwrap();
    let output = run(&["missing.bam", "0.5", "out.fq"], temp_dir.path());
    let stderr = assert_exit_code(&output, 3);
    assert!(stderr.contains("Can't find file"));
    assert_dir_entries(temp_dir.path(), &[]);
}

#[test]
fn test_bad_thresholds() {
    let temp_dir = TempDir::new().unwrap();
    write_ccs_bam(&temp_dir.path().join("in.bam"), &create_ccs_records("ACGT", &[0.9]));

    let cases = [
        ("abc", "Could not parse minimum threshold from: 'abc'"),
        ("1.5", "Minimum RQ value: 1.5 was not in [0,1] interval"),
        ("-0.2", "Minimum RQ value: -0.2 was not in [0,1] interval"),
    ];
    for (threshold, message) in cases {
        let output = run(&["in.bam", threshold, "out.fq"], temp_dir.path());
        let stderr = assert_exit_code(&output, 3);
        assert!(stderr.contains(message), "stderr for {threshold}: {stderr}");
    }
    assert_dir_entries(temp_dir.path(), &["in.bam"]);
}

#[test]
fn test_escape_token_reaches_validation() {
    let temp_dir = TempDir::new().unwrap();
    write_ccs_bam(&temp_dir.path().join("in.bam"), &create_ccs_records("ACGT", &[0.9]));

    let output = run(&["in.bam", "--", "out.fq"], temp_dir.path());
    let stderr = assert_exit_code(&output, 3);
    assert!(stderr.contains("Could not parse minimum threshold from: '--'"), "stderr: {stderr}");
    assert!(!stderr.contains("Expected 3 arguments"));
    assert_dir_entries(temp_dir.path(), &["in.bam"]);
}

#[cfg(unix)]
#[test]
fn test_non_utf8_threshold_is_validation_error() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let temp_dir = TempDir::new().unwrap();
    write_ccs_bam(&temp_dir.path().join("in.bam"), &create_ccs_records("ACGT", &[0.9]));

    let output = Command::new(env!("CARGO_BIN_EXE_bam2fastq"))
        .arg("in.bam")
        .arg(OsStr::from_bytes(b"\xff"))
        .arg("out.fq")
        .current_dir(temp_dir.path())
        .output()
        .expect("Failed to run bam2fastq");
    let stderr = assert_exit_code(&output, 3);
    assert!(stderr.contains("Could not parse minimum threshold"), "stderr: {stderr}");
    assert_dir_entries(temp_dir.path(), &["in.bam"]);
}

#[test]
fn test_existing_output_untouched() {
    let temp_dir = TempDir::new().unwrap();
    write_ccs_bam(&temp_dir.path().join("in.bam"), &create_ccs_records("ACGT", &[0.9]));
    fs::write(temp_dir.path().join("out.fq"), "keep me").unwrap();

    let output = run(&["in.bam", "0.5", "out.fq"], temp_dir.path());
    let stderr = assert_exit_code(&output, 3);
    assert!(stderr.contains("already exists"));
    assert_eq!(fs::read_to_string(temp_dir.path().join("out.fq")).unwrap(), "keep me");
}

#[test]
fn test_cram_input_reports_decoder_unavailable() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("in.cram"), b"CRAM\x03\x01not really a cram file").unwrap();

    let output = run(&["in.cram", "0.5", "out.fq"], temp_dir.path());
    let stderr = assert_exit_code(&output, 4);
    assert!(stderr.contains("Error thrown when attempting to decode the CCS reads"));
    assert!(stderr.contains("samtools view -b"));
    assert_dir_entries(temp_dir.path(), &["in.cram"]);
}

#[test]
fn test_missing_rq_removes_partial_output() {
    let temp_dir = TempDir::new().unwrap();
    let records = vec![
        CcsRecordBuilder::new("m1/1/ccs", "ACGT").rq(0.99).build(),
        CcsRecordBuilder::new("m1/2/ccs", "ACGT").build(),
    ];
    write_ccs_bam(&temp_dir.path().join("in.bam"), &records);

    let output = run(&["in.bam", "0.5", "out.fq"], temp_dir.path());
    let stderr = assert_exit_code(&output, 1);
    assert!(stderr.contains("Error thrown when attempting to generate the FASTQ file"));
    assert!(stderr.contains("rq"), "stderr: {stderr}");
    assert_dir_entries(temp_dir.path(), &["in.bam"]);
}

#[test]
fn test_integer_rq_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let records = vec![CcsRecordBuilder::new("m1/1/ccs", "ACGT").rq_value(Value::Int32(1)).build()];
    write_ccs_bam(&temp_dir.path().join("in.bam"), &records);

    let output = run(&["in.bam", "0.5", "out.fq"], temp_dir.path());
    assert_exit_code(&output, 1);
    assert_dir_entries(temp_dir.path(), &["in.bam"]);
}

#[test]
fn test_truncated_bam_is_fatal() {
    let temp_dir = TempDir::new().unwrap();
    let full = temp_dir.path().join("full.bam");
    write_ccs_bam(&full, &create_ccs_records("ACGTACGTACGT", &[0.99; 50]));
    let bytes = fs::read(&full).unwrap();
    fs::write(temp_dir.path().join("in.bam"), &bytes[..bytes.len() / 2]).unwrap();
    fs::remove_file(&full).unwrap();

    let output = run(&["in.bam", "0.5", "out.fq"], temp_dir.path());
    assert_exit_code(&output, 1);
    assert_dir_entries(temp_dir.path(), &["in.bam"]);
}
