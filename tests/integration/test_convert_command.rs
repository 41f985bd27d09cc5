//! End-to-end tests for successful conversions.

use noodles::sam::alignment::record_buf::RecordBuf;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

use crate::helpers::{
    CcsRecordBuilder, assert_dir_entries, create_ccs_records, parse_fastq_records, write_ccs_bam,
};

fn run_bam2fastq(input: &Path, threshold: &str, output: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_bam2fastq"))
        .args([input.as_os_str(), threshold.as_ref(), output.as_os_str()])
        .output()
        .expect("Failed to run bam2fastq")
}

fn setup(records: &[RecordBuf]) -> (TempDir, PathBuf, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("reads.bam");
    let output = temp_dir.path().join("reads.fastq");
    write_ccs_bam(&input, records);
    (temp_dir, input, output)
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

#[test]
fn test_filters_at_threshold() {
    let records = vec![
        CcsRecordBuilder::new("m1/1/ccs", "ACGT").quals(&[0, 30, 40, 93]).rq(0.95).build(),
        CcsRecordBuilder::new("m1/2/ccs", "GGCC").rq(0.80).build(),
        CcsRecordBuilder::new("m1/3/ccs", "TTAA").rq(0.50).build(),
    ];
    let (_dir, input, output) = setup(&records);

    let result = run_bam2fastq(&input, "0.8", &output);
    assert!(result.status.success(), "stderr: {}", String::from_utf8_lossy(&result.stderr));
    assert_eq!(stdout(&result).trim_end(), "Parsed 3 reads and filtered out 2 for RQ <= 0.8");

    let fastq = fs::read_to_string(&output).unwrap();
    assert_eq!(fastq, "@m1/1/ccs\nACGT\n+\n!?I~\n");
}

#[test]
fn test_threshold_zero_keeps_positive_rq() {
    let records = create_ccs_records("ACGTACGT", &[0.0, 0.001, 0.5, 1.0]);
    let (_dir, input, output) = setup(&records);

    let result = run_bam2fastq(&input, "0", &output);
    assert!(result.status.success());
    assert!(stdout(&result).starts_with("Parsed 4 reads and filtered out 1 for RQ <= "));

    let names: Vec<String> = parse_fastq_records(&output).into_iter().map(|r| r.0).collect();
    assert_eq!(names, vec!["movie/1/ccs", "movie/2/ccs", "movie/3/ccs"]);
}

#[test]
fn test_threshold_one_filters_everything() {
    let records = create_ccs_records("ACGT", &[0.99, 1.0]);
    let (_dir, input, output) = setup(&records);

    let result = run_bam2fastq(&input, "1", &output);
    assert!(result.status.success());
    assert!(stdout(&result).starts_with("Parsed 2 reads and filtered out 2 for RQ <= "));
    assert_eq!(fs::read_to_string(&output).unwrap(), "");
}

#[test]
fn test_empty_input_creates_empty_output() {
    let (_dir, input, output) = setup(&[]);

    let result = run_bam2fastq(&input, "0.5", &output);
    assert!(result.status.success());
    assert!(stdout(&result).starts_with("Parsed 0 reads and filtered out 0"));
    assert!(output.exists());
    assert_eq!(fs::metadata(&output).unwrap().len(), 0);
}

#[test]
fn test_preserves_input_order() {
    let rqs = [0.99, 0.2, 0.97, 0.98, 0.1, 0.999, 0.3, 0.995];
    let records = create_ccs_records("ACGTTGCA", &rqs);
    let (_dir, input, output) = setup(&records);

    let result = run_bam2fastq(&input, "0.9", &output);
    assert!(result.status.success());

    let names: Vec<String> = parse_fastq_records(&output).into_iter().map(|r| r.0).collect();
    assert_eq!(
        names,
        vec!["movie/0/ccs", "movie/2/ccs", "movie/3/ccs", "movie/5/ccs", "movie/7/ccs"]
    );
}

#[test]
fn test_reverse_strand_restored() {
    let records = vec![
        CcsRecordBuilder::new("m1/5/ccs", "AACG").quals(&[10, 20, 30, 40]).rq(0.99).reverse(true).build(),
    ];
    let (_dir, input, output) = setup(&records);

    let result = run_bam2fastq(&input, "0.9", &output);
    assert!(result.status.success());

    let parsed = parse_fastq_records(&output);
    assert_eq!(parsed.len(), 1);
    assert_eq!(parsed[0].1, "CGTT");
    assert_eq!(parsed[0].2, "I?5+");
}

#[test]
fn test_gzip_output() {
    let records = create_ccs_records("ACGT", &[0.99, 0.5, 0.98]);
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("reads.bam");
    let output = temp_dir.path().join("reads.fastq.gz");
    write_ccs_bam(&input, &records);

    let result = run_bam2fastq(&input, "0.9", &output);
    assert!(result.status.success());

    let mut text = String::new();
    flate2::read::MultiGzDecoder::new(File::open(&output).unwrap())
        .read_to_string(&mut text)
        .unwrap();
    assert_eq!(text, "@movie/0/ccs\nACGT\n+\n????\n@movie/2/ccs\nACGT\n+\n????\n");
}

#[test]
fn test_no_stray_files() {
    let records = create_ccs_records("ACGT", &[0.99]);
    let (dir, input, output) = setup(&records);

    let result = run_bam2fastq(&input, "0.5", &output);
    assert!(result.status.success());
    assert_dir_entries(dir.path(), &["reads.bam", "reads.fastq"]);
}
