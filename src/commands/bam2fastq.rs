//! Convert PacBio CCS BAM to FASTQ, filtering on read quality.
//!
//! The tool takes exactly three positional arguments. A help token in the first position
//! prints usage and does nothing else. All three arguments are validated before the input is
//! opened or the output is created.

use anyhow::{Context, Result};
use bam2fastq_lib::bam_io::{CcsBamReader, DecoderConfig};
use bam2fastq_lib::convert::filter_and_convert;
use bam2fastq_lib::errors::Bam2FastqError;
use bam2fastq_lib::fastq::FastqWriter;
use bam2fastq_lib::filter::{QualityFilter, Threshold};
use bam2fastq_lib::logging::{OperationTimer, log_conversion_summary};
use bam2fastq_lib::validation::{parse_threshold_arg, validate_input_file, validate_output_absent};
use clap::{CommandFactory, Parser};
use log::{debug, info};
use std::ffi::{OsStr, OsString};
use std::path::PathBuf;

use crate::commands::command::Command;

/// First-argument tokens that request usage.
pub const HELP_TOKENS: [&str; 4] = ["h", "help", "?", "-h"];

/// Number of positional arguments a conversion takes.
const ARGUMENT_COUNT: usize = 3;

/// Convert PacBio CCS BAM to FASTQ.
#[derive(Debug, Parser)]
#[command(
    name = "bam2fastq",
    disable_help_flag = true,
    disable_version_flag = true,
    about = "Convert PacBio CCS reads in BAM to FASTQ, keeping reads above an RQ threshold",
    long_about = r#"
Convert PacBio CCS reads in BAM to FASTQ, keeping reads above an RQ threshold.

Each read's predicted accuracy is taken from its rq tag. Reads with rq strictly greater than
THRESHOLD are written to OUTPUT in input order; all other reads are counted as filtered.
OUTPUT must not already exist and is gzip-compressed when its name ends in .gz.

Pass h, help, ? or -h as the first argument to print this message.

EXAMPLES:

  # Keep Q20+ CCS reads
  bam2fastq movie.ccs.bam 0.99 movie.q20.fastq

  # Keep every read with a positive rq, compressed
  bam2fastq movie.ccs.bam 0 movie.fastq.gz
"#
)]
pub struct Bam2Fastq {
    /// The input CCS BAM file.
    #[arg(value_name = "INPUT", allow_hyphen_values = true)]
    pub input: PathBuf,

    /// Minimum read quality in [0,1]; only reads with a higher rq are written.
    #[arg(value_name = "THRESHOLD", allow_hyphen_values = true)]
    pub threshold: OsString,

    /// The FASTQ file to create.
    #[arg(value_name = "OUTPUT", allow_hyphen_values = true)]
    pub output: PathBuf,
}

/// What the command line asked for.
#[derive(Debug)]
pub enum Invocation {
    /// Print usage and exit.
    Help,
    /// Convert with the given arguments.
    Run(Bam2Fastq),
}

/// Arguments that passed every check.
#[derive(Debug, Clone)]
pub struct ValidatedArgs {
    pub input: PathBuf,
    pub threshold: Threshold,
    pub output: PathBuf,
}

fn is_help_token(arg: &OsStr) -> bool {
    arg.to_str().is_some_and(|s| HELP_TOKENS.contains(&s))
}

impl Bam2Fastq {
    /// Interprets the raw command line (including the program name).
    ///
    /// A help token in the first position wins over everything else. Otherwise exactly three
    /// arguments are required. Each is taken verbatim, including `--` and non-UTF-8 bytes.
    pub fn parse_invocation<I, T>(args: I) -> std::result::Result<Invocation, Bam2FastqError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let mut args: Vec<OsString> = args.into_iter().map(Into::into).collect();
        let found = args.len().saturating_sub(1);

        if args.get(1).is_some_and(|first| is_help_token(first)) {
            return Ok(Invocation::Help);
        }
        if found != ARGUMENT_COUNT {
            return Err(Bam2FastqError::ArgumentCount { found });
        }

        // Everything after the escape is a value, including a literal `--`.
        args.insert(1, OsString::from("--"));
        Self::try_parse_from(args)
            .map(Invocation::Run)
            .map_err(|_| Bam2FastqError::ArgumentCount { found })
    }

    /// Usage text.
    pub fn usage() -> String {
        Self::command().render_long_help().to_string()
    }

    /// Checks the input, threshold and output in that order.
    pub fn validate(&self) -> std::result::Result<ValidatedArgs, Bam2FastqError> {
        validate_input_file(&self.input)?;
        let threshold = parse_threshold_arg(&self.threshold)?;
        validate_output_absent(&self.output)?;

        Ok(ValidatedArgs { input: self.input.clone(), threshold, output: self.output.clone() })
    }
}

impl Command for Bam2Fastq {
    fn execute(&self) -> Result<()> {
        let args = self.validate()?;
        let filter = QualityFilter::new(args.threshold);

        info!("Input: {}", args.input.display());
        info!("Minimum RQ: {0} (reads with rq > {0} are written)", filter.threshold());

        let timer = OperationTimer::new("Converting CCS reads to FASTQ");

        let reader = CcsBamReader::open(&args.input, &DecoderConfig::default())?;
        let mut writer = FastqWriter::create(&args.output)?;
        info!("Output: {}", writer.path().display());

        let stats = filter_and_convert(reader, &filter, &mut writer).with_context(|| {
            format!(
                "Failed to convert {} to {}",
                args.input.display(),
                writer.path().display()
            )
        })?;
        let written = writer.finish()?;
        debug!("Finished output with {written} records");

        log_conversion_summary(&stats, filter.threshold());
        timer.log_completion(stats.total_reads);

        println!("{stats} for RQ <= {}", filter.threshold());
        Ok(())
    }
}
