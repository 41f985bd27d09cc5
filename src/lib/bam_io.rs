//! BAM input for CCS reads.
//!
//! This module opens a CCS BAM, checks that its container is one we can decode, and exposes the
//! records as a lazy stream of [`CcsRead`]s.
//!
//! # Decoder configuration
//!
//! Decoder tuning lives in a [`DecoderConfig`] value that is passed to [`CcsBamReader::open`].
//! Nothing about decoding is held in process-wide state.
//!
//! # Container detection
//!
//! The first bytes of the input are inspected before decoding:
//!
//! - gzip magic (`1f 8b`): decoded as BGZF-compressed BAM
//! - `CRAM` magic or a SAM header line: no decoder in this build, reported as
//!   [`Bam2FastqError::DecoderUnavailable`] with conversion guidance
//! - anything else: a generic "not a BAM file" error

use anyhow::{Context, Result};
use log::debug;
use noodles::bam;
use noodles::bgzf;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::ccs::CcsRead;
use crate::errors::Bam2FastqError;

/// Default size of the buffer between the input file and the BGZF decoder.
pub const DEFAULT_BUFFER_SIZE: usize = 4096;

/// Smallest accepted buffer; container detection needs this many leading bytes.
const MIN_BUFFER_SIZE: usize = 16;

/// Tuning values for the CCS BAM decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Reads longer than this are a decoding error.
    pub max_sequence_length: usize,
    /// Size of the read buffer wrapping the input file.
    pub buffer_size: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self { max_sequence_length: usize::MAX, buffer_size: DEFAULT_BUFFER_SIZE }
    }
}

impl DecoderConfig {
    /// Sets the maximum accepted sequence length.
    #[must_use]
    pub fn with_max_sequence_length(mut self, max_sequence_length: usize) -> Self {
        self.max_sequence_length = max_sequence_length;
        self
    }

    /// Sets the input buffer size.
    #[must_use]
    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }
}

/// Container format detected from the leading bytes of an input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// gzip/BGZF, expected to hold BAM
    Bgzf,
    /// CRAM
    Cram,
    /// SAM text with a header
    Sam,
    /// Unrecognized
    Unknown,
}

impl InputFormat {
    /// Detects the container format from the first bytes of a file.
    #[must_use]
    pub fn detect(prefix: &[u8]) -> Self {
        const SAM_HEADER_PREFIXES: [&[u8]; 5] = [b"@HD\t", b"@SQ\t", b"@RG\t", b"@PG\t", b"@CO\t"];

        if prefix.starts_with(&[0x1f, 0x8b]) {
            Self::Bgzf
        } else if prefix.starts_with(b"CRAM") {
            Self::Cram
        } else if SAM_HEADER_PREFIXES.iter().any(|p| prefix.starts_with(p)) {
            Self::Sam
        } else {
            Self::Unknown
        }
    }

    /// Display name used in diagnostics.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Bgzf => "BAM",
            Self::Cram => "CRAM",
            Self::Sam => "SAM",
            Self::Unknown => "unknown",
        }
    }
}

/// Streaming reader yielding [`CcsRead`]s from a BAM file.
///
/// The reader is a single-pass cursor: each call to `next` decodes one record, and after the
/// first error the iterator is exhausted.
pub struct CcsBamReader {
    reader: bam::io::Reader<bgzf::io::Reader<BufReader<File>>>,
    record: bam::Record,
    max_sequence_length: usize,
    records_read: u64,
    done: bool,
}

impl CcsBamReader {
    /// Opens a CCS BAM and reads its header.
    ///
    /// # Errors
    ///
    /// Returns [`Bam2FastqError::DecoderUnavailable`] (wrapped in [`anyhow::Error`]) if the input
    /// is CRAM or SAM, and a generic error if the file cannot be opened, is not BGZF, or has an
    /// unreadable header.
    pub fn open<P: AsRef<Path>>(path: P, config: &DecoderConfig) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open input BAM: {}", path.display()))?;

        let mut buffered = BufReader::with_capacity(config.buffer_size.max(MIN_BUFFER_SIZE), file);
        let format = InputFormat::detect(
            buffered
                .fill_buf()
                .with_context(|| format!("Failed to read from: {}", path.display()))?,
        );
        debug!("Detected {} container for {}", format.name(), path.display());
        check_decodable(format, path)?;

        let mut reader = bam::io::Reader::from(bgzf::io::Reader::new(buffered));
        let header = reader
            .read_header()
            .with_context(|| format!("Failed to read header from: {}", path.display()))?;
        debug!("Header declares {} read group(s)", header.read_groups().len());

        Ok(Self {
            reader,
            record: bam::Record::default(),
            max_sequence_length: config.max_sequence_length,
            records_read: 0,
            done: false,
        })
    }

    /// Number of records decoded so far.
    #[must_use]
    pub fn records_read(&self) -> u64 {
        self.records_read
    }
}

impl Iterator for CcsBamReader {
    type Item = Result<CcsRead>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let result = match self.reader.read_record(&mut self.record) {
            Ok(0) => {
                self.done = true;
                return None;
            }
            Ok(_) => {
                self.records_read += 1;
                CcsRead::from_bam_record(&self.record, self.max_sequence_length)
                    .with_context(|| format!("Failed to decode BAM record #{}", self.records_read))
            }
            Err(e) => Err(e).with_context(|| {
                format!("Failed to read BAM record #{}", self.records_read + 1)
            }),
        };

        if result.is_err() {
            self.done = true;
        }
        Some(result)
    }
}

/// Rejects containers this build has no decoder for.
fn check_decodable(format: InputFormat, path: &Path) -> Result<()> {
    match format {
        InputFormat::Bgzf => Ok(()),
        InputFormat::Cram | InputFormat::Sam => Err(decoder_unavailable(format, path).into()),
        InputFormat::Unknown => {
            anyhow::bail!("Input '{}' is not a BGZF-compressed BAM file", path.display())
        }
    }
}

fn decoder_unavailable(format: InputFormat, path: &Path) -> Bam2FastqError {
    Bam2FastqError::DecoderUnavailable {
        format: format.name().to_string(),
        path: PathBuf::from(path),
        remediation: format!(
            "Only BAM input can be decoded. Convert the {} file first, for example: \
             samtools view -b -o reads.bam {}",
            format.name(),
            path.display()
        ),
    }
}
