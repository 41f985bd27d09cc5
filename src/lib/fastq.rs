//! FASTQ output for CCS reads.
//!
//! Records are written as the four-line block `@name`, bases, `+`, qualities, with qualities
//! encoded as Sanger Phred+33. Output paths ending in `.gz` are gzip-compressed.
//!
//! [`FastqWriter`] owns the output file for the whole run. It creates the file with
//! create-new semantics, so an existing file is never overwritten, and removes the file again if
//! it is dropped without [`FastqWriter::finish`] being called. A run that fails part way through
//! therefore leaves no partial FASTQ behind.

use anyhow::{Context, Result};
use flate2::Compression;
use flate2::write::GzEncoder;
use log::warn;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::ccs::CcsRead;
use crate::errors::Bam2FastqError;

/// Lookup table for Phred to Phred+33 ASCII conversion (clamped to 126)
static QUAL_TO_ASCII: [u8; 256] = {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        let val = (i as u8).saturating_add(33);
        table[i] = if val > 126 { 126 } else { val };
        i += 1;
    }
    table
};

/// Size of the buffer in front of the output file.
const OUTPUT_BUFFER_SIZE: usize = 1024 * 1024;

/// Destination for accepted reads.
pub trait ReadSink {
    /// Appends one read.
    #[allow(clippy::missing_errors_doc)]
    fn write_read(&mut self, read: &CcsRead) -> Result<()>;
}

/// Writes a single FASTQ record to the writer.
///
/// # Errors
///
/// Returns an error if writing fails.
///
/// # Examples
///
/// ```
/// use bam2fastq_lib::ccs::CcsRead;
/// use bam2fastq_lib::fastq::write_fastq_record;
///
/// let read = CcsRead::new("m1/7/ccs", b"ACGT".to_vec(), vec![0, 30, 40, 93], 0.99).unwrap();
/// let mut out = Vec::new();
/// write_fastq_record(&mut out, &read).unwrap();
/// assert_eq!(out, b"@m1/7/ccs\nACGT\n+\n!?I~\n");
/// ```
#[inline]
pub fn write_fastq_record<W: Write + ?Sized>(writer: &mut W, read: &CcsRead) -> io::Result<()> {
    writer.write_all(b"@")?;
    writer.write_all(read.name())?;
    writer.write_all(b"\n")?;
    writer.write_all(read.bases())?;
    writer.write_all(b"\n+\n")?;
    for &q in read.quals() {
        writer.write_all(&[QUAL_TO_ASCII[q as usize]])?;
    }
    writer.write_all(b"\n")
}

/// Returns true if `path` should be written gzip-compressed.
#[must_use]
pub fn is_gzip_path<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref().extension().is_some_and(|ext| ext.eq_ignore_ascii_case("gz"))
}

enum FastqWriterInner {
    Plain(BufWriter<File>),
    Gzip(GzEncoder<BufWriter<File>>),
}

impl FastqWriterInner {
    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Plain(w) => w,
            Self::Gzip(w) => w,
        }
    }
}

/// A write-once FASTQ file.
///
/// # Examples
///
/// ```no_run
/// use bam2fastq_lib::ccs::CcsRead;
/// use bam2fastq_lib::fastq::{FastqWriter, ReadSink};
///
/// # fn main() -> anyhow::Result<()> {
/// let mut writer = FastqWriter::create("reads.fastq.gz")?;
/// let read = CcsRead::new("m1/7/ccs", b"ACGT".to_vec(), vec![30; 4], 0.99)?;
/// writer.write_read(&read)?;
///
/// // Without finish() the file is removed when the writer is dropped
/// writer.finish()?;
/// # Ok(())
/// # }
/// ```
pub struct FastqWriter {
    inner: Option<FastqWriterInner>,
    path: PathBuf,
    records_written: u64,
}

impl FastqWriter {
    /// Creates the output file, failing if anything already exists at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Bam2FastqError::OutputExists`] if the path is taken, or an I/O error if the
    /// file cannot be created.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = match OpenOptions::new().write(true).create_new(true).open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                return Err(Bam2FastqError::OutputExists { path: path.to_path_buf() }.into());
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to create output FASTQ: {}", path.display()));
            }
        };

        let buf = BufWriter::with_capacity(OUTPUT_BUFFER_SIZE, file);
        let inner = if is_gzip_path(path) {
            FastqWriterInner::Gzip(GzEncoder::new(buf, Compression::default()))
        } else {
            FastqWriterInner::Plain(buf)
        };

        Ok(Self { inner: Some(inner), path: path.to_path_buf(), records_written: 0 })
    }

    /// The output path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of records written so far.
    #[must_use]
    pub fn records_written(&self) -> u64 {
        self.records_written
    }

    /// Flushes all buffered output, terminates the gzip stream if any, and closes the file.
    ///
    /// Returns the number of records written.
    ///
    /// # Errors
    ///
    /// Returns an error if flushing fails, in which case the file is removed.
    pub fn finish(mut self) -> Result<u64> {
        let Some(inner) = self.inner.take() else {
            return Ok(self.records_written);
        };

        let result = match inner {
            FastqWriterInner::Plain(w) => w.into_inner().map_err(io::IntoInnerError::into_error),
            FastqWriterInner::Gzip(w) => w.finish().and_then(|buf| {
                buf.into_inner().map_err(io::IntoInnerError::into_error)
            }),
        };

        match result {
            Ok(file) => {
                drop(file);
                Ok(self.records_written)
            }
            Err(e) => {
                remove_incomplete(&self.path);
                Err(e).with_context(|| format!("Failed to finish output: {}", self.path.display()))
            }
        }
    }
}

impl ReadSink for FastqWriter {
    fn write_read(&mut self, read: &CcsRead) -> Result<()> {
        let inner = self.inner.as_mut().context("FASTQ writer already finished")?;
        write_fastq_record(inner.writer(), read)
            .with_context(|| format!("Failed to write FASTQ record to: {}", self.path.display()))?;
        self.records_written += 1;
        Ok(())
    }
}

impl Drop for FastqWriter {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.take() {
            drop(inner);
            remove_incomplete(&self.path);
        }
    }
}

fn remove_incomplete(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => warn!("Removed incomplete output: {}", path.display()),
        Err(e) => warn!("Failed to remove incomplete output {}: {e}", path.display()),
    }
}
