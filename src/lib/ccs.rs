//! PacBio CCS read model.
//!
//! A [`CcsRead`] is the decoded form of one record from a CCS BAM: the read name, its bases
//! and Phred qualities in original read orientation, and the read-quality estimate stored in
//! the `rq` tag.

use anyhow::{Context, Result, bail};
use bstr::{BStr, BString, ByteSlice};
use noodles::bam;
use noodles::sam::alignment::record::data::field::{Tag, Value};

use crate::dna::reverse_complement_in_place;

/// Aux tag holding the predicted read accuracy of a CCS read.
pub const READ_QUALITY_TAG: Tag = Tag::new(b'r', b'q');

/// One decoded CCS read.
#[derive(Debug, Clone, PartialEq)]
pub struct CcsRead {
    name: BString,
    bases: Vec<u8>,
    quals: Vec<u8>,
    rq: f32,
}

impl CcsRead {
    /// Creates a read from its parts.
    ///
    /// # Errors
    ///
    /// Returns an error if `bases` and `quals` differ in length.
    pub fn new(name: impl Into<BString>, bases: Vec<u8>, quals: Vec<u8>, rq: f32) -> Result<Self> {
        let name = name.into();
        if bases.len() != quals.len() {
            bail!(
                "Read {name} has {} bases but {} quality scores",
                bases.len(),
                quals.len()
            );
        }
        Ok(Self { name, bases, quals, rq })
    }

    /// Decodes a read from a BAM record.
    ///
    /// Reverse-strand records are restored to original read orientation.
    ///
    /// # Errors
    ///
    /// Returns an error if the record has no name, no `rq` tag, a non-float `rq`, mismatched
    /// sequence and quality lengths, or a sequence longer than `max_sequence_length`.
    pub fn from_bam_record(record: &bam::Record, max_sequence_length: usize) -> Result<Self> {
        let name = record.name().context("Record missing name")?;

        let seq_len = record.sequence().len();
        if seq_len > max_sequence_length {
            bail!("Read {name} has length {seq_len}, exceeding the maximum of {max_sequence_length}");
        }

        let rq = read_quality(record).with_context(|| format!("Invalid read {name}"))?;

        let mut bases: Vec<u8> = record.sequence().iter().collect();
        let mut quals: Vec<u8> = record.quality_scores().as_ref().to_vec();

        if record.flags().is_reverse_complemented() {
            reverse_complement_in_place(&mut bases);
            quals.reverse();
        }

        Self::new(name.to_owned(), bases, quals, rq)
    }

    /// The read name.
    #[must_use]
    pub fn name(&self) -> &BStr {
        self.name.as_bstr()
    }

    /// Bases in original read orientation.
    #[must_use]
    pub fn bases(&self) -> &[u8] {
        &self.bases
    }

    /// Numeric Phred quality scores, one per base.
    #[must_use]
    pub fn quals(&self) -> &[u8] {
        &self.quals
    }

    /// The read-quality estimate (`rq`).
    #[must_use]
    pub fn rq(&self) -> f32 {
        self.rq
    }
}

/// Extracts the `rq` tag value from a BAM record.
fn read_quality(record: &bam::Record) -> Result<f32> {
    let data = record.data();
    let value = data
        .get(&READ_QUALITY_TAG)
        .context("Record missing rq tag")?
        .context("Failed to decode rq tag")?;

    match value {
        Value::Float(rq) => Ok(rq),
        _ => bail!("rq tag must be a float (type 'f')"),
    }
}
