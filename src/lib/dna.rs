//! DNA sequence utilities.
//!
//! BAM stores bases from the 4-bit alphabet `=ACMGRSVTWYHKDBN`, so complements here cover the
//! full IUPAC code set rather than just A/C/G/T.

/// Lookup table for base complement over the BAM alphabet (upper and lower case).
///
/// Bytes outside the alphabet map to `N`.
static COMPLEMENT: [u8; 256] = {
    let mut table = [b'N'; 256];
    let pairs: [(u8, u8); 16] = [
        (b'A', b'T'),
        (b'C', b'G'),
        (b'G', b'C'),
        (b'T', b'A'),
        (b'M', b'K'),
        (b'K', b'M'),
        (b'R', b'Y'),
        (b'Y', b'R'),
        (b'W', b'W'),
        (b'S', b'S'),
        (b'B', b'V'),
        (b'V', b'B'),
        (b'D', b'H'),
        (b'H', b'D'),
        (b'N', b'N'),
        (b'=', b'='),
    ];
    let mut i = 0;
    while i < pairs.len() {
        let (base, comp) = pairs[i];
        table[base as usize] = comp;
        table[base.to_ascii_lowercase() as usize] = comp;
        i += 1;
    }
    table
};

/// Complements a single base, normalizing to uppercase.
///
/// # Examples
///
/// ```
/// use bam2fastq_lib::dna::complement_base;
///
/// assert_eq!(complement_base(b'A'), b'T');
/// assert_eq!(complement_base(b'r'), b'Y');
/// assert_eq!(complement_base(b'X'), b'N');
/// ```
#[inline]
#[must_use]
pub fn complement_base(base: u8) -> u8 {
    COMPLEMENT[base as usize]
}

/// Reverse complements a sequence in place.
///
/// # Examples
///
/// ```
/// use bam2fastq_lib::dna::reverse_complement_in_place;
///
/// let mut bases = b"AACGTN".to_vec();
/// reverse_complement_in_place(&mut bases);
/// assert_eq!(bases, b"NACGTT");
/// ```
pub fn reverse_complement_in_place(bases: &mut [u8]) {
    bases.reverse();
    for base in bases.iter_mut() {
        *base = complement_base(*base);
    }
}
