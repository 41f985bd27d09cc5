//! Read-quality gate for CCS reads.

use std::fmt;

/// A validated minimum read quality in the closed interval [0, 1].
///
/// Construct through [`Threshold::new`] (or [`crate::validation::parse_threshold`]) so the
/// range invariant holds for every value in circulation.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Threshold(f64);

impl Threshold {
    /// Creates a threshold, returning `None` when `value` is outside [0, 1] or NaN.
    #[must_use]
    pub fn new(value: f64) -> Option<Self> {
        (0.0..=1.0).contains(&value).then_some(Self(value))
    }

    /// The threshold as an `f64`.
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Accepts reads whose `rq` is strictly greater than the threshold.
#[derive(Debug, Clone, Copy)]
pub struct QualityFilter {
    threshold: Threshold,
    // rq is stored in BAM as `f`; compare at that precision so a read whose stored rq equals
    // the threshold is not promoted by widening to f64.
    min_rq: f32,
}

impl QualityFilter {
    /// Creates a filter for the given threshold.
    #[must_use]
    pub fn new(threshold: Threshold) -> Self {
        Self { threshold, min_rq: threshold.value() as f32 }
    }

    /// The threshold this filter was built with.
    #[must_use]
    pub fn threshold(&self) -> Threshold {
        self.threshold
    }

    /// Returns `true` if a read with quality `rq` should be emitted.
    #[inline]
    #[must_use]
    pub fn accepts(&self, rq: f32) -> bool {
        rq > self.min_rq
    }
}
