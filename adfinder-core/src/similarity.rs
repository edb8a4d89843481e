//! Similarity scores and match thresholds

use crate::{Error, Result};
use std::fmt;

/// Normalized similarity between two frames, always within [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Similarity(f64);

impl Similarity {
    pub const IDENTICAL: Similarity = Similarity(1.0);

    /// Clamps `value` into [0, 1]
    pub fn new(value: f64) -> Self {
        Self(value.clamp(0.0, 1.0))
    }

    /// Similarity of two fingerprints of `bits` bits that differ in `distance` bits
    pub fn from_hamming(distance: u32, bits: u32) -> Self {
        if bits == 0 {
            return Self::IDENTICAL;
        }
        Self::new(1.0 - f64::from(distance) / f64::from(bits))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Similarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}%", self.0 * 100.0)
    }
}

/// Minimum similarity a candidate must exceed to count as a match
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Threshold {
    percent: u32,
}

impl Threshold {
    /// Builds a threshold from a percentage in 0..=100
    pub fn from_percent(percent: u32) -> Result<Self> {
        if percent > 100 {
            return Err(Error::InvalidSimilarity(percent));
        }
        Ok(Self { percent })
    }

    pub fn percent(self) -> u32 {
        self.percent
    }

    pub fn value(self) -> f64 {
        f64::from(self.percent) / 100.0
    }

    /// Strictly greater-than: a score equal to the threshold is not a match
    pub fn is_exceeded_by(self, similarity: Similarity) -> bool {
        similarity.value() > self.value()
    }
}
