//! Average-hash similarity between two frames

use crate::{Error, Result};
use adfinder_core::Similarity;
use image::imageops::{self, FilterType};
use image::RgbImage;

/// Side of the square grid the image is reduced to
pub const HASH_SIZE: u32 = 8;

/// Number of bits in a fingerprint
pub const HASH_BITS: u32 = HASH_SIZE * HASH_SIZE;

/// 64-bit average hash ("aHash") of an image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AverageHash(u64);

impl AverageHash {
    /// Greyscale, downsample to 8x8, then set one bit per cell brighter
    /// than the grid mean (row-major, most significant bit first).
    pub fn of(image: &RgbImage) -> Result<Self> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(Error::DegenerateImage { width, height });
        }

        let grey = imageops::grayscale(image);
        let grid = imageops::resize(&grey, HASH_SIZE, HASH_SIZE, FilterType::Lanczos3);

        let sum: u32 = grid.pixels().map(|p| u32::from(p[0])).sum();
        let mean = f64::from(sum) / f64::from(HASH_BITS);

        let bits = grid
            .pixels()
            .fold(0u64, |acc, p| (acc << 1) | u64::from(f64::from(p[0]) > mean));

        Ok(Self(bits))
    }

    pub fn bits(self) -> u64 {
        self.0
    }

    /// Hamming distance: number of differing bits
    pub fn distance(self, other: AverageHash) -> u32 {
        (self.0 ^ other.0).count_ones()
    }
}

/// Scores two frames: `1 - hamming_distance / 64`
pub fn score(a: &RgbImage, b: &RgbImage) -> Result<Similarity> {
    let distance = AverageHash::of(a)?.distance(AverageHash::of(b)?);
    Ok(Similarity::from_hamming(distance, HASH_BITS))
}
