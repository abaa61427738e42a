//! Random mapping behind covering-code LSH.
//!
//! Pagh (2016) shows how to pick projections so that every pair of vectors
//! within Hamming distance `r` collides in at least one of them. With
//! `n = 2^(r+1)`, draw a random map `m: [d] -> {0,1}^n` once. Each nonzero
//! codeword `x` in `{0,1}^n` then defines the mask
//!
//! ```text
//! mask_x[j] = <m(j), x> mod 2
//! ```
//!
//! giving `n - 1` masks. Two vectors that differ on a set `D` of at most `r`
//! positions agree on every sampled bit of `mask_x` exactly when `x` is
//! orthogonal to all of `m(D)`, and some nonzero `x` always is once
//! `|D| < log2(n)`.
//!
//! ## References
//!
//! - Pagh (2016). "Locality-sensitive hashing without false negatives"

use rand::Rng;

use crate::bitvec::BitVector;
use crate::error::{LshError, Result};

/// Largest radius accepted by [`CoveringMapping::new`].
///
/// A radius `r` costs `2^(r+1) - 1` partitions, so this is already far past
/// anything practical.
pub const MAX_RADIUS: u32 = 16;

/// The per-table random map `m: [dimensions] -> {0,1}^n`, `n = 2^(radius+1)`.
///
/// Shared by every covering mask of one table; generated exactly once per
/// table construction.
#[derive(Debug, Clone)]
pub struct CoveringMapping {
    radius: u32,
    rows: Vec<BitVector>,
}

impl CoveringMapping {
    /// Draw a mapping for `dimensions`-bit vectors and the given radius.
    pub fn new<R: Rng + ?Sized>(dimensions: usize, radius: u32, rng: &mut R) -> Result<Self> {
        if radius > MAX_RADIUS {
            return Err(LshError::InvalidParameter(format!(
                "radius must be at most {MAX_RADIUS}, got {radius}"
            )));
        }
        let n = codeword_len(radius);
        let rows = (0..dimensions)
            .map(|_| BitVector::random(n, rng))
            .collect();
        Ok(Self { radius, rows })
    }

    /// Radius this mapping covers.
    pub fn radius(&self) -> u32 {
        self.radius
    }

    /// Dimensionality of the vectors the derived masks apply to.
    pub fn dimensions(&self) -> usize {
        self.rows.len()
    }

    /// Codeword length `n = 2^(radius+1)`.
    pub fn codeword_len(&self) -> usize {
        codeword_len(self.radius)
    }

    /// Number of nonzero codewords, hence of masks/partitions: `n - 1`.
    pub fn partitions(&self) -> usize {
        self.codeword_len() - 1
    }

    /// Codeword `index` as an `n`-bit big-endian vector.
    pub fn codeword(&self, index: usize) -> BitVector {
        BitVector::from_integer(index as u64, self.codeword_len())
    }

    /// Mask bits for codeword `index`: bit `j` is the parity of
    /// `<m(j), codeword(index)>`.
    pub(crate) fn mask_bits(&self, index: usize) -> Result<BitVector> {
        if index == 0 || index > self.partitions() {
            return Err(LshError::InvalidParameter(format!(
                "codeword index must be in 1..={}, got {index}",
                self.partitions()
            )));
        }
        let codeword = self.codeword(index);
        Ok(self
            .rows
            .iter()
            .map(|row| row.dot_unchecked(&codeword) % 2 == 1)
            .collect())
    }
}

#[inline]
fn codeword_len(radius: u32) -> usize {
    1usize << (radius + 1)
}
