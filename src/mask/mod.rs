//! Projection masks for bucketing bit vectors.
//!
//! A mask zeroes every bit it does not select, so two vectors share a bucket
//! of one partition exactly when they agree on the selected positions. The
//! family is closed: random projection (bit sampling), covering code, and the
//! identity used by brute-force tables.
//!
//! | Mask | Selected bits | Partitions per table |
//! |------|---------------|----------------------|
//! | [`Mask::RandomProjection`] | `<= samples` random positions | configured |
//! | [`Mask::CoveringCode`] | parity pattern of one codeword | `2^(r+1) - 1` |
//! | [`Mask::BruteForce`] | all | 1 |
//!
//! ## References
//!
//! - Indyk & Motwani (1998). "Approximate nearest neighbors: towards removing
//!   the curse of dimensionality" (bit sampling)
//! - Pagh (2016). "Locality-sensitive hashing without false negatives"

mod covering;

pub use covering::{CoveringMapping, MAX_RADIUS};

use rand::Rng;

use crate::bitvec::BitVector;
use crate::error::{LshError, Result};

/// A projection applied to every vector before bucketing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mask {
    /// Keeps a random sample of positions.
    RandomProjection { dimensions: usize, mask: BitVector },
    /// Keeps the positions selected by one covering codeword.
    CoveringCode { dimensions: usize, mask: BitVector },
    /// Keeps everything.
    BruteForce { dimensions: usize },
}

impl Mask {
    /// Sample `samples` positions of `[0, dimensions)` with replacement.
    ///
    /// Draws are independent, so fewer than `samples` distinct positions may
    /// end up selected.
    pub fn random_projection<R: Rng + ?Sized>(
        dimensions: usize,
        samples: usize,
        rng: &mut R,
    ) -> Result<Self> {
        if dimensions == 0 {
            return Err(LshError::InvalidParameter(
                "dimensions must be positive".into(),
            ));
        }
        let positions: Vec<usize> = (0..samples)
            .map(|_| rng.random_range(0..dimensions))
            .collect();
        Ok(Mask::RandomProjection {
            dimensions,
            mask: BitVector::from_positions(dimensions, positions),
        })
    }

    /// The mask of codeword `index` (in `1..=mapping.partitions()`).
    pub fn covering_code(
        dimensions: usize,
        index: usize,
        mapping: &CoveringMapping,
    ) -> Result<Self> {
        LshError::check_dimensions(dimensions, mapping.dimensions())?;
        Ok(Mask::CoveringCode {
            dimensions,
            mask: mapping.mask_bits(index)?,
        })
    }

    /// The identity projection.
    pub fn brute_force(dimensions: usize) -> Self {
        Mask::BruteForce { dimensions }
    }

    /// Dimensionality of the vectors this mask accepts.
    pub fn dimensions(&self) -> usize {
        match self {
            Mask::RandomProjection { dimensions, .. }
            | Mask::CoveringCode { dimensions, .. }
            | Mask::BruteForce { dimensions } => *dimensions,
        }
    }

    /// Number of positions the projection keeps.
    pub fn selected(&self) -> usize {
        match self {
            Mask::RandomProjection { mask, .. } | Mask::CoveringCode { mask, .. } => {
                mask.count_ones() as usize
            }
            Mask::BruteForce { dimensions } => *dimensions,
        }
    }

    /// Short scheme name, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Mask::RandomProjection { .. } => "random-projection",
            Mask::CoveringCode { .. } => "covering-code",
            Mask::BruteForce { .. } => "brute-force",
        }
    }

    /// Project `vector` onto the selected positions.
    ///
    /// The result keeps the input's dimensionality; unselected bits are zero.
    /// A hand-built mask whose bit vector is not `dimensions` wide is a
    /// [`LshError::DimensionMismatch`].
    pub fn project(&self, vector: &BitVector) -> Result<BitVector> {
        LshError::check_dimensions(self.dimensions(), vector.len())?;
        if let Mask::RandomProjection { dimensions, mask } | Mask::CoveringCode { dimensions, mask } =
            self
        {
            LshError::check_dimensions(*dimensions, mask.len())?;
        }
        Ok(self.project_unchecked(vector))
    }

    /// [`Mask::project`] for callers that already checked the length.
    #[inline]
    pub(crate) fn project_unchecked(&self, vector: &BitVector) -> BitVector {
        match self {
            Mask::RandomProjection { mask, .. } | Mask::CoveringCode { mask, .. } => {
                mask.and_unchecked(vector)
            }
            Mask::BruteForce { .. } => vector.clone(),
        }
    }
}
