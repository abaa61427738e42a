//! Lookup table parameters.

use serde::{Deserialize, Serialize};

use crate::error::{LshError, Result};
use crate::mask::MAX_RADIUS;

/// Default vector dimensionality (one machine word).
pub const DEFAULT_DIMENSIONS: usize = 64;

/// Default number of bits sampled per classic partition.
pub const DEFAULT_SAMPLES: usize = 16;

/// Default number of classic partitions.
pub const DEFAULT_PARTITIONS: usize = 8;

/// Default covering radius.
pub const DEFAULT_RADIUS: u32 = 4;

/// Random-projection (bit sampling) table parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassicParams {
    /// Number of dimensions of vectors in the table.
    pub dimensions: usize,

    /// Number of bits to sample from each vector.
    pub samples: usize,

    /// Number of partitions to use.
    pub partitions: usize,
}

impl Default for ClassicParams {
    fn default() -> Self {
        Self {
            dimensions: DEFAULT_DIMENSIONS,
            samples: DEFAULT_SAMPLES,
            partitions: DEFAULT_PARTITIONS,
        }
    }
}

impl ClassicParams {
    /// Size a classic table to compete with a covering table of the same
    /// radius.
    ///
    /// Uses the covering partition budget `l = 2^(radius+1) - 1` and picks the
    /// smallest sample count `k` such that a pair at distance `radius` is
    /// missed by all `l` partitions with probability at most `delta`:
    ///
    /// ```text
    /// k = ceil(log2(1 - delta^(1/l)) / log2(1 - radius/dimensions))
    /// ```
    pub fn for_radius(dimensions: usize, radius: u32, delta: f64) -> Result<Self> {
        if radius == 0 || radius as usize >= dimensions {
            return Err(LshError::InvalidParameter(format!(
                "radius must be in 1..{dimensions}, got {radius}"
            )));
        }
        if radius > MAX_RADIUS {
            return Err(LshError::InvalidParameter(format!(
                "radius must be at most {MAX_RADIUS}, got {radius}"
            )));
        }
        if !(delta > 0.0 && delta < 1.0) {
            return Err(LshError::InvalidParameter(format!(
                "delta must be in (0, 1), got {delta}"
            )));
        }

        let partitions = (1usize << (radius + 1)) - 1;
        let miss = 1.0 - delta.powf(1.0 / partitions as f64);
        let keep = 1.0 - radius as f64 / dimensions as f64;
        let samples = (miss.log2() / keep.log2()).ceil().max(1.0) as usize;

        Ok(Self {
            dimensions,
            samples,
            partitions,
        })
    }

    pub fn validate(&self) -> Result<()> {
        validate_dimensions(self.dimensions)?;
        if self.samples == 0 {
            return Err(LshError::InvalidParameter(
                "samples must be positive".into(),
            ));
        }
        if self.partitions == 0 {
            return Err(LshError::InvalidParameter(
                "partitions must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// Covering-code table parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoveringParams {
    /// Number of dimensions of vectors in the table.
    pub dimensions: usize,

    /// The radius to cover in the table.
    pub radius: u32,
}

impl Default for CoveringParams {
    fn default() -> Self {
        Self {
            dimensions: DEFAULT_DIMENSIONS,
            radius: DEFAULT_RADIUS,
        }
    }
}

impl CoveringParams {
    /// Number of partitions a table built from these parameters has,
    /// `2^(radius + 1) - 1`. Fails like [`CoveringParams::validate`].
    pub fn partitions(&self) -> Result<usize> {
        self.validate()?;
        Ok((1usize << (self.radius + 1)) - 1)
    }

    pub fn validate(&self) -> Result<()> {
        validate_dimensions(self.dimensions)?;
        if self.radius > MAX_RADIUS {
            return Err(LshError::InvalidParameter(format!(
                "radius must be at most {MAX_RADIUS}, got {}",
                self.radius
            )));
        }
        Ok(())
    }
}

/// Brute-force (single partition, exhaustive scan) table parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BruteParams {
    /// Number of dimensions of vectors in the table.
    pub dimensions: usize,
}

impl Default for BruteParams {
    fn default() -> Self {
        Self {
            dimensions: DEFAULT_DIMENSIONS,
        }
    }
}

impl BruteParams {
    pub fn validate(&self) -> Result<()> {
        validate_dimensions(self.dimensions)
    }
}

/// Which LSH scheme a table uses, with its parameters.
///
/// Serialized with a `scheme` tag, e.g.
/// `{"scheme": "covering", "dimensions": 64, "radius": 4}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scheme", rename_all = "snake_case")]
pub enum TableParams {
    Classic(ClassicParams),
    Covering(CoveringParams),
    Brute(BruteParams),
}

impl TableParams {
    pub fn dimensions(&self) -> usize {
        match self {
            Self::Classic(p) => p.dimensions,
            Self::Covering(p) => p.dimensions,
            Self::Brute(p) => p.dimensions,
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Classic(p) => p.validate(),
            Self::Covering(p) => p.validate(),
            Self::Brute(p) => p.validate(),
        }
    }
}

impl From<ClassicParams> for TableParams {
    fn from(params: ClassicParams) -> Self {
        Self::Classic(params)
    }
}

impl From<CoveringParams> for TableParams {
    fn from(params: CoveringParams) -> Self {
        Self::Covering(params)
    }
}

impl From<BruteParams> for TableParams {
    fn from(params: BruteParams) -> Self {
        Self::Brute(params)
    }
}

fn validate_dimensions(dimensions: usize) -> Result<()> {
    if dimensions == 0 {
        return Err(LshError::InvalidParameter(
            "dimensions must be positive".into(),
        ));
    }
    Ok(())
}
