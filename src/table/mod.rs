//! Multi-partition LSH lookup table.
//!
//! A table is a list of partitions, each a mask plus a map from projected
//! vector to the ids that project there. Inserting a vector files its id in
//! one bucket of every partition; a query scans the buckets its own
//! projections land in and returns the closest candidate by exact Hamming
//! distance.
//!
//! ```text
//!              project_1(v)         project_2(v)              project_l(v)
//!   v ──┬──> [ partition 1 ] ──┬──> [ partition 2 ] ── ... ──> [ partition l ]
//!       │         │ ids        │         │ ids                       │ ids
//!       │         v            │         v                           v
//!       └────────────────> store: id -> BitVector (canonical owner)
//! ```
//!
//! Buckets only hold ids. The store is the single owner of vector values, so
//! a bucket never dangles no matter how the store reallocates.
//!
//! ## Recall
//!
//! Only vectors sharing at least one bucket with the query are examined.
//! For bit sampling with `k` samples and `l` partitions, a pair at distance
//! `r` in `d` dimensions is missed with probability
//!
//! ```text
//! (1 - (1 - r/d)^k)^l
//! ```
//!
//! Covering-code tables never miss a pair within their radius.
//!
//! ## Concurrency
//!
//! Mutation takes `&mut self`; `query`, `contains` and `stats` take `&self`.
//! Share across threads behind an `RwLock` for single-writer/multi-reader use.

mod params;
mod stats;

pub use params::{
    BruteParams, ClassicParams, CoveringParams, TableParams, DEFAULT_DIMENSIONS,
    DEFAULT_PARTITIONS, DEFAULT_RADIUS, DEFAULT_SAMPLES,
};
pub use stats::TableStats;

use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use smallvec::SmallVec;

use crate::bitvec::BitVector;
use crate::error::{LshError, Result};
use crate::mask::{CoveringMapping, Mask};

/// Ids sharing one projected key. Most buckets are tiny.
type Bucket = SmallVec<[usize; 4]>;

/// One mask and the buckets it induces.
///
/// Keys are the full projected vectors rather than their rolling hash, so
/// distinct projections can never be merged into one bucket.
#[derive(Debug, Clone)]
struct Partition {
    mask: Mask,
    buckets: HashMap<BitVector, Bucket>,
}

impl Partition {
    fn new(mask: Mask) -> Self {
        Self {
            mask,
            buckets: HashMap::new(),
        }
    }

    fn insert(&mut self, id: usize, vector: &BitVector) {
        let key = self.mask.project_unchecked(vector);
        self.buckets.entry(key).or_default().push(id);
    }

    fn remove(&mut self, id: usize, vector: &BitVector) {
        let key = self.mask.project_unchecked(vector);
        if let Entry::Occupied(mut entry) = self.buckets.entry(key) {
            let bucket = entry.get_mut();
            if let Some(pos) = bucket.iter().position(|&member| member == id) {
                bucket.remove(pos);
            }
            if bucket.is_empty() {
                entry.remove();
            }
        }
    }

    fn candidates(&self, vector: &BitVector) -> &[usize] {
        let key = self.mask.project_unchecked(vector);
        self.buckets
            .get(&key)
            .map(|bucket| bucket.as_slice())
            .unwrap_or_default()
    }
}

/// LSH lookup table over fixed-dimension bit vectors.
///
/// # Example
///
/// ```rust
/// use hemingway::{BitVector, ClassicParams, Table};
///
/// let params = ClassicParams { dimensions: 4, samples: 2, partitions: 2 };
/// let mut table = Table::with_seed(params, 42)?;
///
/// let v = BitVector::from_bits([true, false, false, true]);
/// table.insert(v.clone())?;
///
/// assert_eq!(table.len(), 1);
/// assert_eq!(table.query(&v)?, v);
/// # Ok::<(), hemingway::LshError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Table {
    dimensions: usize,
    next_id: usize,
    store: BTreeMap<usize, BitVector>,
    partitions: Vec<Partition>,
}

impl Table {
    /// Build a table, drawing all mask randomness from `rng`.
    pub fn new<R: Rng + ?Sized>(params: impl Into<TableParams>, rng: &mut R) -> Result<Self> {
        let params = params.into();
        params.validate()?;

        let partitions: Vec<Partition> = match params {
            TableParams::Classic(p) => (0..p.partitions)
                .map(|_| {
                    Mask::random_projection(p.dimensions, p.samples, &mut *rng).map(Partition::new)
                })
                .collect::<Result<_>>()?,
            TableParams::Covering(p) => {
                let mapping = CoveringMapping::new(p.dimensions, p.radius, &mut *rng)?;
                (1..=mapping.partitions())
                    .map(|index| {
                        Mask::covering_code(p.dimensions, index, &mapping).map(Partition::new)
                    })
                    .collect::<Result<_>>()?
            }
            TableParams::Brute(p) => vec![Partition::new(Mask::brute_force(p.dimensions))],
        };

        tracing::debug!(
            scheme = partitions.first().map_or("none", |p| p.mask.kind()),
            dimensions = params.dimensions(),
            partitions = partitions.len(),
            "built lookup table"
        );

        Ok(Self {
            dimensions: params.dimensions(),
            next_id: 0,
            store: BTreeMap::new(),
            partitions,
        })
    }

    /// Build a table from a fixed seed, for reproducible indexes.
    pub fn with_seed(params: impl Into<TableParams>, seed: u64) -> Result<Self> {
        Self::new(params, &mut StdRng::seed_from_u64(seed))
    }

    /// Dimensionality of vectors in the table.
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Number of vectors in the table.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Number of partitions, fixed at construction.
    pub fn num_partitions(&self) -> usize {
        self.partitions.len()
    }

    /// The masks, in partition order.
    pub fn masks(&self) -> impl Iterator<Item = &Mask> + '_ {
        self.partitions.iter().map(|p| &p.mask)
    }

    /// Insert a vector. Duplicates are stored as separate entries.
    pub fn insert(&mut self, vector: BitVector) -> Result<()> {
        LshError::check_dimensions(self.dimensions, vector.len())?;

        let id = self.next_id;
        self.next_id += 1;

        for partition in &mut self.partitions {
            partition.insert(id, &vector);
        }
        self.store.insert(id, vector);
        Ok(())
    }

    /// Erase one stored copy of `vector`.
    ///
    /// Returns `false` and leaves the table untouched when no equal vector is
    /// stored. When several copies exist the earliest inserted goes.
    pub fn erase(&mut self, vector: &BitVector) -> Result<bool> {
        LshError::check_dimensions(self.dimensions, vector.len())?;

        let Some(id) = self.find(vector) else {
            tracing::trace!(%vector, "erase: vector not in table");
            return Ok(false);
        };

        for partition in &mut self.partitions {
            partition.remove(id, vector);
        }
        self.store.remove(&id);
        Ok(true)
    }

    /// Whether an equal vector is stored.
    pub fn contains(&self, vector: &BitVector) -> Result<bool> {
        LshError::check_dimensions(self.dimensions, vector.len())?;
        Ok(self.find(vector).is_some())
    }

    /// Approximate nearest neighbor of `vector`.
    ///
    /// Returns the zero-length [`BitVector::empty`] when no partition yields a
    /// candidate.
    pub fn query(&self, vector: &BitVector) -> Result<BitVector> {
        Ok(self
            .query_with_distance(vector)?
            .map_or_else(BitVector::empty, |(found, _)| found))
    }

    /// Approximate nearest neighbor of `vector` and its Hamming distance.
    pub fn query_with_distance(&self, vector: &BitVector) -> Result<Option<(BitVector, u32)>> {
        LshError::check_dimensions(self.dimensions, vector.len())?;
        Ok(self
            .nearest(vector)
            .and_then(|(id, distance)| self.store.get(&id).map(|v| (v.clone(), distance))))
    }

    /// Bucket occupancy summed over partitions.
    pub fn stats(&self) -> TableStats {
        let mut stats = TableStats::default();
        for partition in &self.partitions {
            stats.record_partition(partition.buckets.values().map(|bucket| bucket.len()));
        }
        stats
    }

    /// Lowest id whose stored value equals `vector`.
    ///
    /// Equal vectors project equally, so every copy sits in the first
    /// partition's bucket for `vector`.
    fn find(&self, vector: &BitVector) -> Option<usize> {
        self.partitions
            .first()?
            .candidates(vector)
            .iter()
            .copied()
            .filter(|id| self.store.get(id) == Some(vector))
            .min()
    }

    /// Closest candidate over all partitions; ties go to the first seen.
    fn nearest(&self, vector: &BitVector) -> Option<(usize, u32)> {
        let mut best: Option<(usize, u32)> = None;

        for partition in &self.partitions {
            for &id in partition.candidates(vector) {
                let Some(candidate) = self.store.get(&id) else {
                    continue;
                };
                let distance = vector.distance_unchecked(candidate);
                if best.is_none_or(|(_, best_distance)| distance < best_distance) {
                    best = Some((id, distance));
                    if distance == 0 {
                        return best;
                    }
                }
            }
        }

        best
    }
}
