//! hemingway: Locality-Sensitive Hashing over packed binary vectors.
//!
//! Answers "which stored vector is closest in Hamming distance to this one?"
//! without scanning everything, by filing each vector into buckets where
//! near vectors tend to collide and far ones don't.
//!
//! - `bitvec`: packed, immutable [`BitVector`] with exact bitwise arithmetic
//! - `mask`: projection family ([`Mask`]): bit sampling, covering code, identity
//! - `table`: multi-partition lookup [`Table`] with insert / erase / query
//!
//! ```rust
//! use hemingway::{BitVector, BruteParams, CoveringParams, Table};
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let mut index = Table::new(CoveringParams { dimensions: 64, radius: 2 }, &mut rng)?;
//! let mut oracle = Table::new(BruteParams { dimensions: 64 }, &mut rng)?;
//!
//! let v = BitVector::random(64, &mut rng);
//! index.insert(v.clone())?;
//! oracle.insert(v.clone())?;
//!
//! assert_eq!(index.query(&v)?, oracle.query(&v)?);
//! # Ok::<(), hemingway::LshError>(())
//! ```
//!
//! # Choosing a Scheme
//!
//! ## Classic (bit sampling)
//!
//! Each partition keeps `k` random positions. A pair at distance `r` collides
//! in one partition with probability `(1 - r/d)^k`; more partitions raise
//! recall, more samples shrink buckets. Misses are always possible.
//!
//! ## Covering
//!
//! `2^(r+1) - 1` partitions derived from one random map guarantee that every
//! pair within distance `r` shares a bucket somewhere. The partition count
//! grows exponentially in `r`, so this suits small radii.
//!
//! ## Brute force
//!
//! One identity partition. Useful as an oracle for exact matches in tests.
//!
//! # Concurrency
//!
//! Tables are plain data: `&mut` for insert/erase, `&` for query and stats.
//! Wrap in a lock to share across threads. Construction randomness always
//! comes from a caller-supplied (or seeded) RNG, so indexes are reproducible.

pub mod bitvec;
pub mod error;
pub mod mask;
pub mod table;

// Re-exports
pub use bitvec::BitVector;
pub use error::{LshError, Result};
pub use mask::{CoveringMapping, Mask};
pub use table::{BruteParams, ClassicParams, CoveringParams, Table, TableParams, TableStats};
