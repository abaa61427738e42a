//! Raw binary datasets for the table benchmarks.
//!
//! One 64-bit vector per 8-byte big-endian block, MSB first.

use hemingway::BitVector;
use rand::rngs::StdRng;
use rand::Rng;

pub const DIMENSIONS: usize = 64;
pub const RADIUS: u32 = 4;

/// Decode one vector per 8-byte block. A trailing partial block is ignored.
pub fn parse_dataset(bytes: &[u8]) -> Vec<BitVector> {
    bytes
        .chunks_exact(8)
        .map(|chunk| {
            let mut word = [0u8; 8];
            word.copy_from_slice(chunk);
            let n = u64::from_be_bytes(word);
            BitVector::from_bits((0..DIMENSIONS).map(|j| (n >> (63 - j)) & 1 == 1))
        })
        .collect()
}

/// Read the dataset named by `var`, or `None` when the variable is unset.
/// A set but unreadable or empty file aborts the run.
pub fn load(var: &str) -> Option<Vec<BitVector>> {
    let path = std::env::var(var).ok()?;
    let bytes =
        std::fs::read(&path).unwrap_or_else(|e| panic!("{var}: cannot read {path}: {e}"));
    let data = parse_dataset(&bytes);
    assert!(
        !data.is_empty(),
        "{var}: {path} holds no complete 8-byte vectors"
    );
    Some(data)
}

/// Queries near stored vectors: each flips up to `RADIUS` random bits.
pub fn near_queries(data: &[BitVector], n: usize, rng: &mut StdRng) -> Vec<BitVector> {
    assert!(!data.is_empty(), "no stored vectors to derive queries from");
    (0..n)
        .map(|_| {
            let base = &data[rng.random_range(0..data.len())];
            let flips: Vec<usize> = (0..rng.random_range(0..=RADIUS as usize))
                .map(|_| rng.random_range(0..DIMENSIONS))
                .collect();
            base.iter()
                .enumerate()
                .map(|(i, b)| b ^ (flips.iter().filter(|&&f| f == i).count() % 2 == 1))
                .collect()
        })
        .collect()
}
