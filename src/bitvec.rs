//! Packed binary vectors.
//!
//! A [`BitVector`] stores a fixed number of bits packed MSB-first into `u64`
//! words: bit `i` lives in word `i / 64` at bit offset `63 - i % 64`. The last
//! word is left-aligned, so its unused low bits are always zero. Every
//! word-wise operation (AND, XOR, popcount) relies on that invariant, since
//! the padding then never contributes to a dot product or a distance.
//!
//! Vectors are immutable once built. All arithmetic returns new values.
//!
//! ## Hamming distance
//!
//! ```text
//! d(u, v) = popcount(u XOR v)
//! ```
//!
//! One XOR and one `count_ones` per 64 dimensions, which is why binary codes
//! are attractive for nearest-neighbor search in the first place.

use std::fmt;

use rand::Rng;

use crate::error::{LshError, Result};

/// Number of bits per storage word.
pub const WORD_BITS: usize = u64::BITS as usize;

/// Seed of the polynomial rolling hash.
const HASH_SEED: u64 = 7;

/// Multiplier of the polynomial rolling hash.
const HASH_MULTIPLIER: u64 = 31;

/// Number of words needed to hold `len` bits.
#[inline]
fn words_for(len: usize) -> usize {
    len.div_ceil(WORD_BITS)
}

/// Mask selecting the occupied (high) bits of the last word.
#[inline]
fn tail_mask(len: usize) -> u64 {
    match len % WORD_BITS {
        0 => u64::MAX,
        used => u64::MAX << (WORD_BITS - used),
    }
}

/// Bit within its word for position `index`.
#[inline]
fn bit_mask(index: usize) -> u64 {
    1u64 << (WORD_BITS - 1 - index % WORD_BITS)
}

/// A fixed-length, immutable, packed sequence of bits.
///
/// Equality compares length and contents. Two vectors of different lengths
/// are never equal; in particular the zero-length [`BitVector::empty`]
/// sentinel differs from every non-empty vector.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct BitVector {
    len: usize,
    words: Vec<u64>,
}

impl BitVector {
    /// The zero-length vector.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Pack a sequence of bits, first bit most significant.
    pub fn from_bits<I: IntoIterator<Item = bool>>(bits: I) -> Self {
        let bits = bits.into_iter();
        let mut words = Vec::with_capacity(words_for(bits.size_hint().0));
        let mut len = 0;

        for bit in bits {
            if len % WORD_BITS == 0 {
                words.push(0);
            }
            if bit {
                words[len / WORD_BITS] |= bit_mask(len);
            }
            len += 1;
        }

        Self { len, words }
    }

    /// Build from already-packed words.
    ///
    /// Callers guarantee `words.len() == ceil(len / 64)` and that the padding
    /// bits of the last word are zero.
    pub(crate) fn from_words(words: Vec<u64>, len: usize) -> Self {
        debug_assert_eq!(words.len(), words_for(len));
        debug_assert!(words.last().is_none_or(|w| w & !tail_mask(len) == 0));
        Self { len, words }
    }

    /// A `len`-bit vector with exactly the given positions set.
    ///
    /// Repeated positions are harmless; positions must be `< len`.
    pub(crate) fn from_positions<I: IntoIterator<Item = usize>>(len: usize, positions: I) -> Self {
        let mut words = vec![0u64; words_for(len)];
        for position in positions {
            debug_assert!(position < len);
            words[position / WORD_BITS] |= bit_mask(position);
        }
        Self { len, words }
    }

    /// The `len`-bit big-endian binary representation of `value`.
    ///
    /// Bit `k` of the result is bit `len - 1 - k` of `value`; positions above
    /// bit 63 of `value` are zero.
    pub(crate) fn from_integer(value: u64, len: usize) -> Self {
        Self::from_bits((0..len).map(|k| {
            let shift = len - 1 - k;
            shift < WORD_BITS && (value >> shift) & 1 == 1
        }))
    }

    /// `len` independent uniform random bits drawn from `rng`.
    pub fn random<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Self {
        let mut words: Vec<u64> = (0..words_for(len)).map(|_| rng.random()).collect();
        if let Some(last) = words.last_mut() {
            *last &= tail_mask(len);
        }
        Self { len, words }
    }

    /// Number of bits.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// True for the zero-length vector.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The packed words, MSB-first.
    #[inline]
    pub fn words(&self) -> &[u64] {
        &self.words
    }

    /// Bit at `index`.
    pub fn get(&self, index: usize) -> Result<bool> {
        if index >= self.len {
            return Err(LshError::IndexOutOfRange {
                index,
                len: self.len,
            });
        }
        Ok(self.bit(index))
    }

    #[inline]
    fn bit(&self, index: usize) -> bool {
        self.words[index / WORD_BITS] & bit_mask(index) != 0
    }

    /// Iterate over the bits in order.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).map(move |i| self.bit(i))
    }

    /// Number of set bits.
    pub fn count_ones(&self) -> u32 {
        self.words.iter().map(|w| w.count_ones()).sum()
    }

    /// Dot product over GF(2) lifted to the integers: the number of positions
    /// set in both vectors.
    pub fn dot(&self, other: &BitVector) -> Result<u32> {
        LshError::check_dimensions(self.len, other.len)?;
        Ok(self.dot_unchecked(other))
    }

    #[inline]
    pub(crate) fn dot_unchecked(&self, other: &BitVector) -> u32 {
        self.words
            .iter()
            .zip(&other.words)
            .map(|(a, b)| (a & b).count_ones())
            .sum()
    }

    /// Bitwise AND.
    pub fn and(&self, other: &BitVector) -> Result<BitVector> {
        LshError::check_dimensions(self.len, other.len)?;
        Ok(self.and_unchecked(other))
    }

    #[inline]
    pub(crate) fn and_unchecked(&self, other: &BitVector) -> BitVector {
        let words = self
            .words
            .iter()
            .zip(&other.words)
            .map(|(a, b)| a & b)
            .collect();
        BitVector::from_words(words, self.len)
    }

    /// Hamming distance: the number of positions at which the vectors differ.
    pub fn distance(&self, other: &BitVector) -> Result<u32> {
        LshError::check_dimensions(self.len, other.len)?;
        Ok(self.distance_unchecked(other))
    }

    #[inline]
    pub(crate) fn distance_unchecked(&self, other: &BitVector) -> u32 {
        self.words
            .iter()
            .zip(&other.words)
            .map(|(a, b)| (a ^ b).count_ones())
            .sum()
    }

    /// Polynomial rolling hash over the packed words (seed 7, multiplier 31).
    ///
    /// Not collision resistant. Buckets are keyed by the vector itself, so
    /// this is only a compact fingerprint for callers.
    pub fn rolling_hash(&self) -> u64 {
        self.words.iter().fold(HASH_SEED, |h, &w| {
            h.wrapping_mul(HASH_MULTIPLIER).wrapping_add(w)
        })
    }
}

impl FromIterator<bool> for BitVector {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        Self::from_bits(iter)
    }
}

impl fmt::Display for BitVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Vector[")?;
        for bit in self.iter() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        f.write_str("]")
    }
}
