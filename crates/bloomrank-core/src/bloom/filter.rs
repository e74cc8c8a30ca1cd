//! The 2048-bit Bloom filter.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::hash::trigram_hash;
use crate::error::{Error, Result};
use crate::text::{extract_trigrams, Trigram};

/// Number of bits in every filter (m).
pub const FILTER_BITS: usize = 2048;
/// Size of the filter in bytes.
pub const FILTER_BYTES: usize = FILTER_BITS / 8;

const WORDS: usize = FILTER_BITS / 64;
const ROUND_SHIFT: u32 = 11;

/// Number of bit positions set/tested per trigram (k).
///
/// Only 1, 2 and 3 are supported: three 11-bit windows already consume
/// 33 bits of the hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rounds(u8);

impl Rounds {
    /// Smallest supported value.
    pub const MIN: u8 = 1;
    /// Largest supported value.
    pub const MAX: u8 = 3;

    /// Creates a rounds value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRounds`] outside `1..=3`.
    pub fn new(rounds: u8) -> Result<Self> {
        if (Self::MIN..=Self::MAX).contains(&rounds) {
            Ok(Self(rounds))
        } else {
            Err(Error::InvalidRounds(rounds))
        }
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rounds {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Rounds> for u8 {
    fn from(rounds: Rounds) -> Self {
        rounds.0
    }
}

impl fmt::Display for Rounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Bit positions of a trigram for the given number of rounds.
fn bit_positions(trigram: &Trigram, rounds: Rounds) -> impl Iterator<Item = usize> {
    let hash = trigram_hash(trigram);
    (0..u32::from(rounds.get())).map(move |i| {
        // Fits: the value is below FILTER_BITS
        #[allow(clippy::cast_possible_truncation)]
        let pos = ((hash >> (ROUND_SHIFT * i)) % FILTER_BITS as u64) as usize;
        pos
    })
}

/// Fixed-size Bloom filter over trigrams.
///
/// Possible false positives, never false negatives. Filters are built once
/// and then only read: [`BloomFilter::build`] for documents,
/// [`BloomFilter::from_trigrams`] for queries.
#[derive(Clone, PartialEq, Eq)]
pub struct BloomFilter {
    /// Bit array; bit `p` lives in `words[p / 64]` at offset `p % 64`.
    words: [u64; WORDS],
}

impl BloomFilter {
    /// Creates an all-zero filter.
    #[must_use]
    pub const fn new() -> Self {
        Self { words: [0; WORDS] }
    }

    /// Creates a filter with every bit set.
    #[must_use]
    pub const fn saturated() -> Self {
        Self {
            words: [u64::MAX; WORDS],
        }
    }

    /// Builds a document filter from the leading trigrams of canonical text.
    ///
    /// Takes the first `element_count + 2` bytes, so exactly `element_count`
    /// trigram windows are covered, and inserts each unique trigram.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TextTooShort`] if `canonical` is shorter than
    /// `element_count + 2` bytes. An `element_count` too large to add 2 to is
    /// rejected the same way.
    pub fn build(canonical: &str, rounds: Rounds, element_count: usize) -> Result<Self> {
        let required = element_count.saturating_add(2);
        if canonical.len() < required {
            return Err(Error::TextTooShort {
                required,
                actual: canonical.len(),
            });
        }

        // Canonical text is ASCII, so any byte offset is a char boundary.
        let prefix = canonical.get(..required).ok_or(Error::TextTooShort {
            required,
            actual: canonical.len(),
        })?;

        Ok(Self::from_trigrams(extract_trigrams(prefix).iter(), rounds))
    }

    /// Builds a filter containing every given trigram.
    #[must_use]
    pub fn from_trigrams<'a, I>(trigrams: I, rounds: Rounds) -> Self
    where
        I: IntoIterator<Item = &'a Trigram>,
    {
        let mut filter = Self::new();
        for trigram in trigrams {
            filter.insert(trigram, rounds);
        }
        filter
    }

    /// Creates a filter from its 256-byte representation.
    ///
    /// Bit `p` is bit `p % 8` of byte `p / 8`.
    #[must_use]
    pub fn from_bytes(bytes: &[u8; FILTER_BYTES]) -> Self {
        let mut words = [0u64; WORDS];
        for (word, chunk) in words.iter_mut().zip(bytes.chunks_exact(8)) {
            let mut buf = [0u8; 8];
            buf.copy_from_slice(chunk);
            *word = u64::from_le_bytes(buf);
        }
        Self { words }
    }

    /// Returns the 256-byte representation.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; FILTER_BYTES] {
        let mut bytes = [0u8; FILTER_BYTES];
        for (chunk, word) in bytes.chunks_exact_mut(8).zip(self.words.iter()) {
            chunk.copy_from_slice(&word.to_le_bytes());
        }
        bytes
    }

    /// Inserts a trigram, setting `rounds` bits.
    pub fn insert(&mut self, trigram: &Trigram, rounds: Rounds) {
        for pos in bit_positions(trigram, rounds) {
            self.words[pos / 64] |= 1u64 << (pos % 64);
        }
    }

    /// Checks if a trigram might be in the filter.
    ///
    /// Returns `true` only if all `rounds` bits are set (possible false
    /// positive). Returns `false` if the trigram was definitely not inserted
    /// with these rounds.
    #[must_use]
    pub fn test(&self, trigram: &Trigram, rounds: Rounds) -> bool {
        bit_positions(trigram, rounds).all(|pos| self.is_set(pos))
    }

    /// Returns whether bit `pos` is set. Positions wrap modulo 2048.
    #[must_use]
    pub fn is_set(&self, pos: usize) -> bool {
        let pos = pos % FILTER_BITS;
        self.words[pos / 64] & (1u64 << (pos % 64)) != 0
    }

    /// Number of set bits.
    #[must_use]
    pub fn count_ones(&self) -> u32 {
        self.words.iter().map(|w| w.count_ones()).sum()
    }

    /// Number of bits set in both filters (popcount of the bitwise AND).
    #[must_use]
    pub fn overlap(&self, other: &Self) -> u32 {
        self.words
            .iter()
            .zip(other.words.iter())
            .map(|(a, b)| (a & b).count_ones())
            .sum()
    }

    /// Fraction of bits set, in `[0, 1]`.
    #[must_use]
    pub fn fill_ratio(&self) -> f64 {
        f64::from(self.count_ones()) / FILTER_BITS as f64
    }

    /// Estimated false positive rate for a filter queried with `rounds`.
    #[must_use]
    pub fn estimated_fpr(&self, rounds: Rounds) -> f64 {
        self.fill_ratio().powi(i32::from(rounds.get()))
    }
}

impl Default for BloomFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for BloomFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BloomFilter")
            .field("bits_set", &self.count_ones())
            .finish()
    }
}
