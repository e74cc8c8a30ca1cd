//! Fixed-size Bloom filters over trigrams.
//!
//! Every filter is 2048 bits (256 bytes). A trigram is hashed once with a
//! djb2 variant and each round reads the next 11-bit window of that hash:
//!
//! | Round | Bit position                 |
//! |-------|------------------------------|
//! | 0     | `hash mod 2048`              |
//! | 1     | `(hash >> 11) mod 2048`      |
//! | 2     | `(hash >> 22) mod 2048`      |
//!
//! The same `rounds` must be used to build and to query a filter.

mod filter;
mod hash;

pub use filter::{BloomFilter, Rounds, FILTER_BITS, FILTER_BYTES};
pub use hash::trigram_hash;

#[cfg(test)]
mod tests;
