//! djb2-style trigram hash.

use crate::text::Trigram;

const SEED: i64 = 5381;
const ITERATIONS: usize = 33;

/// Hashes a trigram to a non-negative integer.
///
/// The accumulator starts at 5381 and runs 33 iterations of
/// `acc = acc * 33 ^ byte[i % 3]` in wrapping signed 64-bit arithmetic, so
/// the three bytes are folded in eleven times each. The absolute value of
/// the accumulator is returned.
///
/// The output must stay bit-for-bit stable: stored filters and expected
/// distances depend on it.
#[must_use]
pub fn trigram_hash(trigram: &Trigram) -> u64 {
    let mut h = SEED;
    for i in 0..ITERATIONS {
        h = h.wrapping_mul(33) ^ i64::from(trigram[i % 3]);
    }
    // i64::MIN has no positive counterpart; unsigned_abs maps it to 2^63.
    h.unsigned_abs()
}
