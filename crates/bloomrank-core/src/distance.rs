//! Kendall-tau style distance between two rankings.
//!
//! Only the first `N` documents of the reference ranking are compared. For
//! each ordered pair `(x, y)` of that prefix (x ranked above y), the pair is
//! discordant when the other ranking puts `x` below `y`. The discordant
//! fraction is scaled to `[0, 1000]`:
//!
//! ```text
//! distance = round(discordant / (n * (n - 1) / 2) * 1000)
//! ```

use rustc_hash::FxHashMap;

use crate::document::DocumentIndex;
use crate::error::{Error, Result};

/// Upper bound of [`rank_distance`].
pub const MAX_DISTANCE: u32 = 1000;

/// Compares `approximate` against the top `prefix_n` of `exact`.
///
/// Returns 0 when the orders agree on every pair and 1000 when every pair is
/// inverted. When the exact ranking holds fewer than 2 documents there is
/// no pair to compare and the result is 0.
///
/// # Errors
///
/// - [`Error::InvalidPrefix`] if `prefix_n < 2`.
/// - [`Error::RankingMismatch`] if a document of the exact prefix does not
///   appear in `approximate`.
pub fn rank_distance(
    exact: &[DocumentIndex],
    approximate: &[DocumentIndex],
    prefix_n: usize,
) -> Result<u32> {
    if prefix_n < 2 {
        return Err(Error::InvalidPrefix(prefix_n));
    }

    let prefix = &exact[..exact.len().min(prefix_n)];
    let n = prefix.len();
    if n < 2 {
        return Ok(0);
    }

    let positions: FxHashMap<DocumentIndex, usize> = approximate
        .iter()
        .enumerate()
        .map(|(rank, &doc)| (doc, rank))
        .collect();

    let approx_ranks = prefix
        .iter()
        .map(|doc| positions.get(doc).copied().ok_or(Error::RankingMismatch(*doc)))
        .collect::<Result<Vec<usize>>>()?;

    let mut discordant: u64 = 0;
    for (i, &rank_x) in approx_ranks.iter().enumerate() {
        discordant += approx_ranks[i + 1..]
            .iter()
            .filter(|&&rank_y| rank_x > rank_y)
            .count() as u64;
    }

    let pairs = (n * (n - 1) / 2) as u64;
    // Round half up: (2 * d * 1000 + pairs) / (2 * pairs)
    let scaled = (2 * discordant * u64::from(MAX_DISTANCE) + pairs) / (2 * pairs);
    Ok(u32::try_from(scaled).unwrap_or(MAX_DISTANCE))
}
