//! Bit-overlap ranking.
//!
//! All term trigrams go into one query filter; a document scores the number
//! of bits it shares with that filter. No per-trigram test is made, so a
//! saturated document filter scores high even when nothing really matches.

use super::stable::{rank_descending, Ranking, ScoreEntry};
use crate::bloom::{BloomFilter, Rounds};
use crate::document::Document;
use crate::error::Result;
use crate::text::SearchTerm;

/// Number of bits set in both the query filter and the document filter.
///
/// # Errors
///
/// Returns [`crate::Error::FilterNotBuilt`] if the document has no filter
/// for `(rounds, element_count)`.
pub fn score_approximate(
    query: &BloomFilter,
    rounds: Rounds,
    element_count: usize,
    document: &Document,
) -> Result<u32> {
    Ok(query.overlap(document.filter(rounds, element_count)?))
}

/// Ranks documents by bit overlap with the term's query filter.
///
/// The query filter is not length limited: every term trigram is inserted
/// with `rounds`.
///
/// # Errors
///
/// Returns [`crate::Error::FilterNotBuilt`] if any document lacks the filter.
pub fn rank_approximate(
    rounds: Rounds,
    element_count: usize,
    term: &SearchTerm,
    documents: &[Document],
) -> Result<Ranking> {
    let query = BloomFilter::from_trigrams(term.trigrams(), rounds);

    let entries = documents
        .iter()
        .map(|doc| {
            score_approximate(&query, rounds, element_count, doc)
                .map(|s| ScoreEntry::new(doc.index(), s))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(rank_descending(entries))
}
