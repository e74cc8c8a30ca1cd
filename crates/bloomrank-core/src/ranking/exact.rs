//! Trigram-membership ranking.
//!
//! This is the reference ("exact") side of the experiment. It is only as
//! exact as the filter is discriminative: `test` can report false positives
//! once a filter fills up.

use super::stable::{rank_descending, Ranking, ScoreEntry};
use crate::bloom::Rounds;
use crate::document::Document;
use crate::error::Result;
use crate::text::SearchTerm;

/// Counts the term trigrams that pass the document's filter test.
///
/// # Errors
///
/// Returns [`crate::Error::FilterNotBuilt`] if the document has no filter
/// for `(rounds, element_count)`.
pub fn score_exact(
    rounds: Rounds,
    element_count: usize,
    term: &SearchTerm,
    document: &Document,
) -> Result<u32> {
    let filter = document.filter(rounds, element_count)?;
    let matching = term
        .trigrams()
        .iter()
        .filter(|tri| filter.test(tri, rounds))
        .count();
    Ok(u32::try_from(matching).unwrap_or(u32::MAX))
}

/// Ranks documents by the number of matching term trigrams.
///
/// # Errors
///
/// Returns [`crate::Error::FilterNotBuilt`] if any document lacks the filter.
pub fn rank_exact(
    rounds: Rounds,
    element_count: usize,
    term: &SearchTerm,
    documents: &[Document],
) -> Result<Ranking> {
    let entries = documents
        .iter()
        .map(|doc| {
            score_exact(rounds, element_count, term, doc).map(|s| ScoreEntry::new(doc.index(), s))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(rank_descending(entries))
}
