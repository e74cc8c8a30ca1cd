//! Stable descending ranking shared by both rankers.

use crate::document::DocumentIndex;

/// Documents ordered best first.
pub type Ranking = Vec<DocumentIndex>;

/// Score of one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreEntry {
    /// Scored document.
    pub index: DocumentIndex,
    /// Higher is better.
    pub score: u32,
}

impl ScoreEntry {
    /// Creates a score entry.
    #[must_use]
    pub const fn new(index: DocumentIndex, score: u32) -> Self {
        Self { index, score }
    }
}

/// Orders entries by score, highest first.
///
/// `sort_by` is stable, so entries with equal scores keep the order in
/// which they were scored. This is the same order as inserting each entry
/// before the first strictly lower score in a running list.
#[must_use]
pub fn rank_descending(mut entries: Vec<ScoreEntry>) -> Ranking {
    entries.sort_by(|a, b| b.score.cmp(&a.score));
    entries.into_iter().map(|e| e.index).collect()
}
