//! Documents and their per-parameter Bloom filters.
//!
//! A [`Document`] owns its raw chunk, the canonical form and a
//! [`FilterStore`] holding one filter per `(rounds, element_count)` pair.
//! Filters are never evicted or mutated once built.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::bloom::{BloomFilter, Rounds};
use crate::error::{Error, Result};
use crate::text::canonicalize;

/// Stable position of a document in its corpus.
pub type DocumentIndex = usize;

/// Parameters a filter was built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FilterKey {
    /// Bits set per trigram.
    pub rounds: Rounds,
    /// Leading trigram windows inserted.
    pub element_count: usize,
}

impl FilterKey {
    /// Creates a key.
    #[must_use]
    pub const fn new(rounds: Rounds, element_count: usize) -> Self {
        Self {
            rounds,
            element_count,
        }
    }
}

impl fmt::Display for FilterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "k={} n={}", self.rounds, self.element_count)
    }
}

/// Filters of one document, keyed by build parameters.
#[derive(Debug, Clone, Default)]
pub struct FilterStore {
    filters: FxHashMap<FilterKey, BloomFilter>,
}

impl FilterStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a filter, replacing any previous one for the same key.
    pub fn insert(&mut self, key: FilterKey, filter: BloomFilter) {
        self.filters.insert(key, filter);
    }

    /// Returns the filter for `key`, if built.
    #[must_use]
    pub fn get(&self, key: FilterKey) -> Option<&BloomFilter> {
        self.filters.get(&key)
    }

    /// Checks whether a filter exists for `key`.
    #[must_use]
    pub fn contains(&self, key: FilterKey) -> bool {
        self.filters.contains_key(&key)
    }

    /// Number of stored filters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Returns true if no filter was stored yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

/// One chunk of source text.
#[derive(Debug, Clone)]
pub struct Document {
    index: DocumentIndex,
    text: String,
    canonical: String,
    filters: FilterStore,
}

impl Document {
    /// Creates a document and canonicalizes its text.
    #[must_use]
    pub fn new(index: DocumentIndex, text: impl Into<String>) -> Self {
        let text = text.into();
        let canonical = canonicalize(&text);
        Self {
            index,
            text,
            canonical,
            filters: FilterStore::new(),
        }
    }

    /// Position in the corpus.
    #[must_use]
    pub fn index(&self) -> DocumentIndex {
        self.index
    }

    /// Raw text as loaded.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Canonical form of the text.
    #[must_use]
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    /// Read access to the filter store.
    #[must_use]
    pub fn filters(&self) -> &FilterStore {
        &self.filters
    }

    /// Builds and stores the filter for `key`. Already built keys are kept.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TextTooShort`] if the canonical text is shorter than
    /// `key.element_count + 2`.
    pub fn build_filter(&mut self, key: FilterKey) -> Result<()> {
        if self.filters.contains(key) {
            return Ok(());
        }
        let filter = BloomFilter::build(&self.canonical, key.rounds, key.element_count)?;
        self.filters.insert(key, filter);
        Ok(())
    }

    /// Stores a prebuilt filter (used for synthetic corpora).
    pub fn insert_filter(&mut self, key: FilterKey, filter: BloomFilter) {
        self.filters.insert(key, filter);
    }

    /// Returns the filter for `(rounds, element_count)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FilterNotBuilt`] if it was never built.
    pub fn filter(&self, rounds: Rounds, element_count: usize) -> Result<&BloomFilter> {
        self.filters
            .get(FilterKey::new(rounds, element_count))
            .ok_or(Error::FilterNotBuilt {
                document: self.index,
                rounds: rounds.get(),
                element_count,
            })
    }
}
