//! Text canonicalization and trigram extraction.
//!
//! Canonical text contains only `[a-z0-9#]`: everything else, whitespace
//! included, is dropped so adjacent words fuse into one token stream.
//! Trigrams are taken over that byte stream without any padding.

use rustc_hash::FxHashSet;

use crate::error::{Error, Result};

/// Trigram type: 3 bytes of canonical text.
pub type Trigram = [u8; 3];

/// Window length of a trigram.
pub const TRIGRAM_LEN: usize = 3;

/// Canonicalizes text for matching.
///
/// Lowercases with full Unicode case mapping, then removes every character
/// outside `[a-z0-9#]`. Characters whose lowercase form is ASCII survive
/// (the Kelvin sign becomes `k`); other non-ASCII characters are removed.
///
/// # Example
///
/// ```
/// use bloomrank_core::text::canonicalize;
///
/// assert_eq!(
///     canonicalize("Hello, World! #This\nis a test."),
///     "helloworld#thisisatest"
/// );
/// ```
#[must_use]
pub fn canonicalize(text: &str) -> String {
    text.chars()
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '#')
        .collect()
}

/// Extracts the unique trigrams of already canonicalized text.
///
/// Slides a 3-byte window with stride 1. Text shorter than 3 bytes yields
/// an empty set.
#[must_use]
pub fn extract_trigrams(text: &str) -> FxHashSet<Trigram> {
    let bytes = text.as_bytes();
    let mut trigrams =
        FxHashSet::with_capacity_and_hasher(bytes.len().saturating_sub(2), Default::default());

    for window in bytes.windows(TRIGRAM_LEN) {
        trigrams.insert([window[0], window[1], window[2]]);
    }

    trigrams
}

/// Renders a trigram for logs and CLI output.
#[must_use]
pub fn trigram_str(trigram: &Trigram) -> String {
    String::from_utf8_lossy(trigram).into_owned()
}

/// The trigram set of one search term.
///
/// Trigrams are deduplicated and kept sorted, so iteration order (and
/// anything logged from it) is deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm {
    source: String,
    trigrams: Vec<Trigram>,
}

impl SearchTerm {
    /// Creates a search term from canonical text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TermTooShort`] if the text has fewer than 3 bytes.
    pub fn new(canonical: &str) -> Result<Self> {
        if canonical.len() < TRIGRAM_LEN {
            return Err(Error::TermTooShort(canonical.len()));
        }

        let mut trigrams: Vec<Trigram> = extract_trigrams(canonical).into_iter().collect();
        trigrams.sort_unstable();

        Ok(Self {
            source: canonical.to_string(),
            trigrams,
        })
    }

    /// Canonicalizes raw text, then builds the search term.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TermTooShort`] if the canonical form is shorter than 3.
    pub fn from_text(text: &str) -> Result<Self> {
        Self::new(&canonicalize(text))
    }

    /// Canonical text the term was built from.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Unique trigrams, sorted.
    #[must_use]
    pub fn trigrams(&self) -> &[Trigram] {
        &self.trigrams
    }

    /// Number of unique trigrams.
    #[must_use]
    pub fn len(&self) -> usize {
        self.trigrams.len()
    }

    /// Always false for a constructed term; provided for API symmetry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.trigrams.is_empty()
    }
}
