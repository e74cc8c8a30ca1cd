//! Corpus construction: chunking source text into indexed documents.
//!
//! # Lifecycle
//!
//! 1. [`load_source`] reads a source text; [`chunk_source`] cuts fixed-size chunks from one source text.
//! 2. [`Corpus::from_chunks`] canonicalizes every chunk.
//! 3. [`Corpus::build_filters`] fills every filter store, documents in parallel.
//! 4. Rankers only read; nothing is mutated afterwards.

use rayon::prelude::*;
use std::path::Path;

use crate::document::{Document, FilterKey};
use crate::error::{Error, Result};

/// Cuts `documents` consecutive chunks of `chunk_chars` characters from the
/// start of `source`.
///
/// Chunks are measured in characters, so multi-byte text is never split
/// inside a character.
///
/// # Errors
///
/// Returns [`Error::SourceTooShort`] if the source holds fewer than
/// `documents * chunk_chars` characters.
pub fn chunk_source(source: &str, documents: usize, chunk_chars: usize) -> Result<Vec<String>> {
    let required = documents.saturating_mul(chunk_chars);
    let actual = source.chars().count();
    if actual < required {
        return Err(Error::SourceTooShort { required, actual });
    }

    let mut chunks = Vec::with_capacity(documents);
    let mut chars = source.chars();
    for _ in 0..documents {
        chunks.push(chars.by_ref().take(chunk_chars).collect());
    }
    Ok(chunks)
}

/// Reads a whole source text file.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be read or is not UTF-8.
pub fn load_source<P: AsRef<Path>>(path: P) -> Result<String> {
    Ok(std::fs::read_to_string(path)?)
}

/// The indexed document collection the rankers read from.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    documents: Vec<Document>,
}

impl Corpus {
    /// Creates a corpus; each chunk's position becomes its index.
    #[must_use]
    pub fn from_chunks<I, S>(chunks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let documents = chunks
            .into_iter()
            .enumerate()
            .map(|(i, chunk)| Document::new(i, chunk))
            .collect();
        Self { documents }
    }

    /// Creates a corpus from prepared documents.
    #[must_use]
    pub fn from_documents(documents: Vec<Document>) -> Self {
        Self { documents }
    }

    /// Documents in index order.
    #[must_use]
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Number of documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Returns true if the corpus has no documents.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Length of the shortest canonical text, `None` when empty.
    #[must_use]
    pub fn min_canonical_len(&self) -> Option<usize> {
        self.documents.iter().map(|d| d.canonical().len()).min()
    }

    /// Checks that every document has at least `required` canonical characters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TextTooShort`] with the shortest document length.
    pub fn ensure_min_len(&self, required: usize) -> Result<()> {
        match self.min_canonical_len() {
            Some(actual) if actual < required => Err(Error::TextTooShort { required, actual }),
            _ => Ok(()),
        }
    }

    /// Builds every filter in `keys` for every document.
    ///
    /// Returns once all filters exist; rankers may read afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TextTooShort`] if any document is too short for a key.
    pub fn build_filters(&mut self, keys: &[FilterKey]) -> Result<()> {
        self.documents
            .par_iter_mut()
            .try_for_each(|doc| keys.iter().try_for_each(|&key| doc.build_filter(key)))?;

        tracing::debug!(
            documents = self.documents.len(),
            keys = keys.len(),
            "built document filters"
        );
        Ok(())
    }
}
