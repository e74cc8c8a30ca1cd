//! # `bloomrank` Core
//!
//! Measures how much ranking quality is lost when documents are scored by
//! Bloom-filter bit overlap instead of per-trigram membership tests.
//!
//! ## Pipeline
//!
//! 1. **Canonicalize** raw text to `[a-z0-9#]` ([`canonicalize`]).
//! 2. **Extract trigrams** and hash them ([`extract_trigrams`], [`trigram_hash`]).
//! 3. **Build** a 2048-bit [`BloomFilter`] per document and parameter pair.
//! 4. **Rank** documents twice: [`rank_exact`] and [`rank_approximate`].
//! 5. **Compare** the rankings with [`rank_distance`] (0 = same order, 1000 = reversed).
//!
//! ## Quick Start
//!
//! ```rust
//! use bloomrank_core::{
//!     rank_approximate, rank_distance, rank_exact, Corpus, FilterKey, Rounds, SearchTerm,
//! };
//!
//! let mut corpus = Corpus::from_chunks([
//!     "The quick brown fox jumps over the lazy dog",
//!     "Pack my box with five dozen liquor jugs now",
//!     "How vexingly quick daft zebras jump tonight",
//! ]);
//! let rounds = Rounds::new(2)?;
//! corpus.build_filters(&[FilterKey::new(rounds, 20)])?;
//!
//! let term = SearchTerm::from_text("quick")?;
//! let exact = rank_exact(rounds, 20, &term, corpus.documents())?;
//! let approx = rank_approximate(rounds, 20, &term, corpus.documents())?;
//!
//! let distance = rank_distance(&exact, &approx, 10)?;
//! assert!(distance <= 1000);
//! # Ok::<(), bloomrank_core::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)] // Acceptable for fill ratios
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_panics_doc)]

pub mod bloom;
pub mod config;
pub mod corpus;
pub mod distance;
pub mod document;
pub mod error;
#[cfg(test)]
mod error_tests;
pub mod experiment;
pub mod ranking;
pub mod text;

pub use bloom::{trigram_hash, BloomFilter, Rounds, FILTER_BITS, FILTER_BYTES};
pub use config::{ConfigError, ExperimentConfig};
pub use corpus::{chunk_source, load_source, Corpus};
pub use distance::{rank_distance, MAX_DISTANCE};
pub use document::{Document, DocumentIndex, FilterKey, FilterStore};
pub use error::{Error, Result};
pub use experiment::{evaluate_term, Experiment, ResultRecord, TermSampler};
pub use ranking::{rank_approximate, rank_descending, rank_exact, Ranking, ScoreEntry};
pub use text::{canonicalize, extract_trigrams, SearchTerm, Trigram};
