//! Parameter sweep comparing the two rankers.
//!
//! For every `(rounds, element_count, term_length)` cell the sweep samples
//! search terms from the corpus, ranks every document both ways and
//! averages the rank distance. Results are a flat list of
//! [`ResultRecord`]s; aggregation across sources is left to the reporter.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::bloom::Rounds;
use crate::config::ExperimentConfig;
use crate::corpus::Corpus;
use crate::distance::rank_distance;
use crate::error::{Error, Result};
use crate::ranking::{rank_approximate, rank_exact};
use crate::text::SearchTerm;

/// Average distance of one sweep cell for one source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    /// Source the corpus was cut from.
    pub source: String,
    /// Rounds of the approximate ranker.
    pub rounds: u8,
    /// Leading trigram count of the filters.
    pub element_count: usize,
    /// Length of the sampled terms.
    pub term_length: usize,
    /// Mean rank distance over the sampled terms, rounded.
    pub average_distance: u32,
}

/// Draws random search terms from a corpus.
pub struct TermSampler {
    rng: StdRng,
}

impl TermSampler {
    /// Creates a sampler; `None` seeds from OS entropy.
    #[must_use]
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }

    /// Picks a random document, then a random `term_length` window of its
    /// canonical text starting in `[0, len - term_length)`.
    ///
    /// # Errors
    ///
    /// - [`Error::TermTooShort`] if `term_length < 3`.
    /// - [`Error::TextTooShort`] if the corpus is empty or the chosen
    ///   document has no room for the window.
    pub fn sample(&mut self, corpus: &Corpus, term_length: usize) -> Result<SearchTerm> {
        let documents = corpus.documents();
        if documents.is_empty() {
            return Err(Error::TextTooShort {
                required: term_length.saturating_add(1),
                actual: 0,
            });
        }

        let doc = &documents[self.rng.gen_range(0..documents.len())];
        let canonical = doc.canonical();
        if canonical.len() <= term_length {
            return Err(Error::TextTooShort {
                required: term_length.saturating_add(1),
                actual: canonical.len(),
            });
        }

        let start = self.rng.gen_range(0..canonical.len() - term_length);
        // Canonical text is ASCII; the slice cannot split a character.
        let window = canonical
            .get(start..start + term_length)
            .ok_or(Error::TextTooShort {
                required: start + term_length,
                actual: canonical.len(),
            })?;
        SearchTerm::new(window)
    }

    /// Samples `count` terms of the same length.
    ///
    /// # Errors
    ///
    /// See [`TermSampler::sample`].
    pub fn sample_many(
        &mut self,
        corpus: &Corpus,
        term_length: usize,
        count: usize,
    ) -> Result<Vec<SearchTerm>> {
        (0..count).map(|_| self.sample(corpus, term_length)).collect()
    }
}

/// Rank distance of one term: exact ranking with `exact_rounds` against the
/// approximate ranking with `rounds`, both at `element_count`.
///
/// # Errors
///
/// Propagates ranking and distance errors.
pub fn evaluate_term(
    corpus: &Corpus,
    term: &SearchTerm,
    exact_rounds: Rounds,
    rounds: Rounds,
    element_count: usize,
    top_n: usize,
) -> Result<u32> {
    let documents = corpus.documents();
    let exact = rank_exact(exact_rounds, element_count, term, documents)?;
    let approximate = rank_approximate(rounds, element_count, term, documents)?;
    let distance = rank_distance(&exact, &approximate, top_n)?;

    tracing::debug!(term = term.source(), distance, "evaluated term");
    Ok(distance)
}

/// Mean of `values`, rounded half away from zero. Empty input gives 0.
#[must_use]
pub fn rounded_mean(values: &[u32]) -> u32 {
    if values.is_empty() {
        return 0;
    }
    let total: u64 = values.iter().map(|&v| u64::from(v)).sum();
    let n = values.len() as u64;
    u32::try_from((2 * total + n) / (2 * n)).unwrap_or(u32::MAX)
}

/// Runs the configured sweep.
pub struct Experiment {
    config: ExperimentConfig,
}

impl Experiment {
    /// Creates an experiment after validating the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the configuration is invalid.
    pub fn new(config: ExperimentConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    /// Chunks a source text into a corpus sized for this sweep.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SourceTooShort`] if the text cannot supply every
    /// chunk, or [`Error::TextTooShort`] if a canonical chunk is shorter
    /// than the sweep needs.
    pub fn prepare_corpus(&self, source_text: &str) -> Result<Corpus> {
        let chunks = crate::corpus::chunk_source(
            source_text,
            self.config.corpus.documents_per_source,
            self.config.corpus.chunk_chars,
        )?;
        let corpus = Corpus::from_chunks(chunks);
        corpus.ensure_min_len(self.config.required_canonical_len())?;
        Ok(corpus)
    }

    /// Runs every sweep cell over one corpus.
    ///
    /// Builds all filters first, then evaluates cells in config order. Terms
    /// of a cell are sampled sequentially (seed-reproducible) and evaluated
    /// in parallel.
    ///
    /// # Errors
    ///
    /// Returns the first filter, sampling, ranking or distance error.
    pub fn run(&self, source: &str, corpus: &mut Corpus) -> Result<Vec<ResultRecord>> {
        let sweep = &self.config.experiment;
        let exact_rounds = self.config.exact_rounds()?;
        let grid = self.config.filter_grid()?;

        corpus.ensure_min_len(self.config.required_canonical_len())?;
        corpus.build_filters(&grid)?;
        tracing::info!(
            source,
            documents = corpus.len(),
            filters = grid.len(),
            "corpus ready"
        );

        let corpus: &Corpus = corpus;
        let mut sampler = TermSampler::new(sweep.seed);
        let mut records = Vec::with_capacity(
            sweep.rounds.len() * sweep.element_counts.len() * sweep.term_lengths.len(),
        );

        for rounds in self.config.sweep_rounds()? {
            for &element_count in &sweep.element_counts {
                for &term_length in &sweep.term_lengths {
                    let terms = sampler.sample_many(corpus, term_length, sweep.terms_per_cell)?;

                    let distances = terms
                        .par_iter()
                        .map(|term| {
                            evaluate_term(
                                corpus,
                                term,
                                exact_rounds,
                                rounds,
                                element_count,
                                sweep.top_n,
                            )
                        })
                        .collect::<Result<Vec<u32>>>()?;

                    let average_distance = rounded_mean(&distances);
                    tracing::info!(
                        source,
                        rounds = rounds.get(),
                        element_count,
                        term_length,
                        average_distance,
                        "cell done"
                    );

                    records.push(ResultRecord {
                        source: source.to_string(),
                        rounds: rounds.get(),
                        element_count,
                        term_length,
                        average_distance,
                    });
                }
            }
        }

        Ok(records)
    }

    /// Chunks `source_text` and runs the sweep on it.
    ///
    /// # Errors
    ///
    /// See [`Experiment::prepare_corpus`] and [`Experiment::run`].
    pub fn run_source(&self, source: &str, source_text: &str) -> Result<Vec<ResultRecord>> {
        let mut corpus = self.prepare_corpus(source_text)?;
        self.run(source, &mut corpus)
    }
}
