//! Experiment configuration.
//!
//! Provides configuration file support via `bloomrank.toml`, environment
//! variables and runtime overrides.
//!
//! # Priority (highest to lowest)
//!
//! 1. Runtime overrides (CLI flags)
//! 2. Environment variables (`BLOOMRANK_*`, `__` between nested keys)
//! 3. Configuration file (`bloomrank.toml`)
//! 4. Default values

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::bloom::Rounds;
use crate::document::FilterKey;
use crate::text::TRIGRAM_LEN;

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = "bloomrank.toml";

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to parse configuration file.
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Invalid configuration value.
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue {
        /// Configuration key that failed validation.
        key: String,
        /// Validation error message.
        message: String,
    },
}

fn invalid(key: &str, message: String) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        message,
    }
}

/// Parameter grid of the sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// Rounds used by the approximate ranker.
    pub rounds: Vec<u8>,
    /// Rounds used by the exact (reference) ranker.
    pub exact_rounds: u8,
    /// Leading trigram counts to build filters for.
    pub element_counts: Vec<usize>,
    /// Search term lengths, in canonical characters.
    pub term_lengths: Vec<usize>,
    /// Sampled terms per grid cell.
    pub terms_per_cell: usize,
    /// Ranking prefix compared by the distance metric.
    pub top_n: usize,
    /// Sampling seed; random when absent.
    pub seed: Option<u64>,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            rounds: vec![1, 2, 3],
            exact_rounds: 2,
            element_counts: vec![34, 35, 36, 119, 120, 121, 249, 250, 251, 399, 400, 401],
            term_lengths: vec![3, 4, 5, 6, 7, 8, 9, 10, 16, 32],
            terms_per_cell: 50,
            top_n: 10,
            seed: None,
        }
    }
}

/// How source texts are cut into documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusConfig {
    /// Documents cut from every source.
    pub documents_per_source: usize,
    /// Characters per document chunk.
    pub chunk_chars: usize,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            documents_per_source: 100,
            chunk_chars: 1600,
        }
    }
}

/// Logging configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace.
    pub level: String,
    /// Log format: only "text" is supported.
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ExperimentConfig {
    /// Sweep grid.
    pub experiment: SweepConfig,
    /// Chunking.
    pub corpus: CorpusConfig,
    /// Logging.
    pub logging: LoggingConfig,
}

impl ExperimentConfig {
    /// Loads configuration from default sources.
    ///
    /// Priority: defaults < file < environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration parsing fails.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_path(DEFAULT_CONFIG_FILE)
    }

    /// Loads configuration from a specific file path.
    ///
    /// A missing file is not an error; defaults and environment still apply.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration parsing fails.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed("BLOOMRANK_").split("__"))
            .extract()
            .map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Creates a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::string(toml_str))
            .extract()
            .map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Serializes the configuration back to TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sweep = &self.experiment;

        if sweep.rounds.is_empty() {
            return Err(invalid("experiment.rounds", "must not be empty".to_string()));
        }
        for &k in &sweep.rounds {
            if Rounds::new(k).is_err() {
                return Err(invalid(
                    "experiment.rounds",
                    format!("value {k} is out of range [1, 3]"),
                ));
            }
        }
        if Rounds::new(sweep.exact_rounds).is_err() {
            return Err(invalid(
                "experiment.exact_rounds",
                format!("value {} is out of range [1, 3]", sweep.exact_rounds),
            ));
        }

        if sweep.element_counts.is_empty() {
            return Err(invalid(
                "experiment.element_counts",
                "must not be empty".to_string(),
            ));
        }
        if sweep.element_counts.contains(&0) {
            return Err(invalid(
                "experiment.element_counts",
                "values must be >= 1".to_string(),
            ));
        }

        if sweep.term_lengths.is_empty() {
            return Err(invalid(
                "experiment.term_lengths",
                "must not be empty".to_string(),
            ));
        }
        if let Some(&short) = sweep.term_lengths.iter().find(|&&l| l < TRIGRAM_LEN) {
            return Err(invalid(
                "experiment.term_lengths",
                format!("value {short} must be >= {TRIGRAM_LEN}"),
            ));
        }

        if sweep.terms_per_cell == 0 {
            return Err(invalid(
                "experiment.terms_per_cell",
                "value 0 must be >= 1".to_string(),
            ));
        }
        if sweep.top_n < 2 {
            return Err(invalid(
                "experiment.top_n",
                format!("value {} must be >= 2", sweep.top_n),
            ));
        }

        if self.corpus.documents_per_source == 0 {
            return Err(invalid(
                "corpus.documents_per_source",
                "value 0 must be >= 1".to_string(),
            ));
        }
        if self.corpus.chunk_chars < TRIGRAM_LEN {
            return Err(invalid(
                "corpus.chunk_chars",
                format!(
                    "value {} must be >= {TRIGRAM_LEN}",
                    self.corpus.chunk_chars
                ),
            ));
        }

        let valid_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(invalid(
                "logging.level",
                format!(
                    "value '{}' is invalid, expected one of: {:?}",
                    self.logging.level, valid_levels
                ),
            ));
        }
        if self.logging.format != "text" {
            return Err(invalid(
                "logging.format",
                format!("value '{}' is invalid, expected \"text\"", self.logging.format),
            ));
        }

        Ok(())
    }

    /// Sweep rounds as validated values.
    ///
    /// # Errors
    ///
    /// Returns an error if a value is out of range.
    pub fn sweep_rounds(&self) -> crate::Result<Vec<Rounds>> {
        self.experiment.rounds.iter().map(|&k| Rounds::new(k)).collect()
    }

    /// Rounds of the exact ranker.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is out of range.
    pub fn exact_rounds(&self) -> crate::Result<Rounds> {
        Rounds::new(self.experiment.exact_rounds)
    }

    /// Every filter the sweep reads: sweep rounds plus exact rounds, for
    /// every element count. Sorted and deduplicated.
    ///
    /// # Errors
    ///
    /// Returns an error if a rounds value is out of range.
    pub fn filter_grid(&self) -> crate::Result<Vec<FilterKey>> {
        let mut rounds = self.sweep_rounds()?;
        rounds.push(self.exact_rounds()?);

        let mut keys: Vec<FilterKey> = rounds
            .iter()
            .flat_map(|&k| {
                self.experiment
                    .element_counts
                    .iter()
                    .map(move |&n| FilterKey::new(k, n))
            })
            .collect();
        keys.sort_unstable();
        keys.dedup();
        Ok(keys)
    }

    /// Minimum canonical length every document needs.
    #[must_use]
    pub fn required_canonical_len(&self) -> usize {
        let max_elements = self
            .experiment
            .element_counts
            .iter()
            .copied()
            .max()
            .unwrap_or(0);
        let max_term = self.experiment.term_lengths.iter().copied().max().unwrap_or(0);
        // The sampler needs at least one start position for the longest term.
        max_elements
            .saturating_add(2)
            .max(max_term.saturating_add(1))
    }
}
