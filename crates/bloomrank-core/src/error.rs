//! Error types for `bloomrank`.
//!
//! Every failure in the evaluation pipeline is a broken precondition: the
//! experiment is only meaningful when its inputs are valid, so nothing here
//! is retried or silently patched up.

use thiserror::Error;

/// Result type alias for `bloomrank` operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building filters, ranking or measuring.
///
/// Error codes follow the pattern `BLOOM-XXX`.
#[derive(Error, Debug)]
pub enum Error {
    /// Rounds outside the supported range (BLOOM-001).
    #[error("[BLOOM-001] Rounds must be between 1 and 3, got {0}")]
    InvalidRounds(u8),

    /// Canonicalized text too short for the requested element count (BLOOM-002).
    #[error("[BLOOM-002] Canonicalized text too short: need {required} characters, got {actual}")]
    TextTooShort {
        /// Minimum number of canonical characters.
        required: usize,
        /// Characters actually available.
        actual: usize,
    },

    /// Search term shorter than one trigram (BLOOM-003).
    #[error("[BLOOM-003] Search term must have at least 3 canonical characters, got {0}")]
    TermTooShort(usize),

    /// Rank distance prefix that cannot form a pair (BLOOM-004).
    #[error("[BLOOM-004] Rank distance prefix must be at least 2, got {0}")]
    InvalidPrefix(usize),

    /// Ranking requested against a filter that was never built (BLOOM-005).
    #[error("[BLOOM-005] Document {document} has no filter for rounds={rounds}, elements={element_count}")]
    FilterNotBuilt {
        /// Document index.
        document: usize,
        /// Rounds of the missing filter.
        rounds: u8,
        /// Element count of the missing filter.
        element_count: usize,
    },

    /// Rankings cover different document sets (BLOOM-006).
    #[error("[BLOOM-006] Document {0} is missing from the approximate ranking")]
    RankingMismatch(usize),

    /// Source text cannot supply the requested chunks (BLOOM-007).
    #[error("[BLOOM-007] Source text too short: need {required} characters, got {actual}")]
    SourceTooShort {
        /// Characters needed for all chunks.
        required: usize,
        /// Characters in the source.
        actual: usize,
    },

    /// Configuration error (BLOOM-008).
    #[error("[BLOOM-008] Configuration error: {0}")]
    Config(String),

    /// IO error (BLOOM-009).
    #[error("[BLOOM-009] IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns the error code (e.g., "BLOOM-001").
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidRounds(_) => "BLOOM-001",
            Self::TextTooShort { .. } => "BLOOM-002",
            Self::TermTooShort(_) => "BLOOM-003",
            Self::InvalidPrefix(_) => "BLOOM-004",
            Self::FilterNotBuilt { .. } => "BLOOM-005",
            Self::RankingMismatch(_) => "BLOOM-006",
            Self::SourceTooShort { .. } => "BLOOM-007",
            Self::Config(_) => "BLOOM-008",
            Self::Io(_) => "BLOOM-009",
        }
    }
}

impl From<crate::config::ConfigError> for Error {
    fn from(err: crate::config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}
