//! Tests for `error` module

use super::error::*;

#[test]
fn test_error_codes_are_unique() {
    // Arrange - create all error variants
    let errors: Vec<Error> = vec![
        Error::InvalidRounds(4),
        Error::TextTooShort {
            required: 402,
            actual: 100,
        },
        Error::TermTooShort(2),
        Error::InvalidPrefix(1),
        Error::FilterNotBuilt {
            document: 3,
            rounds: 2,
            element_count: 34,
        },
        Error::RankingMismatch(7),
        Error::SourceTooShort {
            required: 160_000,
            actual: 10,
        },
        Error::Config("test".into()),
        Error::Io(std::io::Error::other("test")),
    ];

    // Act
    let codes: Vec<&str> = errors.iter().map(Error::code).collect();

    // Assert
    let mut unique_codes = codes.clone();
    unique_codes.sort_unstable();
    unique_codes.dedup();
    assert_eq!(codes.len(), unique_codes.len(), "Error codes must be unique");

    for code in &codes {
        assert!(code.starts_with("BLOOM-"), "Code {code} should start with BLOOM-");
    }
}

#[test]
fn test_error_display_includes_code() {
    let err = Error::FilterNotBuilt {
        document: 12,
        rounds: 2,
        element_count: 120,
    };

    let display = format!("{err}");

    assert!(display.starts_with("[BLOOM-005]"));
    assert!(display.contains("Document 12"));
    assert!(display.contains("elements=120"));
}

#[test]
fn test_text_too_short_message() {
    let err = Error::TextTooShort {
        required: 12,
        actual: 5,
    };

    assert_eq!(
        err.to_string(),
        "[BLOOM-002] Canonicalized text too short: need 12 characters, got 5"
    );
}

#[test]
fn test_io_error_conversion() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.txt");

    let err: Error = io.into();

    assert_eq!(err.code(), "BLOOM-009");
    assert!(err.to_string().contains("missing.txt"));
}

#[test]
fn test_config_error_conversion() {
    let cfg = crate::config::ConfigError::InvalidValue {
        key: "experiment.top_n".to_string(),
        message: "value 1 must be >= 2".to_string(),
    };

    let err: Error = cfg.into();

    assert_eq!(err.code(), "BLOOM-008");
    assert!(err.to_string().contains("experiment.top_n"));
}
