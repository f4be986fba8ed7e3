//! Error types for Billfold

use thiserror::Error;

/// What kind of extraction service failure occurred
///
/// Distinguishes "the call never completed" cases so callers can decide
/// whether a retry of the whole ingestion is worthwhile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionFailureKind {
    /// Connectivity failure, non-success status, or empty response
    Transient,
    /// The request exceeded the configured deadline
    Timeout,
}

impl std::fmt::Display for ExtractionFailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transient => write!(f, "transient"),
            Self::Timeout => write!(f, "timeout"),
        }
    }
}

/// A failure produced while validating the extraction service's answer
///
/// These are terminal for a given image: retrying the identical image
/// against the same service is unlikely to change the outcome, so the
/// caller should ask the user to retake or re-upload instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Extraction output is not a JSON object")]
    MalformedPayload,

    #[error("Extraction output is missing required field '{0}'")]
    MissingField(&'static str),

    #[error("Extraction output has an invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Extraction output has an unknown category: {0}")]
    UnknownCategory(String),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Database pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No file provided")]
    NoFileProvided,

    #[error("Extraction service failed ({kind}): {message}")]
    ExtractionFailed {
        kind: ExtractionFailureKind,
        message: String,
    },

    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("No budget profile for user {0}")]
    ProfileNotFound(i64),

    #[error("Username already taken: {0}")]
    DuplicateUser(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl Error {
    /// Whether retrying the same operation may succeed
    ///
    /// True for dependency failures (extraction service down or slow),
    /// false for bad input that the user must correct first.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::ExtractionFailed { .. } | Error::Http(_) | Error::Pool(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extraction_failures_are_retryable() {
        let err = Error::ExtractionFailed {
            kind: ExtractionFailureKind::Timeout,
            message: "deadline exceeded".into(),
        };
        assert!(err.is_retryable());
    }

    #[test]
    fn test_validation_failures_are_not_retryable() {
        let err = Error::Validation(ValidationError::MalformedPayload);
        assert!(!err.is_retryable());
        assert!(!Error::NoFileProvided.is_retryable());
    }
}
