//! Pipeline Error Taxonomy
//!
//! Three recoverable failure classes, one per pipeline boundary. None of
//! them may terminate the polling loop: the driver logs the failing stage
//! and retries on the next cycle.

use thiserror::Error;

// ============================================================================
// FETCH
// ============================================================================

/// Ingestion failures: network, HTTP status, payload decode, empty result.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),

    #[error("server returned HTTP {0}")]
    Status(u16),

    #[error("malformed feed payload: {0}")]
    Decode(String),

    #[error("feed returned no entries")]
    EmptyResult,
}

// ============================================================================
// INSUFFICIENT DATA
// ============================================================================

/// Not enough usable samples to continue the pipeline.
///
/// Raised by the feature extractor (batch filtered down to nothing) and by
/// the scorer (fewer rows than the configured minimum).
#[derive(Debug, Error)]
#[error("insufficient data at {stage}: {available} usable samples, {required} required")]
pub struct InsufficientDataError {
    pub stage: &'static str,
    pub available: usize,
    pub required: usize,
}

// ============================================================================
// PUBLISH
// ============================================================================

/// Alert publishing failures. Reported by the publisher, handled inside the
/// cycle, never allowed past the driver.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("network error: {0}")]
    Network(String),

    #[error("server returned HTTP {0}")]
    Status(u16),

    #[error("update rejected by the store")]
    Rejected,
}

// ============================================================================
// CYCLE
// ============================================================================

/// Failure of one polling cycle.
///
/// Carries only the abortive stages. A failed publish is not one of them:
/// it still leaves the cycle with a computed assessment, so the publisher
/// reports it and the cycle completes.
#[derive(Debug, Error)]
pub enum CycleError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("{0}")]
    Insufficient(#[from] InsufficientDataError),
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_display() {
        let err = FetchError::Status(502);
        assert_eq!(err.to_string(), "server returned HTTP 502");

        let err = FetchError::EmptyResult;
        assert_eq!(err.to_string(), "feed returned no entries");
    }

    #[test]
    fn test_insufficient_data_display() {
        let err = InsufficientDataError {
            stage: "risk scoring",
            available: 4,
            required: 10,
        };
        assert_eq!(
            err.to_string(),
            "insufficient data at risk scoring: 4 usable samples, 10 required"
        );
    }

    #[test]
    fn test_cycle_error_from_fetch() {
        let err: CycleError = FetchError::Network("timeout".to_string()).into();
        assert!(matches!(err, CycleError::Fetch(_)));
        assert!(err.to_string().contains("fetch failed"));
    }

    #[test]
    fn test_cycle_error_from_insufficient() {
        let err: CycleError = InsufficientDataError {
            stage: "completeness filter",
            available: 0,
            required: 1,
        }
        .into();
        assert!(matches!(err, CycleError::Insufficient(_)));
    }
}
