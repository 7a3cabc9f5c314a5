//! Runtime Status
//!
//! Shared snapshot of the most recent cycle. The loop writes it once per
//! cycle; anything in the process can read it without touching the loop.

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use serde::Serialize;
use uuid::Uuid;

use crate::logic::model::RiskLevel;

/// Stable id for this monitor process, stamped on mirrored log lines
static SESSION_ID: OnceLock<String> = OnceLock::new();

/// Global cycle status
static STATUS: Lazy<RwLock<StatusSnapshot>> =
    Lazy::new(|| RwLock::new(StatusSnapshot::default()));

#[derive(Debug, Clone, Default, Serialize)]
pub struct StatusSnapshot {
    pub cycle: u64,
    pub updated_at: Option<DateTime<Utc>>,
    pub samples_fetched: usize,
    pub samples_scored: usize,
    pub risk_score: Option<f64>,
    pub risk_level: Option<RiskLevel>,
    pub alert_code: Option<u8>,
    pub published_entry: Option<u64>,
    pub last_error: Option<String>,
}

/// Session id, generated on first use.
pub fn session_id() -> &'static str {
    SESSION_ID.get_or_init(|| Uuid::new_v4().to_string())
}

/// Get current cycle status
pub fn get_status() -> StatusSnapshot {
    STATUS.read().clone()
}

/// Update cycle status
pub(crate) fn set_status(snapshot: StatusSnapshot) {
    *STATUS.write() = snapshot;
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_id_is_stable() {
        let first = session_id();
        let second = session_id();
        assert_eq!(first, second);
        // Hyphenated UUID
        assert_eq!(first.len(), 36);
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let snapshot = StatusSnapshot {
            cycle: 7,
            updated_at: Some(Utc::now()),
            samples_fetched: 100,
            samples_scored: 93,
            risk_score: Some(12.5),
            risk_level: Some(RiskLevel::Low),
            alert_code: Some(0),
            published_entry: Some(4200),
            last_error: None,
        };
        set_status(snapshot.clone());

        let read_back = get_status();
        assert_eq!(read_back.cycle, 7);
        assert_eq!(read_back.samples_scored, 93);
        assert_eq!(read_back.risk_level, Some(RiskLevel::Low));
        assert_eq!(read_back.published_entry, Some(4200));
    }
}
