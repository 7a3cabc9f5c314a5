//! Alert Mapping
//!
//! Folds fever status and risk level into the single integer code the
//! monitor publishes back to the channel's status field.

use serde::Serialize;

use crate::logic::config::MonitorConfig;
use crate::logic::model::{RiskAssessment, RiskLevel};

/// Published alert code: 0-5 in the fever-aware variant, 0-2 risk-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AlertCode(pub u8);

impl AlertCode {
    pub fn value(&self) -> u8 {
        self.0
    }
}

impl std::fmt::Display for AlertCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fever check against the configured threshold, inclusive. A missing
/// temperature reads as no fever; the completeness filter keeps that
/// case out of the fever-aware variant.
pub fn is_fevered(temperature: Option<f64>, config: &MonitorConfig) -> bool {
    temperature
        .map(|t| t >= config.fever_threshold)
        .unwrap_or(false)
}

/// Table lookup: row is fever status, column is risk code.
pub fn combine(fevered: bool, level: RiskLevel, config: &MonitorConfig) -> AlertCode {
    AlertCode(config.alert_table[usize::from(fevered)][level.code() as usize])
}

/// Alert code for one assessment under the configured variant.
pub fn alert_for(assessment: &RiskAssessment, config: &MonitorConfig) -> AlertCode {
    if config.fever_detection {
        combine(
            is_fevered(assessment.temperature, config),
            assessment.risk_level,
            config,
        )
    } else {
        AlertCode(assessment.risk_level.code())
    }
}

// ============================================================================
// TESTS
// ============================================================================
