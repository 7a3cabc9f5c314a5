//! Risk Scoring
//!
//! Linear model over standardized features: weighted sum around a fixed
//! baseline, rescaled to 0-100 within the batch, then banded into Low,
//! Moderate or High. Scores are relative to the batch they were scored
//! with and are not comparable across cycles.

use chrono::{DateTime, Utc};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::logic::config::MonitorConfig;
use crate::logic::errors::InsufficientDataError;
use crate::logic::features::layout::{FEATURE_COUNT, FEATURE_LAYOUT};
use crate::logic::features::ExtractedSample;
use crate::logic::model::scaler::BatchScaler;

/// Raw score offset before rescaling
pub const SCORE_BASELINE: f64 = 50.0;
/// Keeps the rescale denominator non-zero for constant batches
pub const RESCALE_EPSILON: f64 = 1e-10;

// ============================================================================
// RISK LEVELS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    /// Numeric code used in alert table lookups and risk-only publishing.
    pub fn code(&self) -> u8 {
        match self {
            RiskLevel::Low => 0,
            RiskLevel::Moderate => 1,
            RiskLevel::High => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Moderate => "Moderate",
            RiskLevel::High => "High",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Band a rescaled score. Both comparisons are strict, so a score
/// sitting exactly on a threshold stays in the lower band.
pub fn classify_risk(score: f64, config: &MonitorConfig) -> RiskLevel {
    if score > config.risk_threshold {
        RiskLevel::High
    } else if score > config.warning_threshold {
        RiskLevel::Moderate
    } else {
        RiskLevel::Low
    }
}

// ============================================================================
// ASSESSMENTS
// ============================================================================

/// Scored outcome for one sample, carrying what the alert stage needs.
#[derive(Debug, Clone, Serialize)]
pub struct RiskAssessment {
    pub timestamp: DateTime<Utc>,
    pub entry_id: u64,
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    pub temperature: Option<f64>,
}

/// Score a batch of extracted samples, in input order.
pub fn score_batch(
    extracted: &[ExtractedSample],
    config: &MonitorConfig,
) -> Result<Vec<RiskAssessment>, InsufficientDataError> {
    if extracted.len() < config.min_samples {
        return Err(InsufficientDataError {
            stage: "risk scoring",
            available: extracted.len(),
            required: config.min_samples,
        });
    }

    let mut matrix = Array2::zeros((extracted.len(), FEATURE_COUNT));
    for (row, item) in extracted.iter().enumerate() {
        for (col, value) in item.features.as_slice().iter().enumerate() {
            matrix[[row, col]] = *value;
        }
    }

    let standardized = BatchScaler::fit_transform(&matrix);

    let weights: Array1<f64> = FEATURE_LAYOUT
        .iter()
        .map(|name| config.weights.get(*name).copied().unwrap_or(0.0))
        .collect();

    let raw = standardized.dot(&weights) + SCORE_BASELINE;
    let scores = rescale_scores(&raw.to_vec());

    Ok(extracted
        .iter()
        .zip(scores)
        .map(|(item, score)| RiskAssessment {
            timestamp: item.sample.timestamp,
            entry_id: item.sample.entry_id,
            risk_score: score,
            risk_level: classify_risk(score, config),
            temperature: item.sample.temperature,
        })
        .collect())
}

/// Spread raw scores across 0-100 within the batch.
pub fn rescale_scores(raw: &[f64]) -> Vec<f64> {
    let min = raw.iter().copied().fold(f64::INFINITY, f64::min);
    let max = raw.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min + RESCALE_EPSILON;
    raw.iter().map(|v| 100.0 * (v - min) / span).collect()
}

// ============================================================================
// TESTS
// ============================================================================
