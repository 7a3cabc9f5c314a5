//! Monitor Configuration
//!
//! One explicit config struct passed by reference into every pipeline
//! stage. Nothing global, nothing mutable mid-cycle. Layering, later wins:
//! built-in defaults, optional JSON config file, environment variables.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants;
use crate::logic::features::layout::FEATURE_LAYOUT;

/// Default fever/risk to alert-code mapping: rows are fever status,
/// columns are risk code (Low, Moderate, High).
pub const DEFAULT_ALERT_TABLE: [[u8; 3]; 2] = [[0, 1, 2], [3, 4, 5]];

// ============================================================================
// CRITICAL FIELDS
// ============================================================================

/// Raw vitals whose absence disqualifies a sample from feature derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CriticalField {
    Temperature,
    HeartRate,
    Spo2,
    EcgAverage,
}

impl CriticalField {
    pub fn as_str(&self) -> &'static str {
        match self {
            CriticalField::Temperature => "temperature",
            CriticalField::HeartRate => "heart_rate",
            CriticalField::Spo2 => "spo2",
            CriticalField::EcgAverage => "ecg_average",
        }
    }
}

// ============================================================================
// MONITOR CONFIG
// ============================================================================

/// Full pipeline configuration.
///
/// A JSON config file may set any subset of these fields; the rest fall
/// back to defaults. Environment variables override both.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Telemetry store base URL
    pub api_base_url: String,
    /// Channel holding the patient's feed
    pub channel_id: String,
    /// Read credential for feed fetches
    pub read_api_key: String,
    /// Write credential for alert publishing
    pub write_api_key: String,
    /// Entries requested per fetch
    pub batch_size: usize,
    /// Minimum scorable rows per batch
    pub min_samples: usize,
    /// Fields that must be present for a sample to enter derivation
    pub critical_fields: Vec<CriticalField>,
    /// Feature weights, resolved by layout name at scoring time
    pub weights: HashMap<String, f64>,
    /// Score above this is at least Moderate (strict comparison)
    pub warning_threshold: f64,
    /// Score above this is High (strict comparison)
    pub risk_threshold: f64,
    /// Temperature at or above this counts as fever (degrees C)
    pub fever_threshold: f64,
    /// (fever, risk code) to alert code lookup
    pub alert_table: [[u8; 3]; 2],
    /// Seconds between polling cycles
    pub poll_interval_secs: u64,
    /// Per-request HTTP timeout in seconds
    pub http_timeout_secs: u64,
    /// Fever-aware variant (alerts 0-5) when true, risk-only (0-2) when false
    pub fever_detection: bool,
    /// Measure QRS width from the raw waveform instead of the constant
    pub qrs_from_waveform: bool,
    /// Waveform sampling rate for QRS delineation (Hz)
    pub waveform_sample_rate_hz: f64,
    /// Optional log sink to mirror cycle summaries to
    pub log_sink_url: Option<String>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            api_base_url: constants::get_api_base_url(),
            channel_id: constants::get_channel_id(),
            read_api_key: constants::get_read_api_key(),
            write_api_key: constants::get_write_api_key(),
            batch_size: constants::get_batch_size(),
            min_samples: constants::DEFAULT_MIN_SAMPLES,
            critical_fields: vec![
                CriticalField::EcgAverage,
                CriticalField::HeartRate,
                CriticalField::Spo2,
            ],
            weights: default_weights(),
            warning_threshold: constants::DEFAULT_WARNING_THRESHOLD,
            risk_threshold: constants::DEFAULT_RISK_THRESHOLD,
            fever_threshold: constants::DEFAULT_FEVER_THRESHOLD,
            alert_table: DEFAULT_ALERT_TABLE,
            poll_interval_secs: constants::get_poll_interval_secs(),
            http_timeout_secs: constants::DEFAULT_HTTP_TIMEOUT_SECS,
            fever_detection: true,
            qrs_from_waveform: false,
            waveform_sample_rate_hz: constants::DEFAULT_WAVEFORM_SAMPLE_RATE_HZ,
            log_sink_url: constants::get_log_sink_url(),
        }
    }
}

/// Stock weight table for the linear risk model.
pub fn default_weights() -> HashMap<String, f64> {
    [
        ("st_elevation", 5.0),
        ("hr_variance", 0.3),
        ("qrs_width", 2.0),
        ("qrs_amplitude", -0.01),
        ("t_wave_inversion", 4.0),
        ("hr_spo2_ratio", 0.2),
        ("spo2", -0.5),
        ("temperature", 0.1),
        ("rr_interval_variance", 0.8),
    ]
    .into_iter()
    .map(|(name, weight)| (name.to_string(), weight))
    .collect()
}

impl MonitorConfig {
    /// Load with full layering: defaults, then the file (if given), then
    /// environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        config.apply_env();
        Ok(config)
    }

    /// Parse a JSON config file. Missing fields keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Re-apply environment variables so they win over file values.
    fn apply_env(&mut self) {
        if let Ok(v) = std::env::var("VITALGUARD_API_URL") {
            self.api_base_url = v;
        }
        if let Ok(v) = std::env::var("VITALGUARD_CHANNEL_ID") {
            self.channel_id = v;
        }
        if let Ok(v) = std::env::var("VITALGUARD_READ_KEY") {
            self.read_api_key = v;
        }
        if let Ok(v) = std::env::var("VITALGUARD_WRITE_KEY") {
            self.write_api_key = v;
        }
        if let Some(v) = env_parse("VITALGUARD_POLL_INTERVAL") {
            self.poll_interval_secs = v;
        }
        if let Some(v) = env_parse("VITALGUARD_BATCH_SIZE") {
            self.batch_size = v;
        }
        if let Some(v) = env_parse("VITALGUARD_HTTP_TIMEOUT") {
            self.http_timeout_secs = v;
        }
        if let Some(v) = env_parse("VITALGUARD_MIN_SAMPLES") {
            self.min_samples = v;
        }
        if let Ok(v) = std::env::var("VITALGUARD_FEVER_DETECTION") {
            self.fever_detection = v.to_lowercase() != "false" && v != "0";
        }
        if let Ok(v) = std::env::var("VITALGUARD_LOG_SINK_URL") {
            self.log_sink_url = if v.is_empty() { None } else { Some(v) };
        }
    }

    /// Startup validation. The only place a configuration problem is
    /// allowed to abort the process; past this point every failure is a
    /// per-cycle event.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.channel_id.is_empty() {
            return Err(ConfigError::Missing("channel id"));
        }
        if self.read_api_key.is_empty() {
            return Err(ConfigError::Missing("read api key"));
        }
        if self.write_api_key.is_empty() {
            return Err(ConfigError::Missing("write api key"));
        }
        if self.batch_size == 0 {
            return Err(ConfigError::Invalid {
                field: "batch_size",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.min_samples == 0 {
            return Err(ConfigError::Invalid {
                field: "min_samples",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.min_samples > self.batch_size {
            return Err(ConfigError::Invalid {
                field: "min_samples",
                reason: format!(
                    "cannot exceed batch_size ({} > {})",
                    self.min_samples, self.batch_size
                ),
            });
        }
        if self.warning_threshold >= self.risk_threshold {
            return Err(ConfigError::Invalid {
                field: "warning_threshold",
                reason: format!(
                    "must be below risk_threshold ({} >= {})",
                    self.warning_threshold, self.risk_threshold
                ),
            });
        }
        if self.poll_interval_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "poll_interval_secs",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.http_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "http_timeout_secs",
                reason: "must be at least 1".to_string(),
            });
        }

        // The derivation formulas need these three regardless of what else
        // the operator marks critical.
        for required in [
            CriticalField::EcgAverage,
            CriticalField::HeartRate,
            CriticalField::Spo2,
        ] {
            if !self.critical_fields.contains(&required) {
                return Err(ConfigError::Invalid {
                    field: "critical_fields",
                    reason: format!("{} must stay critical", required.as_str()),
                });
            }
        }

        for name in FEATURE_LAYOUT {
            if !self.weights.contains_key(*name) {
                return Err(ConfigError::Invalid {
                    field: "weights",
                    reason: format!("no weight for feature '{}'", name),
                });
            }
        }

        for row in &self.alert_table {
            for code in row {
                if *code > 5 {
                    return Err(ConfigError::Invalid {
                        field: "alert_table",
                        reason: format!("alert code {} outside 0-5", code),
                    });
                }
            }
        }

        if self.qrs_from_waveform && self.waveform_sample_rate_hz <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "waveform_sample_rate_hz",
                reason: "must be positive when qrs_from_waveform is on".to_string(),
            });
        }

        Ok(())
    }

    /// Effective critical set: the configured fields, plus temperature when
    /// fever detection is on (the combiner needs a temperature to pair with
    /// the risk level).
    pub fn effective_critical_fields(&self) -> Vec<CriticalField> {
        let mut fields = self.critical_fields.clone();
        if self.fever_detection && !fields.contains(&CriticalField::Temperature) {
            fields.push(CriticalField::Temperature);
        }
        fields
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.parse().ok())
}

// ============================================================================
// CONFIG ERROR
// ============================================================================

/// Unrecoverable configuration problems; abort at startup, never mid-loop.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required setting: {0}")]
    Missing(&'static str),

    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("cannot read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

// ============================================================================
// TESTS
// ============================================================================
