//! Feed Wire Format
//!
//! Serde types for the telemetry store's feed JSON and the conversion
//! into typed vitals. Every channel field arrives as an optional string;
//! anything that does not parse as a finite number becomes a missing
//! value, never a zero.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::logic::config::CriticalField;

// ============================================================================
// WIRE TYPES
// ============================================================================

/// Top-level response of `GET /channels/{id}/feeds.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelFeed {
    pub channel: ChannelInfo,
    #[serde(default)]
    pub feeds: Vec<FeedEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChannelInfo {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub last_entry_id: Option<u64>,
}

/// One feed row as the store returns it. Field positions are fixed by the
/// channel layout: 1 temperature, 2 alert status, 3 heart rate, 4 SpO2,
/// 5 latitude, 6 longitude, 7 ECG average, 8 ECG waveform (JSON array).
#[derive(Debug, Clone, Deserialize)]
pub struct FeedEntry {
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub entry_id: Option<u64>,
    #[serde(default)]
    pub field1: Option<String>,
    #[serde(default)]
    pub field2: Option<String>,
    #[serde(default)]
    pub field3: Option<String>,
    #[serde(default)]
    pub field4: Option<String>,
    #[serde(default)]
    pub field5: Option<String>,
    #[serde(default)]
    pub field6: Option<String>,
    #[serde(default)]
    pub field7: Option<String>,
    #[serde(default)]
    pub field8: Option<String>,
}

// ============================================================================
// TYPED SAMPLE
// ============================================================================

/// One patient sample with every vital parsed or marked missing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VitalSample {
    pub timestamp: DateTime<Utc>,
    pub entry_id: u64,
    pub temperature: Option<f64>,
    pub heart_rate: Option<f64>,
    pub spo2: Option<f64>,
    pub ecg_average: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Raw ECG waveform; empty when absent or malformed.
    pub ecg_waveform: Vec<f64>,
}

impl FeedEntry {
    /// Convert a wire row into a typed sample. Never fails: unparsable
    /// values degrade to missing, a bad waveform degrades to empty.
    pub fn to_sample(&self) -> VitalSample {
        VitalSample {
            timestamp: parse_timestamp(self.created_at.as_deref()),
            entry_id: self.entry_id.unwrap_or(0),
            temperature: parse_numeric(self.field1.as_deref()),
            heart_rate: parse_numeric(self.field3.as_deref()),
            spo2: parse_numeric(self.field4.as_deref()),
            latitude: parse_numeric(self.field5.as_deref()),
            longitude: parse_numeric(self.field6.as_deref()),
            ecg_average: parse_numeric(self.field7.as_deref()),
            ecg_waveform: parse_waveform(self.field8.as_deref()),
        }
    }
}

impl VitalSample {
    /// True when every listed field carries a value.
    pub fn is_complete(&self, critical: &[CriticalField]) -> bool {
        critical.iter().all(|field| self.field_value(*field).is_some())
    }

    pub fn field_value(&self, field: CriticalField) -> Option<f64> {
        match field {
            CriticalField::Temperature => self.temperature,
            CriticalField::HeartRate => self.heart_rate,
            CriticalField::Spo2 => self.spo2,
            CriticalField::EcgAverage => self.ecg_average,
        }
    }
}

// ============================================================================
// PARSERS
// ============================================================================

fn parse_numeric(raw: Option<&str>) -> Option<f64> {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

fn parse_timestamp(raw: Option<&str>) -> DateTime<Utc> {
    raw.and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

/// Parse field8 as a JSON array of numbers. Any parse failure yields an
/// empty waveform while the rest of the sample stays usable.
fn parse_waveform(raw: Option<&str>) -> Vec<f64> {
    raw.and_then(|s| serde_json::from_str::<Vec<f64>>(s).ok())
        .map(|values| values.into_iter().filter(|v| v.is_finite()).collect())
        .unwrap_or_default()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(field1: Option<&str>, field3: Option<&str>) -> FeedEntry {
        FeedEntry {
            created_at: Some("2025-03-14T09:26:53Z".to_string()),
            entry_id: Some(42),
            field1: field1.map(String::from),
            field2: None,
            field3: field3.map(String::from),
            field4: Some("98".to_string()),
            field5: None,
            field6: None,
            field7: Some("0.91".to_string()),
            field8: None,
        }
    }

    #[test]
    fn test_to_sample_parses_numeric_fields() {
        let sample = entry(Some("36.7"), Some("72")).to_sample();
        assert_eq!(sample.entry_id, 42);
        assert_eq!(sample.temperature, Some(36.7));
        assert_eq!(sample.heart_rate, Some(72.0));
        assert_eq!(sample.spo2, Some(98.0));
        assert_eq!(sample.ecg_average, Some(0.91));
        assert_eq!(sample.timestamp.to_rfc3339(), "2025-03-14T09:26:53+00:00");
    }

    #[test]
    fn test_non_numeric_becomes_missing() {
        let sample = entry(Some("n/a"), Some("")).to_sample();
        assert_eq!(sample.temperature, None);
        assert_eq!(sample.heart_rate, None);
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        let sample = entry(Some(" 36.7 "), None).to_sample();
        assert_eq!(sample.temperature, Some(36.7));
    }

    #[test]
    fn test_non_finite_becomes_missing() {
        let sample = entry(Some("NaN"), Some("inf")).to_sample();
        assert_eq!(sample.temperature, None);
        assert_eq!(sample.heart_rate, None);
    }

    #[test]
    fn test_malformed_waveform_keeps_sample() {
        let mut raw = entry(Some("36.7"), Some("72"));
        raw.field8 = Some("[0.1, 0.2,".to_string());
        let sample = raw.to_sample();
        assert!(sample.ecg_waveform.is_empty());
        assert_eq!(sample.heart_rate, Some(72.0));
    }

    #[test]
    fn test_valid_waveform_parses() {
        let mut raw = entry(None, None);
        raw.field8 = Some("[0.1, -0.05, 1.2]".to_string());
        let sample = raw.to_sample();
        assert_eq!(sample.ecg_waveform, vec![0.1, -0.05, 1.2]);
    }

    #[test]
    fn test_bad_timestamp_falls_back_to_epoch() {
        let mut raw = entry(None, None);
        raw.created_at = Some("yesterday".to_string());
        let sample = raw.to_sample();
        assert_eq!(sample.timestamp, DateTime::<Utc>::UNIX_EPOCH);
    }

    #[test]
    fn test_is_complete_respects_critical_set() {
        let complete = entry(Some("36.7"), Some("72")).to_sample();
        let critical = [
            CriticalField::HeartRate,
            CriticalField::Spo2,
            CriticalField::EcgAverage,
        ];
        assert!(complete.is_complete(&critical));

        let missing_hr = entry(Some("36.7"), None).to_sample();
        assert!(!missing_hr.is_complete(&critical));
        // Not critical, so absence does not matter
        assert!(missing_hr.is_complete(&[CriticalField::Temperature]));
    }

    #[test]
    fn test_feed_deserializes_from_store_json() {
        let json = r#"{
            "channel": {"id": 123456, "name": "patient-1", "last_entry_id": 42},
            "feeds": [
                {"created_at": "2025-03-14T09:26:53Z", "entry_id": 42,
                 "field1": "36.7", "field3": "72", "field4": "98", "field7": "0.91"}
            ]
        }"#;
        let feed: ChannelFeed = serde_json::from_str(json).unwrap();
        assert_eq!(feed.channel.id, 123456);
        assert_eq!(feed.feeds.len(), 1);
        assert_eq!(feed.feeds[0].to_sample().heart_rate, Some(72.0));
    }
}
