//! Integration Tests for the Scoring Pipeline
//!
//! Feed batches through extraction, scoring, and alert mapping together
//! and check the end-to-end outcomes.

#[cfg(test)]
mod integration_tests {
    use chrono::{DateTime, Utc};

    use crate::logic::alert;
    use crate::logic::config::MonitorConfig;
    use crate::logic::features::extract_batch;
    use crate::logic::ingest::VitalSample;
    use crate::logic::model::{score_batch, RiskLevel};

    fn sample(entry_id: u64, hr: f64, spo2: f64, ecg: f64, temp: f64) -> VitalSample {
        VitalSample {
            timestamp: DateTime::<Utc>::UNIX_EPOCH,
            entry_id,
            temperature: Some(temp),
            heart_rate: Some(hr),
            spo2: Some(spo2),
            ecg_average: Some(ecg),
            latitude: None,
            longitude: None,
            ecg_waveform: Vec::new(),
        }
    }

    fn steady_batch(count: usize, temp: f64) -> Vec<VitalSample> {
        (0..count)
            .map(|i| sample(i as u64 + 1, 75.0, 98.0, 0.6, temp))
            .collect()
    }

    /// A steady patient scores Low everywhere and maps to the idle alert.
    #[test]
    fn test_steady_batch_maps_to_idle_alert() {
        let config = MonitorConfig::default();
        let extracted = extract_batch(&steady_batch(12, 36.5), &config).unwrap();
        let assessments = score_batch(&extracted, &config).unwrap();

        assert_eq!(assessments.len(), 12);
        assert!(assessments.iter().all(|a| a.risk_level == RiskLevel::Low));

        let latest = assessments.last().unwrap();
        assert_eq!(alert::alert_for(latest, &config).value(), 0);
    }

    /// Fever alone moves a Low-risk patient into the fevered alert band.
    #[test]
    fn test_fever_shifts_alert_band() {
        let config = MonitorConfig::default();
        let extracted = extract_batch(&steady_batch(12, 38.0), &config).unwrap();
        let assessments = score_batch(&extracted, &config).unwrap();

        let latest = assessments.last().unwrap();
        assert_eq!(latest.risk_level, RiskLevel::Low);
        assert_eq!(alert::alert_for(latest, &config).value(), 3);
    }

    /// One strongly abnormal final row should end the cycle in a High alert.
    #[test]
    fn test_elevated_final_row_raises_high_alert() {
        let config = MonitorConfig::default();
        let mut samples = steady_batch(12, 36.5);
        // ECG average far above the batch median on the newest row
        samples[11].ecg_average = Some(10.0);

        let extracted = extract_batch(&samples, &config).unwrap();
        let assessments = score_batch(&extracted, &config).unwrap();

        let latest = assessments.last().unwrap();
        assert_eq!(latest.risk_level, RiskLevel::High);
        assert_eq!(alert::alert_for(latest, &config).value(), 2);
        // The steady rows stay at the bottom of the rescaled range
        assert!(assessments[..11]
            .iter()
            .all(|a| a.risk_level == RiskLevel::Low));
    }

    /// Broken rows drop out while the batch still clears the minimum.
    #[test]
    fn test_mixed_batch_with_dropped_rows_still_scores() {
        let config = MonitorConfig::default();
        let mut samples = steady_batch(14, 36.5);
        samples[2].spo2 = None;
        samples[5].ecg_average = None;
        samples[9].heart_rate = Some(0.0);

        let extracted = extract_batch(&samples, &config).unwrap();
        assert_eq!(extracted.len(), 11);

        let assessments = score_batch(&extracted, &config).unwrap();
        assert_eq!(assessments.len(), 11);
        let ids: Vec<u64> = assessments.iter().map(|a| a.entry_id).collect();
        assert!(!ids.contains(&3));
        assert!(!ids.contains(&6));
        assert!(!ids.contains(&10));
    }

    /// The same batch always produces the same scores and alerts.
    #[test]
    fn test_pipeline_is_deterministic() {
        let config = MonitorConfig::default();
        let mut samples = steady_batch(12, 37.9);
        samples[4].ecg_average = Some(-0.3);
        samples[8].heart_rate = Some(112.0);

        let run = |input: &[VitalSample]| {
            let extracted = extract_batch(input, &config).unwrap();
            score_batch(&extracted, &config).unwrap()
        };

        let first = run(&samples);
        let second = run(&samples);

        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.risk_score, b.risk_score);
            assert_eq!(a.risk_level, b.risk_level);
            assert_eq!(
                alert::alert_for(a, &config).value(),
                alert::alert_for(b, &config).value()
            );
        }
    }
}
