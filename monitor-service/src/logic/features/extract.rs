//! Feature Extraction
//!
//! Turns a fetched batch of vital samples into feature vectors. Rows
//! missing a critical field are dropped, never zero-filled, and two
//! features are batch-relative: ST elevation compares each ECG average
//! against the batch median, and heart-rate variance is a rolling
//! population std over the rows that survived filtering.

use crate::logic::config::MonitorConfig;
use crate::logic::errors::InsufficientDataError;
use crate::logic::features::vector::FeatureVector;
use crate::logic::features::waveform;
use crate::logic::ingest::VitalSample;

/// Stand-in QRS width in seconds when no waveform measurement is made.
/// A heuristic constant, not a measured value.
pub const QRS_WIDTH_FALLBACK_SECS: f64 = 0.08;
/// ECG average to QRS amplitude scaling
pub const QRS_AMPLITUDE_FACTOR: f64 = 0.25;
/// ECG average above this multiple of the batch median counts as elevated
pub const ST_ELEVATION_FACTOR: f64 = 1.3;
/// R-R interval to variance proxy scaling
pub const RR_VARIANCE_FACTOR: f64 = 0.15;
/// Rolling window for heart-rate variance
pub const HR_VARIANCE_WINDOW: usize = 3;

/// One sample together with its derived features.
#[derive(Debug, Clone)]
pub struct ExtractedSample {
    pub sample: VitalSample,
    pub features: FeatureVector,
}

// ============================================================================
// BATCH EXTRACTION
// ============================================================================

/// Derive features for every usable row of a batch, in feed order.
///
/// A row is usable when all critical fields are present and every derived
/// feature is finite. Errors only when nothing usable remains.
pub fn extract_batch(
    samples: &[VitalSample],
    config: &MonitorConfig,
) -> Result<Vec<ExtractedSample>, InsufficientDataError> {
    let critical = config.effective_critical_fields();
    let complete: Vec<&VitalSample> = samples
        .iter()
        .filter(|s| s.is_complete(&critical))
        .collect();

    if complete.is_empty() {
        return Err(InsufficientDataError {
            stage: "completeness filter",
            available: 0,
            required: 1,
        });
    }

    // Batch median over the filtered rows, computed once.
    let ecg_values: Vec<f64> = complete.iter().filter_map(|s| s.ecg_average).collect();
    let median_ecg = median(&ecg_values);

    let mut extracted = Vec::with_capacity(complete.len());
    let mut hr_history: Vec<f64> = Vec::with_capacity(complete.len());

    for sample in complete {
        if let Some(hr) = sample.heart_rate {
            hr_history.push(hr);
        }
        let window_start = hr_history.len().saturating_sub(HR_VARIANCE_WINDOW);
        let hr_window = &hr_history[window_start..];

        let Some(features) = derive_row(sample, median_ecg, hr_window, config) else {
            continue;
        };
        if !features.is_finite() {
            continue;
        }

        extracted.push(ExtractedSample {
            sample: sample.clone(),
            features,
        });
    }

    if extracted.is_empty() {
        return Err(InsufficientDataError {
            stage: "feature derivation",
            available: 0,
            required: 1,
        });
    }

    Ok(extracted)
}

/// Derive one feature vector. None when a needed raw vital is missing.
fn derive_row(
    sample: &VitalSample,
    median_ecg: f64,
    hr_window: &[f64],
    config: &MonitorConfig,
) -> Option<FeatureVector> {
    let heart_rate = sample.heart_rate?;
    let spo2 = sample.spo2?;
    let ecg = sample.ecg_average?;

    let qrs_width = if config.qrs_from_waveform {
        waveform::measure_qrs_width(&sample.ecg_waveform, config.waveform_sample_rate_hz)
            .unwrap_or(QRS_WIDTH_FALLBACK_SECS)
    } else {
        QRS_WIDTH_FALLBACK_SECS
    };

    let mut features = FeatureVector::new();
    features.set_by_name(
        "st_elevation",
        if ecg > median_ecg * ST_ELEVATION_FACTOR {
            1.0
        } else {
            0.0
        },
    );
    features.set_by_name("hr_variance", population_std(hr_window));
    features.set_by_name("qrs_width", qrs_width);
    features.set_by_name("qrs_amplitude", ecg * QRS_AMPLITUDE_FACTOR);
    features.set_by_name("t_wave_inversion", if ecg < 0.0 { 1.0 } else { 0.0 });
    features.set_by_name("hr_spo2_ratio", heart_rate / spo2);
    features.set_by_name("spo2", spo2);
    // Missing temperature poisons the vector to NaN so the finiteness
    // gate drops the row instead of scoring a fabricated value.
    features.set_by_name("temperature", sample.temperature.unwrap_or(f64::NAN));
    features.set_by_name(
        "rr_interval_variance",
        (60.0 / heart_rate) * RR_VARIANCE_FACTOR,
    );

    Some(features)
}

// ============================================================================
// BATCH STATISTICS
// ============================================================================

/// Population standard deviation; 0.0 for empty or single-value input.
pub fn population_std(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}

/// Median with the usual midpoint average for even-length input.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

// ============================================================================
// TESTS
// ============================================================================
