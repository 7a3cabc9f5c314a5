//! Waveform Delineation
//!
//! Optional QRS width measurement from the raw ECG waveform: locate the
//! dominant R peak, then walk outwards to the nearest zero crossing on
//! each side. Anything that cannot be delineated reports None and the
//! caller falls back to its constant width.

/// Search span on each side of the R peak, in seconds.
pub const DELINEATION_WINDOW_SECS: f64 = 0.1;
/// Fewer samples than this cannot hold a QRS complex.
pub const MIN_WAVEFORM_LEN: usize = 3;

// ============================================================================
// QRS WIDTH
// ============================================================================

/// Measure the QRS width in seconds.
///
/// None when the waveform is too short, the rate is unusable, or no zero
/// crossing exists within the search window on either side.
pub fn measure_qrs_width(waveform: &[f64], sample_rate_hz: f64) -> Option<f64> {
    if waveform.len() < MIN_WAVEFORM_LEN || sample_rate_hz <= 0.0 {
        return None;
    }

    let r_peak = detect_r_peak(waveform)?;
    // Inverted leads flip the whole complex; measure against the peak's sign.
    let polarity = if waveform[r_peak] < 0.0 { -1.0 } else { 1.0 };
    let window = (DELINEATION_WINDOW_SECS * sample_rate_hz).round() as usize;

    let q_onset = find_q_onset(waveform, r_peak, window, polarity)?;
    let s_offset = find_s_offset(waveform, r_peak, window, polarity)?;

    let width = (s_offset - q_onset) as f64 / sample_rate_hz;
    (width > 0.0).then_some(width)
}

/// Index of the dominant deflection (largest absolute amplitude).
fn detect_r_peak(waveform: &[f64]) -> Option<usize> {
    waveform
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.abs().total_cmp(&b.abs()))
        .map(|(i, _)| i)
}

/// Nearest zero crossing walking backwards from the R peak.
fn find_q_onset(waveform: &[f64], r_peak: usize, window: usize, polarity: f64) -> Option<usize> {
    let start = r_peak.saturating_sub(window);
    (start..r_peak).rev().find(|&i| waveform[i] * polarity <= 0.0)
}

/// Nearest zero crossing walking forwards from the R peak.
fn find_s_offset(waveform: &[f64], r_peak: usize, window: usize, polarity: f64) -> Option<usize> {
    let end = (r_peak + window).min(waveform.len() - 1);
    ((r_peak + 1)..=end).find(|&i| waveform[i] * polarity <= 0.0)
}

// ============================================================================
// TESTS
// ============================================================================
