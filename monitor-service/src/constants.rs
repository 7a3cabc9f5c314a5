//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.
//! To change the default telemetry endpoint, only edit this file.

/// Default telemetry store base URL
///
/// This is the fallback URL when no environment variable is set.
pub const DEFAULT_API_BASE_URL: &str = "https://api.thingspeak.com";

/// Default polling interval between pipeline cycles (seconds)
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 15;

/// Default per-request HTTP timeout (seconds)
///
/// Kept on the order of the polling interval so a stalled call cannot
/// starve the next cycle.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 15;

/// Default number of feed entries requested per fetch
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Default minimum scorable samples per batch
pub const DEFAULT_MIN_SAMPLES: usize = 10;

/// Default risk-level thresholds (score scale 0-100)
pub const DEFAULT_WARNING_THRESHOLD: f64 = 50.0;
pub const DEFAULT_RISK_THRESHOLD: f64 = 70.0;

/// Fever cutoff in degrees Celsius
pub const DEFAULT_FEVER_THRESHOLD: f64 = 37.5;

/// Default ECG waveform sampling rate (Hz), used by QRS delineation
pub const DEFAULT_WAVEFORM_SAMPLE_RATE_HZ: f64 = 250.0;

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "VitalGuard";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get telemetry store base URL from environment or use default
pub fn get_api_base_url() -> String {
    std::env::var("VITALGUARD_API_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string())
}

/// Get channel id from environment (empty means unconfigured)
pub fn get_channel_id() -> String {
    std::env::var("VITALGUARD_CHANNEL_ID").unwrap_or_default()
}

/// Get read API key from environment (empty means unconfigured)
pub fn get_read_api_key() -> String {
    std::env::var("VITALGUARD_READ_KEY").unwrap_or_default()
}

/// Get write API key from environment (empty means unconfigured)
pub fn get_write_api_key() -> String {
    std::env::var("VITALGUARD_WRITE_KEY").unwrap_or_default()
}

/// Get polling interval from environment or use default
pub fn get_poll_interval_secs() -> u64 {
    std::env::var("VITALGUARD_POLL_INTERVAL")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_POLL_INTERVAL_SECS)
}

/// Get fetch batch size from environment or use default
pub fn get_batch_size() -> usize {
    std::env::var("VITALGUARD_BATCH_SIZE")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_BATCH_SIZE)
}

/// Get log sink URL from environment (None means mirroring disabled)
pub fn get_log_sink_url() -> Option<String> {
    std::env::var("VITALGUARD_LOG_SINK_URL")
        .ok()
        .filter(|s| !s.is_empty())
}
