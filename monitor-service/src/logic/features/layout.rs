//! Feature Layout
//!
//! The vector order defined here is load-bearing: weight tables are
//! resolved by feature name, scaler statistics are positional, and any
//! serialized vector must replay against the layout that produced it.
//! Adding, removing, or reordering a feature therefore requires bumping
//! `FEATURE_VERSION` in the same change.

use crc32fast::Hasher;
use once_cell::sync::Lazy;

// ============================================================================
// LAYOUT
// ============================================================================

/// Bumped whenever `FEATURE_LAYOUT` changes in any way.
pub const FEATURE_VERSION: u8 = 1;

/// Feature names in vector order. The single source of truth; every other
/// constant and lookup in this module derives from it.
pub const FEATURE_LAYOUT: &[&str] = &[
    // === ECG morphology (0-4) ===
    "st_elevation",          // 0: ECG average above 1.3x batch median
    "hr_variance",           // 1: Rolling std of heart rate, window of 3
    "qrs_width",             // 2: QRS complex width in seconds
    "qrs_amplitude",         // 3: Scaled ECG average amplitude
    "t_wave_inversion",      // 4: Negative ECG average indicator

    // === Combined vitals (5) ===
    "hr_spo2_ratio",         // 5: Heart rate over oxygen saturation

    // === Raw vitals (6-7) ===
    "spo2",                  // 6: Oxygen saturation percent
    "temperature",           // 7: Body temperature in degrees C

    // === Derived timing (8) ===
    "rr_interval_variance",  // 8: Variability proxy from the R-R interval
];

/// Must equal `FEATURE_LAYOUT.len()`; checked in tests.
pub const FEATURE_COUNT: usize = 9;

// ============================================================================
// LAYOUT HASH
// ============================================================================

static LAYOUT_HASH: Lazy<u32> = Lazy::new(|| hash_layout(FEATURE_VERSION, FEATURE_LAYOUT));

fn hash_layout(version: u8, names: &[&str]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(&[version]);
    for name in names {
        hasher.update(name.as_bytes());
        hasher.update(&[0]);
    }
    hasher.finalize()
}

/// CRC32 over the version byte and the NUL-separated feature names.
/// Stamped into every vector so a layout drift is caught at runtime.
pub fn layout_hash() -> u32 {
    *LAYOUT_HASH
}

// ============================================================================
// LAYOUT VALIDATION
// ============================================================================

/// A vector was produced under a different layout than the current one.
#[derive(Debug, Clone)]
pub struct LayoutMismatchError {
    pub expected_version: u8,
    pub expected_hash: u32,
    pub actual_version: u8,
    pub actual_hash: u32,
}

impl std::fmt::Display for LayoutMismatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "feature layout mismatch: expected v{}/{:08x}, found v{}/{:08x}",
            self.expected_version, self.expected_hash, self.actual_version, self.actual_hash
        )
    }
}

impl std::error::Error for LayoutMismatchError {}

/// Check an incoming (version, hash) pair against the current layout.
pub fn validate_layout(incoming_version: u8, incoming_hash: u32) -> Result<(), LayoutMismatchError> {
    let current_hash = layout_hash();

    if incoming_version != FEATURE_VERSION || incoming_hash != current_hash {
        return Err(LayoutMismatchError {
            expected_version: FEATURE_VERSION,
            expected_hash: current_hash,
            actual_version: incoming_version,
            actual_hash: incoming_hash,
        });
    }

    Ok(())
}

pub fn is_layout_compatible(version: u8, hash: u32) -> bool {
    validate_layout(version, hash).is_ok()
}

// ============================================================================
// NAME / INDEX LOOKUP
// ============================================================================

/// Vector index of a feature name. Linear scan over nine entries.
pub fn feature_index(name: &str) -> Option<usize> {
    FEATURE_LAYOUT.iter().position(|&n| n == name)
}

/// Feature name at a vector index.
pub fn feature_name(index: usize) -> Option<&'static str> {
    FEATURE_LAYOUT.get(index).copied()
}

// ============================================================================
// TESTS
// ============================================================================
