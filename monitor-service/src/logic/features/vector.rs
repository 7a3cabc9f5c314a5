//! Feature Vector
//!
//! Fixed-size, layout-stamped container for one sample's derived
//! features. Carries the layout version and hash so a vector that was
//! serialized under an older schema is rejected instead of misread.

use serde::{Deserialize, Serialize};

use super::layout::{
    feature_index, is_layout_compatible, layout_hash, validate_layout, LayoutMismatchError,
    FEATURE_COUNT, FEATURE_VERSION,
};

// ============================================================================
// FEATURE VECTOR
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Layout version this vector was built under
    pub version: u8,
    /// Layout hash for fast compatibility checks
    pub layout_hash: u32,
    /// Feature values in FEATURE_LAYOUT order
    pub values: [f64; FEATURE_COUNT],
}

impl FeatureVector {
    /// New zeroed vector stamped with the current layout.
    pub fn new() -> Self {
        Self {
            version: FEATURE_VERSION,
            layout_hash: layout_hash(),
            values: [0.0; FEATURE_COUNT],
        }
    }

    pub fn from_values(values: [f64; FEATURE_COUNT]) -> Self {
        Self {
            version: FEATURE_VERSION,
            layout_hash: layout_hash(),
            values,
        }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    /// Value lookup through the layout table.
    pub fn get_by_name(&self, name: &str) -> Option<f64> {
        feature_index(name).and_then(|i| self.get(i))
    }

    /// Set a value by feature name. Returns false for unknown names.
    pub fn set_by_name(&mut self, name: &str, value: f64) -> bool {
        match feature_index(name) {
            Some(i) => {
                self.values[i] = value;
                true
            }
            None => false,
        }
    }

    /// True when every value is a usable number (no NaN, no infinity).
    pub fn is_finite(&self) -> bool {
        self.values.iter().all(|v| v.is_finite())
    }

    /// Strict layout check with a descriptive error.
    pub fn validate(&self) -> Result<(), LayoutMismatchError> {
        validate_layout(self.version, self.layout_hash)
    }

    pub fn is_compatible(&self) -> bool {
        is_layout_compatible(self.version, self.layout_hash)
    }
}

impl Default for FeatureVector {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
