//! Model Module - Standardize and Score
//!
//! The numeric half of the pipeline: batch standardization and the
//! weighted linear risk model.

pub mod scaler;
pub mod scorer;

// Re-export common types
pub use scaler::BatchScaler;
pub use scorer::{score_batch, RiskAssessment, RiskLevel};
