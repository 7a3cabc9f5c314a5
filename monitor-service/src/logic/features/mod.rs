//! Features Module - Feature Derivation Engine
//!
//! Everything between raw vital samples and the numeric matrix the model
//! scores: the layout schema, per-sample vectors, batch extraction, and
//! optional waveform delineation.

pub mod extract;
pub mod layout;
pub mod vector;
pub mod waveform;

#[cfg(test)]
mod tests;

// Re-export common types
pub use extract::{extract_batch, ExtractedSample};
pub use vector::FeatureVector;
