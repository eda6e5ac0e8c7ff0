//! Logic Module - Feature, Model and Threat engines
//!
//! - `features/` - attribute bag → fixed 20-feature layout
//! - `model/` - scaler, strategies, registry, inference
//! - `threat/` - labels, risk scoring, recommendations

pub mod features;
pub mod model;
pub mod threat;
