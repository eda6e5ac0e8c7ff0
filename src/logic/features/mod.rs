//! Features Module - Feature Vector Builder
//!
//! Maps the attribute bag submitted by callers onto the fixed 20-feature
//! layout the models were fit on.

pub mod layout;
pub mod vector;

pub use layout::{
    feature_index, feature_name, feature_names, layout_hash, LayoutInfo, FEATURE_COUNT,
    FEATURE_LAYOUT, FEATURE_VERSION,
};
pub use vector::{FeatureMap, FeatureVector};
