//! Feature Vector - Core data structure for ML input
//!
//! Builds the fixed-order vector from the loosely typed attribute bag that
//! callers submit. Absent or unconvertible attributes resolve to 0.0.

use std::collections::HashMap;

use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::layout::{feature_index, FEATURE_COUNT};

/// Attribute bag as received from callers
pub type FeatureMap = HashMap<String, Value>;

// ============================================================================
// FEATURE VECTOR
// ============================================================================

/// Feature values in the order defined by FEATURE_LAYOUT
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub values: [f64; FEATURE_COUNT],
}

impl FeatureVector {
    /// Zeroed vector
    pub fn new() -> Self {
        Self {
            values: [0.0; FEATURE_COUNT],
        }
    }

    pub fn from_values(values: [f64; FEATURE_COUNT]) -> Self {
        Self { values }
    }

    /// Build from an attribute bag.
    ///
    /// Every canonical name missing from `features` becomes 0.0, as does any
    /// value that cannot be read as a number. Names outside the layout are
    /// ignored.
    pub fn from_attributes(features: &FeatureMap) -> Self {
        let mut vector = Self::new();
        for (name, value) in features {
            vector.set_by_name(name, numeric_value(value));
        }
        vector
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn view(&self) -> ArrayView1<'_, f64> {
        ArrayView1::from(&self.values[..])
    }

    /// Get feature by index
    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    /// Get feature by name
    pub fn get_by_name(&self, name: &str) -> Option<f64> {
        feature_index(name).and_then(|i| self.get(i))
    }

    /// Set feature by name, returns false for names outside the layout
    pub fn set_by_name(&mut self, name: &str, value: f64) -> bool {
        match feature_index(name) {
            Some(index) => {
                self.values[index] = value;
                true
            }
            None => false,
        }
    }
}

impl Default for FeatureVector {
    fn default() -> Self {
        Self::new()
    }
}

impl From<[f64; FEATURE_COUNT]> for FeatureVector {
    fn from(values: [f64; FEATURE_COUNT]) -> Self {
        Self::from_values(values)
    }
}

impl From<&FeatureMap> for FeatureVector {
    fn from(features: &FeatureMap) -> Self {
        Self::from_attributes(features)
    }
}

/// Numbers as-is, numeric strings parsed, booleans as 1.0/0.0; anything
/// unconvertible or non-finite is 0.0
fn numeric_value(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    };
    parsed.filter(|v| v.is_finite()).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::features::FEATURE_LAYOUT;
    use serde_json::json;

    fn bag(value: Value) -> FeatureMap {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_empty_bag_is_all_zero() {
        let vector = FeatureVector::from_attributes(&FeatureMap::new());
        assert_eq!(vector.as_slice().len(), FEATURE_COUNT);
        assert!(vector.as_slice().iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_values_land_in_canonical_order() {
        let features = bag(json!({
            "unique_src_ports": 7,
            "bytes_in": 1500.5,
            "syn_count": 3,
        }));
        let vector = FeatureVector::from_attributes(&features);

        assert_eq!(vector.get(0), Some(1500.5));
        assert_eq!(vector.get(14), Some(3.0));
        assert_eq!(vector.get(19), Some(7.0));
        assert_eq!(vector.get_by_name("bytes_out"), Some(0.0));
    }

    #[test]
    fn test_missing_keys_default_to_zero() {
        let features = bag(json!({ "duration": 12.0, "dst_port": 443 }));
        let vector = FeatureVector::from_attributes(&features);

        for (i, name) in FEATURE_LAYOUT.iter().enumerate() {
            let expected = match *name {
                "duration" => 12.0,
                "dst_port" => 443.0,
                _ => 0.0,
            };
            assert_eq!(vector.values[i], expected, "feature {}", name);
        }
    }

    #[test]
    fn test_strings_and_booleans_are_coerced() {
        let features = bag(json!({
            "bytes_in": "1500",
            "bytes_out": " 42.5 ",
            "protocol_tcp": true,
            "protocol_udp": false,
            "src_port": 8080,
        }));
        let vector = FeatureVector::from_attributes(&features);

        assert_eq!(vector.get_by_name("bytes_in"), Some(1500.0));
        assert_eq!(vector.get_by_name("bytes_out"), Some(42.5));
        assert_eq!(vector.get_by_name("protocol_tcp"), Some(1.0));
        assert_eq!(vector.get_by_name("protocol_udp"), Some(0.0));
        assert_eq!(vector.get_by_name("src_port"), Some(8080.0));
    }

    #[test]
    fn test_unconvertible_values_resolve_to_zero() {
        let features = bag(json!({
            "bytes_in": "lots",
            "bytes_out": null,
            "packets_in": "NaN",
            "packets_out": [1, 2],
            "duration": { "secs": 3 },
            "dst_port": "inf",
        }));
        let vector = FeatureVector::from_attributes(&features);

        assert_eq!(&vector.values[..5], &[0.0; 5]);
        assert_eq!(vector.get_by_name("dst_port"), Some(0.0));
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let features = bag(json!({ "packet_count": 100, "bytes_in": 1 }));
        let vector = FeatureVector::from_attributes(&features);
        assert_eq!(vector.as_slice().iter().sum::<f64>(), 1.0);
    }

    #[test]
    fn test_set_by_name() {
        let mut vector = FeatureVector::new();
        assert!(vector.set_by_name("rst_count", 4.0));
        assert_eq!(vector.get_by_name("rst_count"), Some(4.0));
        assert!(!vector.set_by_name("nonexistent", 1.0));
    }

    #[test]
    fn test_view_matches_values() {
        let vector = FeatureVector::from_values([2.0; FEATURE_COUNT]);
        assert_eq!(vector.view().len(), FEATURE_COUNT);
        assert_eq!(vector.view().sum(), 40.0);
    }
}
