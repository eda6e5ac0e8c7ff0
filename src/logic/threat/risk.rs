//! Risk Scorer
//!
//! Combines model confidence with attack-type severity into a bounded score.

use super::rules::{severity_weight, CONFIDENCE_WEIGHT, DEFAULT_SEVERITY, SEVERITY_WEIGHT};

/// Risk score in [0, 1].
///
/// Zero when not anomalous. Otherwise `confidence * 0.5 + severity * 0.5`,
/// capped at 1.0, where severity is 0 without a label and 0.5 for a label
/// missing from the severity table.
pub fn risk_score(is_anomaly: bool, confidence: f64, anomaly_type: Option<&str>) -> f64 {
    if !is_anomaly {
        return 0.0;
    }

    let base = confidence * CONFIDENCE_WEIGHT;
    let severity = match anomaly_type {
        Some(label) => severity_weight(label).unwrap_or(DEFAULT_SEVERITY),
        None => 0.0,
    };

    (base + severity * SEVERITY_WEIGHT).min(1.0)
}
