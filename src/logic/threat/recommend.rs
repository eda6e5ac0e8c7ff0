//! Recommendation Generator
//!
//! Deterministic remediation list for a prediction.

use super::rules::{
    type_actions, BASELINE_ACTIONS, CONTINUE_MONITORING, CRITICAL_MARKER,
    CRITICAL_RISK_THRESHOLD, ESCALATION_ACTIONS,
};

/// Ordered remediation steps.
///
/// Layout for an anomaly: `[critical marker]`, baseline actions,
/// type-specific actions, `[escalation actions]`, where the bracketed parts
/// only appear when `risk_score` exceeds the critical threshold.
pub fn generate_recommendations(
    is_anomaly: bool,
    anomaly_type: Option<&str>,
    risk_score: f64,
) -> Vec<String> {
    if !is_anomaly {
        return vec![CONTINUE_MONITORING.to_string()];
    }

    let critical = risk_score > CRITICAL_RISK_THRESHOLD;
    let specific = anomaly_type.map(type_actions).unwrap_or_default();

    let mut recommendations = Vec::with_capacity(
        BASELINE_ACTIONS.len() + specific.len() + ESCALATION_ACTIONS.len() + 1,
    );

    if critical {
        recommendations.push(CRITICAL_MARKER.to_string());
    }
    recommendations.extend(BASELINE_ACTIONS.iter().map(|s| s.to_string()));
    recommendations.extend(specific.iter().map(|s| s.to_string()));
    if critical {
        recommendations.extend(ESCALATION_ACTIONS.iter().map(|s| s.to_string()));
    }

    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normal_traffic() {
        assert_eq!(
            generate_recommendations(false, None, 0.0),
            vec!["Continue normal monitoring"]
        );
        // Label and risk are irrelevant when not anomalous
        assert_eq!(
            generate_recommendations(false, Some("malware"), 0.95),
            vec!["Continue normal monitoring"]
        );
    }

    #[test]
    fn test_port_scan_moderate_risk() {
        assert_eq!(
            generate_recommendations(true, Some("port_scan"), 0.6),
            vec![
                "Investigate source IP address",
                "Review recent activity logs",
                "Review firewall rules",
                "Block scanning source if malicious",
                "Check for open unnecessary ports",
            ]
        );
    }

    #[test]
    fn test_critical_malware() {
        let recommendations = generate_recommendations(true, Some("malware"), 0.9);
        assert_eq!(
            recommendations,
            vec![
                "CRITICAL: Immediate action required",
                "Investigate source IP address",
                "Review recent activity logs",
                "Isolate affected device immediately",
                "Run malware scan on affected systems",
                "Check for data exfiltration",
                "Consider network isolation",
                "Notify security team immediately",
            ]
        );
        assert_eq!(recommendations.len(), 2 + 3 + 2 + 1);
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let at_threshold = generate_recommendations(true, Some("botnet"), 0.8);
        assert_ne!(at_threshold[0], "CRITICAL: Immediate action required");
        assert_eq!(at_threshold.len(), 5);
    }

    #[test]
    fn test_unmapped_label_gets_baseline_only() {
        let plain = generate_recommendations(true, Some("normal"), 0.3);
        assert_eq!(
            plain,
            vec!["Investigate source IP address", "Review recent activity logs"]
        );

        let critical = generate_recommendations(true, None, 0.85);
        assert_eq!(critical.len(), 5);
        assert_eq!(critical[0], "CRITICAL: Immediate action required");
        assert_eq!(critical[4], "Notify security team immediately");
    }
}
