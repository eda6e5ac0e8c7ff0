//! Risk Rules & Remediation Tables
//!
//! Constants and lookup tables only. Scoring lives in `risk`, list assembly
//! in `recommend`.

use super::types::AnomalyLabel;

// ============================================================================
// RISK WEIGHTS
// ============================================================================

/// Share of the risk score contributed by model confidence
pub const CONFIDENCE_WEIGHT: f64 = 0.5;

/// Share of the risk score contributed by attack severity
pub const SEVERITY_WEIGHT: f64 = 0.5;

/// Severity for a label that is present but missing from the table
pub const DEFAULT_SEVERITY: f64 = 0.5;

/// Risk strictly above this escalates the recommendations
pub const CRITICAL_RISK_THRESHOLD: f64 = 0.8;

// ============================================================================
// SEVERITY TABLE
// ============================================================================

/// Assumed operational danger per attack type
pub fn severity_weight(label: &str) -> Option<f64> {
    let label: AnomalyLabel = label.parse().ok()?;
    let weight = match label {
        AnomalyLabel::DdosAttack => 0.9,
        AnomalyLabel::Malware => 0.95,
        AnomalyLabel::Botnet => 0.85,
        AnomalyLabel::DataExfiltration => 0.9,
        AnomalyLabel::UnauthorizedAccess => 0.8,
        AnomalyLabel::PortScan => 0.6,
        AnomalyLabel::ProtocolAnomaly => 0.5,
        AnomalyLabel::Normal => 0.0,
    };
    Some(weight)
}

// ============================================================================
// RECOMMENDATION TEXT
// ============================================================================

pub const CONTINUE_MONITORING: &str = "Continue normal monitoring";

pub const CRITICAL_MARKER: &str = "CRITICAL: Immediate action required";

/// Always issued for an anomaly, in this order
pub const BASELINE_ACTIONS: [&str; 2] = [
    "Investigate source IP address",
    "Review recent activity logs",
];

/// Appended after the type-specific actions when risk is critical
pub const ESCALATION_ACTIONS: [&str; 2] = [
    "Consider network isolation",
    "Notify security team immediately",
];

/// Remediation steps per attack type
pub fn type_actions(label: &str) -> &'static [&'static str] {
    let Ok(label) = label.parse::<AnomalyLabel>() else {
        return &[];
    };
    match label {
        AnomalyLabel::DdosAttack => &[
            "Enable DDoS protection rules",
            "Consider rate limiting",
            "Contact upstream provider if severe",
        ],
        AnomalyLabel::Malware => &[
            "Isolate affected device immediately",
            "Run malware scan on affected systems",
            "Check for data exfiltration",
        ],
        AnomalyLabel::Botnet => &[
            "Block command and control communication",
            "Isolate infected devices",
            "Scan network for other infected hosts",
        ],
        AnomalyLabel::DataExfiltration => &[
            "Block outbound connections immediately",
            "Investigate data access logs",
            "Check for compromised credentials",
        ],
        AnomalyLabel::UnauthorizedAccess => &[
            "Review authentication logs",
            "Check for credential compromise",
            "Enable additional authentication factors",
        ],
        AnomalyLabel::PortScan => &[
            "Review firewall rules",
            "Block scanning source if malicious",
            "Check for open unnecessary ports",
        ],
        AnomalyLabel::ProtocolAnomaly => &[
            "Investigate protocol violation",
            "Check for misconfigured devices",
            "Update network policies",
        ],
        AnomalyLabel::Normal => &[],
    }
}
