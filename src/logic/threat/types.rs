//! Threat Types
//!
//! Attack-type labels produced by the classification strategy.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ============================================================================
// ANOMALY LABEL
// ============================================================================

/// Closed set of traffic labels; the discriminant order is the class index
/// used by the classification strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyLabel {
    Normal,
    DdosAttack,
    PortScan,
    Malware,
    Botnet,
    DataExfiltration,
    UnauthorizedAccess,
    ProtocolAnomaly,
}

impl AnomalyLabel {
    /// All labels in class-index order
    pub const ALL: [AnomalyLabel; 8] = [
        AnomalyLabel::Normal,
        AnomalyLabel::DdosAttack,
        AnomalyLabel::PortScan,
        AnomalyLabel::Malware,
        AnomalyLabel::Botnet,
        AnomalyLabel::DataExfiltration,
        AnomalyLabel::UnauthorizedAccess,
        AnomalyLabel::ProtocolAnomaly,
    ];

    pub const COUNT: usize = Self::ALL.len();

    pub fn as_str(&self) -> &'static str {
        match self {
            AnomalyLabel::Normal => "normal",
            AnomalyLabel::DdosAttack => "ddos_attack",
            AnomalyLabel::PortScan => "port_scan",
            AnomalyLabel::Malware => "malware",
            AnomalyLabel::Botnet => "botnet",
            AnomalyLabel::DataExfiltration => "data_exfiltration",
            AnomalyLabel::UnauthorizedAccess => "unauthorized_access",
            AnomalyLabel::ProtocolAnomaly => "protocol_anomaly",
        }
    }

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn is_attack(&self) -> bool {
        *self != AnomalyLabel::Normal
    }

    /// Label names in class-index order
    pub fn names() -> Vec<String> {
        Self::ALL.iter().map(|l| l.as_str().to_string()).collect()
    }
}

impl fmt::Display for AnomalyLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AnomalyLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|label| label.as_str() == s)
            .copied()
            .ok_or_else(|| format!("unknown anomaly label: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_round_trip() {
        for (i, label) in AnomalyLabel::ALL.iter().enumerate() {
            assert_eq!(label.index(), i);
            assert_eq!(AnomalyLabel::from_index(i), Some(*label));
        }
        assert_eq!(AnomalyLabel::from_index(8), None);
    }

    #[test]
    fn test_parse() {
        assert_eq!("botnet".parse::<AnomalyLabel>(), Ok(AnomalyLabel::Botnet));
        assert!("malware_activity".parse::<AnomalyLabel>().is_err());
    }

    #[test]
    fn test_serde_uses_snake_case() {
        let json = serde_json::to_string(&AnomalyLabel::DataExfiltration).unwrap();
        assert_eq!(json, "\"data_exfiltration\"");
    }

    #[test]
    fn test_only_normal_is_benign() {
        let attacks = AnomalyLabel::ALL.iter().filter(|l| l.is_attack()).count();
        assert_eq!(attacks, 7);
        assert!(!AnomalyLabel::Normal.is_attack());
    }
}
