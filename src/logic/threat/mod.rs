//! Threat Module
//!
//! Turns a classification into an operational verdict: attack-type labels,
//! a bounded risk score, and remediation recommendations.
//!
//! ## Structure
//! - `types`: AnomalyLabel
//! - `rules`: severity table, weights, recommendation text
//! - `risk`: risk scorer
//! - `recommend`: recommendation generator

pub mod types;
pub mod rules;
pub mod risk;
pub mod recommend;

pub use types::AnomalyLabel;
pub use rules::{severity_weight, CRITICAL_RISK_THRESHOLD};
pub use risk::risk_score;
pub use recommend::generate_recommendations;
