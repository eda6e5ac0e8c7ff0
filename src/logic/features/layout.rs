//! Feature Layout - Centralized Feature Definition
//!
//! **This file controls the feature schema shared by the scaler and both models.**
//!
//! ## Rules:
//! 1. Add feature → increment FEATURE_VERSION
//! 2. Change order → increment FEATURE_VERSION
//! 3. Remove feature → increment FEATURE_VERSION

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

// ============================================================================
// FEATURE VERSION
// ============================================================================

/// Current feature layout version
pub const FEATURE_VERSION: u8 = 1;

// ============================================================================
// FEATURE LAYOUT (Authoritative source)
// ============================================================================

/// Traffic features in the exact order the scaler and models were fit on
pub const FEATURE_LAYOUT: &[&str] = &[
    // === Volume (0-4) ===
    "bytes_in",                // 0
    "bytes_out",               // 1
    "packets_in",              // 2
    "packets_out",             // 3
    "duration",                // 4

    // === Protocol one-hot (5-7) ===
    "protocol_tcp",            // 5
    "protocol_udp",            // 6
    "protocol_icmp",           // 7

    // === Ports (8-9) ===
    "src_port",                // 8
    "dst_port",                // 9

    // === Packet timing (10-13) ===
    "packet_size_mean",        // 10
    "packet_size_std",         // 11
    "inter_arrival_time_mean", // 12
    "inter_arrival_time_std",  // 13

    // === TCP flags (14-17) ===
    "syn_count",               // 14
    "ack_count",               // 15
    "rst_count",               // 16
    "fin_count",               // 17

    // === Peer fan-out (18-19) ===
    "unique_dst_ips",          // 18
    "unique_src_ports",        // 19
];

/// Total number of features
/// Must match FEATURE_LAYOUT.len()
pub const FEATURE_COUNT: usize = 20;

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// CRC32 over the version and ordered feature names
pub fn layout_hash() -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(&[FEATURE_VERSION]);

    for name in FEATURE_LAYOUT {
        hasher.update(name.as_bytes());
        hasher.update(&[0]);
    }

    hasher.finalize()
}

// ============================================================================
// LAYOUT INFO
// ============================================================================

/// Layout information surfaced in model metadata and engine status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub version: u8,
    pub hash: u32,
    pub feature_count: usize,
}

impl LayoutInfo {
    pub fn current() -> Self {
        Self {
            version: FEATURE_VERSION,
            hash: layout_hash(),
            feature_count: FEATURE_COUNT,
        }
    }
}

impl Default for LayoutInfo {
    fn default() -> Self {
        Self::current()
    }
}

// ============================================================================
// FEATURE INDEX LOOKUP
// ============================================================================

/// Get feature index by name
pub fn feature_index(name: &str) -> Option<usize> {
    FEATURE_LAYOUT.iter().position(|&n| n == name)
}

/// Get feature name by index
pub fn feature_name(index: usize) -> Option<&'static str> {
    FEATURE_LAYOUT.get(index).copied()
}

/// Owned copy of the layout, for metadata payloads
pub fn feature_names() -> Vec<String> {
    FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect()
}
