//! Donor matching configuration.

use serde::{Deserialize, Serialize};

/// Tunables for the donor matching engine.
///
/// The radii are policy constants, not hard laws: urgent requests search a
/// narrower radius on the assumption that urgent needs favor faster-reachable
/// donors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingConfig {
    /// Maximum number of donors attached per matching pass.
    #[serde(default = "default_max_results")]
    pub max_results: i64,
    /// Search radius in meters for urgent-tier requests.
    #[serde(default = "default_urgent_radius")]
    pub urgent_radius_meters: f64,
    /// Search radius in meters for normal-tier requests.
    #[serde(default = "default_normal_radius")]
    pub normal_radius_meters: f64,
    /// Timeout for a single matching query in seconds.
    #[serde(default = "default_match_timeout")]
    pub match_timeout_seconds: u64,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            max_results: default_max_results(),
            urgent_radius_meters: default_urgent_radius(),
            normal_radius_meters: default_normal_radius(),
            match_timeout_seconds: default_match_timeout(),
        }
    }
}

fn default_max_results() -> i64 {
    10
}

fn default_urgent_radius() -> f64 {
    50_000.0
}

fn default_normal_radius() -> f64 {
    100_000.0
}

fn default_match_timeout() -> u64 {
    5
}
