//! Node configuration.

use serde::Deserialize;
use tokio::time::Duration;

/// Fallback coordinate reported while the receiver has no satellite
/// lock, so the uplink never carries a meaningless (0, 0, 0) position.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct HomePosition {
    pub lat: f64,
    pub lon: f64,
    pub alt: f64,
}

impl Default for HomePosition {
    fn default() -> Self {
        Self {
            lat: 35.709662,
            lon: 139.810793,
            alt: 100.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    /// Sleep between reporting rounds, in milliseconds.
    pub round_period_millis: u64,
    /// Upper bound on the position worker's wait for a fresh fix.
    pub fix_wait_millis: u64,
    /// Report the 14-byte reduced payload instead of the full suite.
    pub compact_uplink: bool,
    pub home: HomePosition,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            round_period_millis: 60_000,
            fix_wait_millis: 1_000,
            compact_uplink: false,
            home: HomePosition::default(),
        }
    }
}

impl NodeConfig {
    pub fn round_period(&self) -> Duration {
        Duration::from_millis(self.round_period_millis)
    }

    pub fn fix_wait(&self) -> Duration {
        Duration::from_millis(self.fix_wait_millis)
    }
}
