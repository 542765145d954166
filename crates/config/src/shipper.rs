//! Shipper configuration

use std::time::Duration;

use logship_protocol::CURRENT_PROTOCOL_VERSION;
use serde::Deserialize;

/// Shipper scheduling and backpressure settings
///
/// # Example
///
/// ```toml
/// [shipper]
/// flush_interval_ms = 1000
/// max_ready_entries = 64
/// protocol_version = 2
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ShipperConfig {
    /// Period of the background send task; zero or negative disables it
    pub flush_interval_ms: i64,

    /// Ready-queue depth at which the shipper reports `BUFFERS`
    pub max_ready_entries: usize,

    /// Protocol version stamped on every send
    pub protocol_version: u16,
}

impl Default for ShipperConfig {
    fn default() -> Self {
        Self {
            flush_interval_ms: 1000,
            max_ready_entries: 64,
            protocol_version: CURRENT_PROTOCOL_VERSION,
        }
    }
}

impl ShipperConfig {
    /// Timer period, `None` when the timer is disabled
    pub fn flush_interval(&self) -> Option<Duration> {
        u64::try_from(self.flush_interval_ms)
            .ok()
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
    }
}
