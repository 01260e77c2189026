//! Link configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Capacity of the reply accumulation buffer in bytes.
///
/// The wire protocol has no length prefix; replies are read until the
/// envelope terminator appears or this capacity is reached. RealFlight
/// telemetry replies fit comfortably within 4 KiB.
pub const REPLY_BUFFER_CAPACITY: usize = 4096;

/// Configuration for a FlightAxis link.
///
/// All fields have defaults matching a local RealFlight installation,
/// so `LinkConfig::default()` works out of the box:
///
/// ```rust
/// use flightaxis::LinkConfig;
///
/// let config = LinkConfig::default();
/// assert_eq!(config.endpoint(), "127.0.0.1:18083");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    /// RealFlight host address
    pub host: String,

    /// RealFlight SOAP port
    pub port: u16,

    /// Target depth of the pre-connected socket pool
    pub pool_size: usize,

    /// Per-request reply timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".to_string(), port: 18083, pool_size: 3, request_timeout_ms: 1000 }
    }
}

impl LinkConfig {
    /// Create a configuration for the given host and port, keeping
    /// defaults for everything else.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self { host: host.into(), port, ..Self::default() }
    }

    /// The remote endpoint in `host:port` form.
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Per-request reply timeout as a [`Duration`].
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}
