//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::bus::{EventBus, InMemoryBus, ShardedBus};
use crate::correlation::X_CORRELATION_ID;

/// Root configuration for the continuation layer.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ContinuationsConfig {
    /// Correlation header settings.
    pub correlation: CorrelationConfig,

    /// Event bus backend selection.
    pub bus: BusConfig,

    /// Transport settings.
    pub transport: TransportConfig,
}

/// Correlation header settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CorrelationConfig {
    /// Header name the correlation ID travels under, both directions.
    pub header_name: String,
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self {
            header_name: X_CORRELATION_ID.to_string(),
        }
    }
}

/// Event bus settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct BusConfig {
    /// Which backend to construct.
    pub backend: BusBackend,
}

/// Available bus backends. Chosen once at startup; observable behavior
/// is identical across backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BusBackend {
    /// Single-lock in-memory registry (default).
    #[default]
    Memory,

    /// DashMap-sharded registry for subscriber-heavy hosts.
    Sharded,
}

impl BusBackend {
    /// Construct the configured backend.
    pub fn build(self) -> Arc<dyn EventBus> {
        match self {
            BusBackend::Memory => Arc::new(InMemoryBus::new()),
            BusBackend::Sharded => Arc::new(ShardedBus::new()),
        }
    }
}

/// Transport settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Total per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl TransportConfig {
    /// Timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ContinuationsConfig::default();
        assert_eq!(config.correlation.header_name, X_CORRELATION_ID);
        assert_eq!(config.bus.backend, BusBackend::Memory);
        assert_eq!(config.transport.timeout_secs, 30);
    }

    #[test]
    fn test_backend_names_on_the_wire() {
        let config: ContinuationsConfig = toml::from_str(
            r#"
            [bus]
            backend = "sharded"
            "#,
        )
        .unwrap();
        assert_eq!(config.bus.backend, BusBackend::Sharded);
    }
}
