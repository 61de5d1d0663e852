use std::time::Duration;

use crate::error::Result;

/// Discovery behavior for the owning service.
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    pub enabled: bool,
    /// Interval between periodic discovery runs. Zero disables the loop;
    /// manual triggering stays available.
    pub interval: Duration,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub service_name: String,
    pub base_topic: String,
    pub bind_address: String,
    pub discovery: DiscoveryConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            service_name: "device-service".to_string(),
            base_topic: crate::DEFAULT_BASE_TOPIC.to_string(),
            bind_address: "127.0.0.1:59999".to_string(),
            discovery: DiscoveryConfig::default(),
        }
    }
}

impl ServiceConfig {
    /// Loads configuration from the environment, falling back to defaults.
    pub fn load() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            service_name: std::env::var("SERVICE_NAME").unwrap_or(defaults.service_name),
            base_topic: std::env::var("BASE_TOPIC").unwrap_or(defaults.base_topic),
            bind_address: std::env::var("BIND_ADDRESS").unwrap_or(defaults.bind_address),
            discovery: DiscoveryConfig {
                enabled: std::env::var("DISCOVERY_ENABLED")
                    .map(|v| v != "false" && v != "0")
                    .unwrap_or(defaults.discovery.enabled),
                interval: std::env::var("DISCOVERY_INTERVAL_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .map(Duration::from_secs)
                    .unwrap_or(defaults.discovery.interval),
            },
        })
    }
}
