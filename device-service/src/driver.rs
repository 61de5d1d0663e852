use async_trait::async_trait;
use common::{Device, DiscoveredDevice, Result};

/// Protocol-specific capability set supplied by a concrete device
/// integration. The service core stays polymorphic over this trait and never
/// looks inside the driver.
#[async_trait]
pub trait ProtocolDriver: Send + Sync {
    /// Checks whether a candidate device's connection parameters are usable.
    /// The error's display text is surfaced verbatim to the caller.
    async fn validate_device(&self, device: Device) -> Result<()>;

    /// Actively scans for devices reachable over this driver's protocol.
    /// May run for an unbounded duration; callers never await it directly,
    /// the discovery wrapper does.
    async fn discover(&self) -> Result<Vec<DiscoveredDevice>>;
}
