pub mod config;
pub mod envelope;
pub mod error;
pub mod topics;
pub mod types;

pub use config::{DiscoveryConfig, ServiceConfig};
pub use envelope::{decode_add_device_request, ContentType, MessageEnvelope};
pub use error::{DeviceError, Result};
pub use types::*;

/// API version stamped on request payloads.
pub const API_VERSION: &str = "v3";

/// Default topic prefix shared with callers.
pub const DEFAULT_BASE_TOPIC: &str = "edgex";
