pub mod autodiscovery;
pub mod context;
pub mod driver;
pub mod messaging;
pub mod server;

pub use autodiscovery::{check_discovery_allowed, DiscoveryLauncher};
pub use context::ServiceContext;
pub use driver::ProtocolDriver;
pub use messaging::{subscribe_device_validation, LocalMessageBus, MessageClient, TopicChannel};
pub use server::DeviceServiceRunner;
