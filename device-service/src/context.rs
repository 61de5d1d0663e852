use parking_lot::RwLock;
use std::sync::Arc;

use common::{DeviceService, ServiceConfig};

use crate::driver::ProtocolDriver;
use crate::messaging::MessageClient;

/// The collaborators every component needs, resolved once at startup and
/// cloned into the responder, the HTTP state, and the discovery launcher.
#[derive(Clone)]
pub struct ServiceContext {
    pub config: Arc<ServiceConfig>,
    /// Owning service record. Read here only to gate discovery; mutated by
    /// the management plane elsewhere.
    pub service: Arc<RwLock<DeviceService>>,
    pub driver: Arc<dyn ProtocolDriver>,
    pub bus: Arc<dyn MessageClient>,
}

impl ServiceContext {
    pub fn new(
        config: ServiceConfig,
        service: DeviceService,
        driver: Arc<dyn ProtocolDriver>,
        bus: Arc<dyn MessageClient>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            service: Arc::new(RwLock::new(service)),
            driver,
            bus,
        }
    }
}
