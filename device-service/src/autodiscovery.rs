//! Discovery triggering and the periodic autodiscovery loop.
//!
//! Guard evaluation is synchronous and cheap; the discovery run itself is
//! handed to a detached task and may take as long as it likes. The caller of
//! `launch` only ever learns that discovery was scheduled.

use log::{debug, error, info, warn};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};

use common::{
    AdminState, DeviceError, DeviceService, DiscoveredDevice, DiscoveryConfig, Result,
};

use crate::context::ServiceContext;
use crate::driver::ProtocolDriver;

/// Short-circuit guard for triggered and periodic discovery. Admin state is
/// checked before configuration; a locked service rejects even when
/// discovery is enabled.
pub fn check_discovery_allowed(
    service: &DeviceService,
    config: &DiscoveryConfig,
) -> Result<()> {
    if service.admin_state == AdminState::Locked {
        return Err(DeviceError::ServiceLocked("service locked".to_string()));
    }
    if !config.enabled {
        return Err(DeviceError::ServiceUnavailable(
            "device discovery disabled".to_string(),
        ));
    }
    Ok(())
}

/// Fire-and-forget entry point for discovery runs. Holds the busy flag that
/// keeps two runs from overlapping; a second launch while one is in flight
/// is skipped, not queued.
#[derive(Clone)]
pub struct DiscoveryLauncher {
    driver: Arc<dyn ProtocolDriver>,
    busy: Arc<Mutex<()>>,
    found: Option<mpsc::Sender<DiscoveredDevice>>,
}

impl DiscoveryLauncher {
    pub fn new(driver: Arc<dyn ProtocolDriver>) -> Self {
        Self {
            driver,
            busy: Arc::new(Mutex::new(())),
            found: None,
        }
    }

    /// Routes discovered devices to an external registration path instead of
    /// only logging them.
    pub fn with_found_sink(mut self, sink: mpsc::Sender<DiscoveredDevice>) -> Self {
        self.found = Some(sink);
        self
    }

    /// Schedules one discovery run and returns immediately. No handle is
    /// retained; completion is reported out-of-band by the driver.
    pub fn launch(&self) {
        let launcher = self.clone();
        tokio::spawn(async move {
            launcher.discovery_wrapper().await;
        });
    }

    async fn discovery_wrapper(&self) {
        let _guard = match self.busy.try_lock() {
            Ok(guard) => guard,
            Err(_) => {
                warn!("another discovery run is already in progress, skipping");
                return;
            }
        };

        info!("device discovery triggered");
        match self.driver.discover().await {
            Ok(devices) => {
                info!("discovery run completed, found {} device(s)", devices.len());
                for device in devices {
                    debug!("discovered device: {}", device.name);
                    if let Some(sink) = &self.found {
                        if sink.send(device).await.is_err() {
                            warn!("discovered-device sink is gone, dropping remaining results");
                            break;
                        }
                    }
                }
            }
            Err(e) => error!("discovery run failed: {}", e),
        }
    }
}

/// Periodic autodiscovery: launches a run every configured interval while
/// the guard allows it. The admin state is re-read each cycle since the
/// management plane can lock the service at runtime.
pub async fn run_periodic_discovery(ctx: ServiceContext, launcher: DiscoveryLauncher) {
    let interval = ctx.config.discovery.interval;
    if !ctx.config.discovery.enabled || interval.is_zero() {
        info!("periodic discovery disabled");
        return;
    }
    info!(
        "periodic discovery enabled, interval {}s",
        interval.as_secs()
    );

    loop {
        tokio::time::sleep(interval).await;
        let allowed = {
            let service = ctx.service.read();
            check_discovery_allowed(&service, &ctx.config.discovery)
        };
        match allowed {
            Ok(()) => launcher.launch(),
            Err(e) => debug!("skipping periodic discovery: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locked_service_rejects_even_when_enabled() {
        let mut service = DeviceService::new("device-test");
        service.admin_state = AdminState::Locked;
        let config = DiscoveryConfig::default();
        assert!(config.enabled);

        let err = check_discovery_allowed(&service, &config).unwrap_err();
        assert!(matches!(err, DeviceError::ServiceLocked(_)));
    }

    #[test]
    fn test_locked_wins_over_disabled() {
        let mut service = DeviceService::new("device-test");
        service.admin_state = AdminState::Locked;
        let config = DiscoveryConfig {
            enabled: false,
            ..Default::default()
        };

        let err = check_discovery_allowed(&service, &config).unwrap_err();
        assert!(matches!(err, DeviceError::ServiceLocked(_)));
    }

    #[test]
    fn test_disabled_discovery_rejects_unlocked_service() {
        let service = DeviceService::new("device-test");
        let config = DiscoveryConfig {
            enabled: false,
            ..Default::default()
        };

        let err = check_discovery_allowed(&service, &config).unwrap_err();
        assert!(matches!(err, DeviceError::ServiceUnavailable(_)));
    }

    #[test]
    fn test_unlocked_and_enabled_is_allowed() {
        let service = DeviceService::new("device-test");
        assert!(check_discovery_allowed(&service, &DiscoveryConfig::default()).is_ok());
    }

    mod periodic {
        use super::*;
        use crate::context::ServiceContext;
        use crate::messaging::LocalMessageBus;
        use async_trait::async_trait;
        use common::{Device, ServiceConfig};
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::time::Duration;

        #[derive(Default)]
        struct CountingDriver {
            discover_calls: AtomicUsize,
        }

        #[async_trait]
        impl ProtocolDriver for CountingDriver {
            async fn validate_device(&self, _device: Device) -> Result<()> {
                Ok(())
            }

            async fn discover(&self) -> Result<Vec<DiscoveredDevice>> {
                self.discover_calls.fetch_add(1, Ordering::SeqCst);
                Ok(vec![])
            }
        }

        fn periodic_ctx(driver: Arc<CountingDriver>, config: DiscoveryConfig) -> ServiceContext {
            let config = ServiceConfig {
                discovery: config,
                ..Default::default()
            };
            ServiceContext::new(
                config,
                DeviceService::new("device-test"),
                driver,
                Arc::new(LocalMessageBus::new()),
            )
        }

        async fn settle() {
            for _ in 0..10 {
                tokio::task::yield_now().await;
            }
        }

        #[tokio::test(start_paused = true)]
        async fn test_loop_launches_discovery_every_interval() {
            let driver = Arc::new(CountingDriver::default());
            let config = DiscoveryConfig {
                enabled: true,
                interval: Duration::from_secs(5),
            };
            let ctx = periodic_ctx(driver.clone(), config);
            let launcher = DiscoveryLauncher::new(driver.clone());
            tokio::spawn(run_periodic_discovery(ctx, launcher));

            tokio::time::sleep(Duration::from_secs(6)).await;
            settle().await;
            assert_eq!(driver.discover_calls.load(Ordering::SeqCst), 1);

            tokio::time::sleep(Duration::from_secs(5)).await;
            settle().await;
            assert_eq!(driver.discover_calls.load(Ordering::SeqCst), 2);
        }

        #[tokio::test(start_paused = true)]
        async fn test_loop_skips_locked_service() {
            let driver = Arc::new(CountingDriver::default());
            let config = DiscoveryConfig {
                enabled: true,
                interval: Duration::from_secs(5),
            };
            let ctx = periodic_ctx(driver.clone(), config);
            ctx.service.write().admin_state = AdminState::Locked;
            let launcher = DiscoveryLauncher::new(driver.clone());
            tokio::spawn(run_periodic_discovery(ctx, launcher));

            tokio::time::sleep(Duration::from_secs(16)).await;
            settle().await;
            assert_eq!(driver.discover_calls.load(Ordering::SeqCst), 0);
        }

        #[tokio::test(start_paused = true)]
        async fn test_loop_rereads_admin_state_each_cycle() {
            let driver = Arc::new(CountingDriver::default());
            let config = DiscoveryConfig {
                enabled: true,
                interval: Duration::from_secs(5),
            };
            let ctx = periodic_ctx(driver.clone(), config);
            let launcher = DiscoveryLauncher::new(driver.clone());
            tokio::spawn(run_periodic_discovery(ctx.clone(), launcher));

            tokio::time::sleep(Duration::from_secs(6)).await;
            settle().await;
            assert_eq!(driver.discover_calls.load(Ordering::SeqCst), 1);

            // Locking the record mid-run stops further cycles.
            ctx.service.write().admin_state = AdminState::Locked;
            tokio::time::sleep(Duration::from_secs(10)).await;
            settle().await;
            assert_eq!(driver.discover_calls.load(Ordering::SeqCst), 1);
        }

        #[tokio::test(start_paused = true)]
        async fn test_loop_exits_when_discovery_disabled() {
            let driver = Arc::new(CountingDriver::default());
            let config = DiscoveryConfig {
                enabled: false,
                interval: Duration::from_secs(5),
            };
            let ctx = periodic_ctx(driver.clone(), config);
            let launcher = DiscoveryLauncher::new(driver.clone());

            // Returns instead of looping.
            run_periodic_discovery(ctx, launcher).await;
            assert_eq!(driver.discover_calls.load(Ordering::SeqCst), 0);
        }
    }
}
