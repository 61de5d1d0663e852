//! Main entry point for the device service.

use actix_web::main as actix_main;
use async_trait::async_trait;
use chrono::Local;
use env_logger::fmt::Color;
use env_logger::Builder;
use log::{info, LevelFilter};
use std::io::Write;
use std::sync::Arc;

use common::{Device, DeviceService, DiscoveredDevice, Result, ServiceConfig};
use device_service::driver::ProtocolDriver;
use device_service::messaging::LocalMessageBus;
use device_service::{DeviceServiceRunner, ServiceContext};

const BANNER: &str = r#"
╔═══════════════════════════════════════════════╗
║   Device Service                              ║
║   validation + discovery core                 ║
╚═══════════════════════════════════════════════╝
"#;

/// Placeholder driver so the service runs standalone. Real device
/// integrations supply their own `ProtocolDriver` implementation.
struct AcceptAllDriver;

#[async_trait]
impl ProtocolDriver for AcceptAllDriver {
    async fn validate_device(&self, device: Device) -> Result<()> {
        info!("accepting device {} without protocol checks", device.name);
        Ok(())
    }

    async fn discover(&self) -> Result<Vec<DiscoveredDevice>> {
        Ok(vec![])
    }
}

fn setup_logger() {
    let mut builder = Builder::from_default_env();

    builder
        .format(|buf, record| {
            let mut timestamp_style = buf.style();
            let mut level_style = buf.style();
            let mut target_style = buf.style();

            let level_color = match record.level() {
                log::Level::Error => Color::Red,
                log::Level::Warn => Color::Yellow,
                log::Level::Info => Color::Green,
                log::Level::Debug => Color::Cyan,
                log::Level::Trace => Color::White,
            };

            let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
            writeln!(
                buf,
                "{} {} [{}] {}",
                timestamp_style
                    .set_color(Color::Rgb(100, 100, 100))
                    .value(timestamp),
                level_style.set_color(level_color).value(record.level()),
                target_style.set_color(Color::Blue).value(record.target()),
                record.args()
            )
        })
        .filter(None, LevelFilter::Info)
        .init();
}

#[actix_main]
async fn main() -> Result<()> {
    setup_logger();

    println!("{}", BANNER);

    info!("Starting device service...");

    let config = ServiceConfig::load()?;
    info!("Configuration loaded for service {}", config.service_name);

    let service = DeviceService::new(config.service_name.clone());
    let driver = Arc::new(AcceptAllDriver);
    let bus = Arc::new(LocalMessageBus::new());

    let ctx = ServiceContext::new(config, service, driver, bus);
    let runner = DeviceServiceRunner::new(ctx);

    runner.start().await
}
