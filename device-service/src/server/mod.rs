//! Service wiring: HTTP boundary plus the background services that make up
//! a running device service.

use actix_web::{web, App, HttpServer};
use log::info;

use common::Result;

use crate::autodiscovery::{run_periodic_discovery, DiscoveryLauncher};
use crate::context::ServiceContext;
use crate::messaging::subscribe_device_validation;

pub mod handlers;

/// Shared state handed to every HTTP handler.
pub struct AppState {
    pub ctx: ServiceContext,
    pub launcher: DiscoveryLauncher,
}

/// Owns startup and the run loop: validation responder, periodic discovery,
/// HTTP server.
pub struct DeviceServiceRunner {
    ctx: ServiceContext,
}

impl DeviceServiceRunner {
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    pub async fn start(&self) -> Result<()> {
        // Subscription failure is fatal; everything after this point reports
        // failures per message or per run.
        subscribe_device_validation(self.ctx.clone()).await?;

        let launcher = DiscoveryLauncher::new(self.ctx.driver.clone());
        let state = web::Data::new(AppState {
            ctx: self.ctx.clone(),
            launcher: launcher.clone(),
        });

        let bind_address = self.ctx.config.bind_address.clone();
        info!("starting HTTP server on {}", bind_address);
        let http_server = HttpServer::new(move || {
            App::new().app_data(state.clone()).service(
                web::scope("/api/v3")
                    .service(handlers::trigger_discovery)
                    .service(handlers::ping),
            )
        })
        .bind(&bind_address)?;

        let server_handle = http_server.run();

        let periodic_handle = {
            let ctx = self.ctx.clone();
            info!("starting periodic discovery service");
            tokio::spawn(async move {
                run_periodic_discovery(ctx, launcher).await;
            })
        };

        info!("all services started");

        tokio::select! {
            result = server_handle => {
                info!("HTTP server stopped: {:?}", result);
            }
            _ = periodic_handle => {
                info!("periodic discovery service stopped");
            }
        }

        Ok(())
    }
}
