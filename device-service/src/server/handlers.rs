//! HTTP request handlers for the device service boundary.

use actix_web::{get, post, web, HttpResponse};
use log::info;

use common::DeviceError;

use crate::autodiscovery::check_discovery_allowed;
use crate::server::AppState;

/// Triggers a discovery run. The guards run synchronously and reject with a
/// structured error; on success discovery is scheduled and 202 returned
/// without waiting for it.
#[post("/discovery")]
pub async fn trigger_discovery(
    state: web::Data<AppState>,
) -> std::result::Result<HttpResponse, DeviceError> {
    {
        let service = state.ctx.service.read();
        check_discovery_allowed(&service, &state.ctx.config.discovery)?;
    }

    info!("discovery requested over HTTP, scheduling run");
    state.launcher.launch();
    Ok(HttpResponse::Accepted().finish())
}

/// Liveness probe.
#[get("/ping")]
pub async fn ping(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "apiVersion": common::API_VERSION,
        "serviceName": state.ctx.config.service_name,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
