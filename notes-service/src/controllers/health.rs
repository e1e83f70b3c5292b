use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, web};

use crate::AppState;

/// Version from Cargo.toml, available at compile time
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/health").route(web::get().to(health_check)));
}

async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let uptime_secs = state.started_at.elapsed().as_secs();
    let (status, body) = health_report(state.db.is_available(), uptime_secs);
    HttpResponse::build(status).json(body)
}

fn health_report(database_available: bool, uptime_secs: u64) -> (StatusCode, serde_json::Value) {
    let (code, status, database) = if database_available {
        (StatusCode::OK, "ok", "ok")
    } else {
        log::warn!("[HEALTH] Database pool has no open connections");
        (StatusCode::SERVICE_UNAVAILABLE, "degraded", "unavailable")
    };

    (
        code,
        serde_json::json!({
            "status": status,
            "version": VERSION,
            "database": database,
            "uptime_secs": uptime_secs
        }),
    )
}
