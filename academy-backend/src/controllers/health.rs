use actix_web::{web, HttpResponse, Responder};

use crate::AppState;

/// Version from Cargo.toml, available at compile time
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/health").route(web::get().to(health_check)));
}

async fn health_check(state: web::Data<AppState>) -> impl Responder {
    match state.store.ping() {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "status": "ok",
            "version": VERSION
        })),
        Err(e) => {
            log::error!("Health check failed to reach the database: {}", e);
            HttpResponse::ServiceUnavailable().json(serde_json::json!({
                "status": "degraded",
                "version": VERSION
            }))
        }
    }
}
