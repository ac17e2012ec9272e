//! Contact form endpoint
//!
//! POST /api/contact runs: rate limit → parse → validate → store → notify.
//! Every other method gets 405.

use actix_web::{web, HttpRequest, HttpResponse, ResponseError};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::ContactError;
use crate::middleware::client_ip::client_identifier;
use crate::rate_limit::RateLimitDecision;
use crate::validation::validate_contact;
use crate::AppState;

pub const SUCCESS_MESSAGE: &str = "Thank you for your message. We will get back to you soon!";

/// Request bodies larger than this are rejected before parsing
pub const MAX_BODY_BYTES: usize = 64 * 1024;

#[derive(Serialize)]
pub struct ContactResponse {
    success: bool,
    message: &'static str,
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/contact")
            .route(web::post().to(submit_contact))
            .default_service(web::to(method_not_allowed)),
    );
}

async fn submit_contact(
    state: web::Data<AppState>,
    req: HttpRequest,
    payload: web::Payload,
) -> Result<HttpResponse, ContactError> {
    let client = client_identifier(&req, state.config.trust_forwarded_for);

    match state.rate_limiter.check(&client) {
        RateLimitDecision::Limited => {
            log::warn!("Rate limited contact submission from {}", client);
            return Err(ContactError::RateLimited);
        }
        RateLimitDecision::Allowed { remaining } => {
            log::debug!("{} may send {} more contact requests this window", client, remaining);
        }
    }

    // Read after the limiter so oversized bodies still count
    let body = match payload.to_bytes_limited(MAX_BODY_BYTES).await {
        Ok(Ok(body)) => body,
        Ok(Err(e)) => {
            log::info!("Failed to read contact body from {}: {}", client, e);
            return Err(ContactError::InvalidBody);
        }
        Err(_) => {
            log::info!("Rejected contact body over {} bytes from {}", MAX_BODY_BYTES, client);
            return Err(ContactError::PayloadTooLarge);
        }
    };

    let payload: Map<String, Value> = serde_json::from_slice(&body).map_err(|e| {
        log::info!("Rejected contact body from {}: {}", client, e);
        ContactError::InvalidBody
    })?;

    let submission = validate_contact(&payload).map_err(|errors| {
        let fields: Vec<&str> = errors.iter().map(|e| e.field).collect();
        log::info!("Contact submission from {} failed validation: {:?}", client, fields);
        ContactError::Validation(errors)
    })?;

    let stored = state.store.insert_submission(&submission).map_err(|e| {
        log::error!("Failed to save contact submission: {}", e);
        ContactError::Store(e)
    })?;

    log::info!("Saved contact submission #{} from {}", stored.id, client);

    if let Err(e) = state.notifier.notify(&stored).await {
        log::error!(
            "Failed to send {} notification for submission #{}: {}",
            state.notifier.name(),
            stored.id,
            e
        );
    }

    Ok(HttpResponse::Ok().json(ContactResponse {
        success: true,
        message: SUCCESS_MESSAGE,
    }))
}

async fn method_not_allowed() -> HttpResponse {
    ContactError::MethodNotAllowed.error_response()
}
