//! Analytics bootstrap for the static pages
//!
//! The cookie banner stores the visitor's choices in local storage under
//! `cookie-consent`. Pages pass that value as `?consent=...`, e.g.
//!
//! ```text
//! fetch('/api/analytics/config?consent=' +
//!       encodeURIComponent(localStorage.getItem('cookie-consent') ?? ''))
//! ```
//!
//! A `cookie-consent` cookie holding the same JSON is read when the query
//! parameter is absent. Tracker IDs are only handed out once the visitor has
//! opted into analytics.

use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde::{Deserialize, Serialize};

use crate::models::{CONSENT_COOKIE, CookiePreferences};
use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsConfigResponse {
    consent_recorded: bool,
    analytics_storage: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    ga_tracking_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    plausible_domain: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ConsentQuery {
    consent: Option<String>,
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/analytics/config").route(web::get().to(analytics_config)));
}

/// Query parameter first, then the cookie
fn stored_preferences(req: &HttpRequest, query: &ConsentQuery) -> Option<CookiePreferences> {
    let raw = match query.consent.as_deref().filter(|v| !v.trim().is_empty()) {
        Some(value) => value.to_string(),
        None => req.cookie(CONSENT_COOKIE)?.value().to_string(),
    };

    let prefs = CookiePreferences::parse(&raw);
    if prefs.is_none() {
        log::debug!("Ignoring malformed {} value", CONSENT_COOKIE);
    }
    prefs
}

async fn analytics_config(
    state: web::Data<AppState>,
    req: HttpRequest,
    query: web::Query<ConsentQuery>,
) -> impl Responder {
    let prefs = stored_preferences(&req, &query);
    let granted = prefs.map(|p| p.analytics_allowed()).unwrap_or(false);

    let response = if granted {
        AnalyticsConfigResponse {
            consent_recorded: true,
            analytics_storage: "granted",
            ga_tracking_id: state.config.ga_tracking_id.clone(),
            plausible_domain: state.config.plausible_domain.clone(),
        }
    } else {
        AnalyticsConfigResponse {
            consent_recorded: prefs.is_some(),
            analytics_storage: "denied",
            ga_tracking_id: None,
            plausible_domain: None,
        }
    };

    HttpResponse::Ok()
        .insert_header(("Cache-Control", "no-store"))
        .json(response)
}
