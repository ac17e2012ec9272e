// Client identification for per-visitor rate limiting.
// Behind the hosting proxy the peer address is the proxy itself, so the
// first X-Forwarded-For hop is used when forwarded headers are trusted.

use actix_web::HttpRequest;

/// Identifier used when no client address can be determined
pub const UNKNOWN_CLIENT: &str = "unknown";

pub fn forwarded_for(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get("X-Forwarded-For")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

pub fn client_identifier(req: &HttpRequest, trust_forwarded_for: bool) -> String {
    if trust_forwarded_for {
        if let Some(ip) = forwarded_for(req) {
            return ip;
        }
    }

    req.peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}
