use std::env;
use std::time::Duration;

use thiserror::Error;

use crate::rate_limit::{DEFAULT_MAX_REQUESTS, DEFAULT_WINDOW, MAX_WINDOW};

pub const DEFAULT_SITE_URL: &str = "https://staugustines-academy.vercel.app";
pub const DEFAULT_ADMIN_EMAIL: &str = "admissions@staugustine.edu";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} must be a valid {expected}, got {value:?}")]
    Invalid {
        key: &'static str,
        expected: &'static str,
        value: String,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub rate_limit_max_requests: u32,
    pub rate_limit_window: Duration,
    /// Use the first `X-Forwarded-For` entry as the client address
    pub trust_forwarded_for: bool,
    pub site_url: String,
    pub site_dist_dir: Option<String>,
    pub admin_email: String,
    pub contact_webhook_url: Option<String>,
    pub ga_tracking_id: Option<String>,
    pub plausible_domain: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from any key lookup; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let port: u16 = match get("PORT") {
            Some(v) => v.parse().map_err(|_| invalid("PORT", "port number", v))?,
            None => 8080,
        };

        let rate_limit_max_requests: u32 = match get("RATE_LIMIT_MAX_REQUESTS") {
            Some(v) => match v.parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => return Err(invalid("RATE_LIMIT_MAX_REQUESTS", "positive integer", v)),
            },
            None => DEFAULT_MAX_REQUESTS,
        };

        // 1 second up to the limiter's cap of 7 days
        let window_secs: u64 = match get("RATE_LIMIT_WINDOW_SECS") {
            Some(v) => match v.parse::<u64>() {
                Ok(secs) if secs > 0 && secs <= MAX_WINDOW.as_secs() => secs,
                _ => {
                    return Err(invalid(
                        "RATE_LIMIT_WINDOW_SECS",
                        "number of seconds from 1 to 604800",
                        v,
                    ));
                }
            },
            None => DEFAULT_WINDOW.as_secs(),
        };

        let trust_forwarded_for = match get("TRUST_FORWARDED_FOR") {
            Some(v) => parse_bool(&v).ok_or_else(|| invalid("TRUST_FORWARDED_FOR", "boolean", v))?,
            None => true,
        };

        Ok(Self {
            port,
            database_url: get("DATABASE_URL").unwrap_or_else(|| "./.db/academy.db".to_string()),
            rate_limit_max_requests,
            rate_limit_window: Duration::from_secs(window_secs),
            trust_forwarded_for,
            site_url: get("SITE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_SITE_URL.to_string()),
            site_dist_dir: get("SITE_DIST_DIR"),
            admin_email: get("ADMIN_EMAIL").unwrap_or_else(|| DEFAULT_ADMIN_EMAIL.to_string()),
            contact_webhook_url: get("CONTACT_WEBHOOK_URL"),
            ga_tracking_id: get("GA_TRACKING_ID"),
            plausible_domain: get("PLAUSIBLE_DOMAIN"),
        })
    }
}

fn invalid(key: &'static str, expected: &'static str, value: String) -> ConfigError {
    ConfigError::Invalid { key, expected, value }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
