//! Fixed-window request limiter keyed by client identifier
//!
//! Each identifier gets a window that opens on its first request. Within the
//! window at most `max_requests` are allowed; once the window has passed the
//! next request opens a fresh one. State lives in process memory only.

use dashmap::DashMap;
use std::time::{Duration, Instant};

/// Default number of requests allowed per window
pub const DEFAULT_MAX_REQUESTS: u32 = 5;
/// Default window length (15 minutes)
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(15 * 60);
/// Longest window a limiter will use (7 days)
pub const MAX_WINDOW: Duration = Duration::from_secs(7 * 24 * 60 * 60);

#[derive(Debug, Clone, Copy)]
struct WindowRecord {
    count: u32,
    reset_at: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    Allowed { remaining: u32 },
    Limited,
}

pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    records: DashMap<String, WindowRecord>,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        if window > MAX_WINDOW {
            log::warn!(
                "[RATE_LIMIT] Window of {}s capped to {}s",
                window.as_secs(),
                MAX_WINDOW.as_secs()
            );
        }

        Self {
            max_requests,
            window: window.min(MAX_WINDOW),
            records: DashMap::new(),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn check(&self, identifier: &str) -> RateLimitDecision {
        self.check_at(identifier, Instant::now())
    }

    /// End of a window opened at `now`. An `Instant` that cannot be pushed
    /// that far ends the window immediately.
    fn window_end(&self, now: Instant) -> Instant {
        now.checked_add(self.window).unwrap_or(now)
    }

    /// Count a request from `identifier` made at `now`.
    pub fn check_at(&self, identifier: &str, now: Instant) -> RateLimitDecision {
        let reset_at = self.window_end(now);
        let mut record = self
            .records
            .entry(identifier.to_string())
            .or_insert(WindowRecord { count: 0, reset_at });

        if now > record.reset_at {
            *record = WindowRecord { count: 0, reset_at };
        }

        if record.count >= self.max_requests {
            log::debug!("[RATE_LIMIT] '{}' limited ({} requests)", identifier, record.count);
            return RateLimitDecision::Limited;
        }

        record.count += 1;
        RateLimitDecision::Allowed {
            remaining: self.max_requests - record.count,
        }
    }

    /// Drop records whose window has ended. Returns how many were removed.
    pub fn purge_expired(&self, now: Instant) -> usize {
        let before = self.records.len();
        self.records.retain(|_, record| now <= record.reset_at);
        before.saturating_sub(self.records.len())
    }

    pub fn tracked_clients(&self) -> usize {
        self.records.len()
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_REQUESTS, DEFAULT_WINDOW)
    }
}
