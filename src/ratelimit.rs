//! Fixed-window request limiter keyed by client identifier.

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::time::Duration;

use crate::utils::date::now_millis;

/// Requests allowed per window when nothing else is configured.
pub const DEFAULT_LIMIT: u32 = 100;

/// Default window length: one hour.
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Clone, Copy)]
struct Window {
    count: u32,
    /// Epoch millis at which the window closes.
    reset_time: u64,
}

impl Window {
    const fn is_expired(&self, now: u64) -> bool {
        now > self.reset_time
    }
}

/// Outcome of one limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Decision {
    pub allowed: bool,
    pub remaining: u32,
    pub reset_time: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowSnapshot {
    pub key: String,
    pub count: u32,
    pub reset_time: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitStats {
    pub active_keys: usize,
    pub entries: Vec<WindowSnapshot>,
}

/// Per-identifier fixed-window counters.
///
/// Clock-dependent operations have `*_at` variants taking epoch millis.
pub struct RateLimiter {
    windows: Mutex<FxHashMap<String, Window>>,
    limit: u32,
    window: Duration,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_LIMIT, DEFAULT_WINDOW)
    }
}

impl RateLimiter {
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            windows: Mutex::new(FxHashMap::default()),
            limit,
            window,
        }
    }

    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Check with the configured limit and window.
    pub fn check(&self, id: &str) -> Decision {
        self.check_limit(id, self.limit, self.window)
    }

    pub fn check_limit(&self, id: &str, limit: u32, window: Duration) -> Decision {
        self.check_limit_at(id, limit, window, now_millis())
    }

    /// Count one request against `id`.
    ///
    /// A missing or elapsed window restarts at one. A full window denies
    /// without counting.
    #[allow(clippy::cast_possible_truncation)]
    pub fn check_limit_at(&self, id: &str, limit: u32, window: Duration, now: u64) -> Decision {
        let mut windows = self.windows.lock();

        match windows.get_mut(id) {
            Some(entry) if !entry.is_expired(now) => {
                if entry.count >= limit {
                    return Decision {
                        allowed: false,
                        remaining: 0,
                        reset_time: entry.reset_time,
                    };
                }
                entry.count += 1;
                Decision {
                    allowed: true,
                    remaining: limit.saturating_sub(entry.count),
                    reset_time: entry.reset_time,
                }
            }
            _ => {
                let reset_time = now.saturating_add(window.as_millis() as u64);
                windows.insert(
                    id.to_string(),
                    Window {
                        count: 1,
                        reset_time,
                    },
                );
                Decision {
                    allowed: true,
                    remaining: limit.saturating_sub(1),
                    reset_time,
                }
            }
        }
    }

    /// Requests left for `id` in its current window, without counting one.
    pub fn remaining_requests(&self, id: &str) -> u32 {
        self.remaining_requests_at(id, now_millis())
    }

    pub fn remaining_requests_at(&self, id: &str, now: u64) -> u32 {
        match self.windows.lock().get(id) {
            Some(entry) if !entry.is_expired(now) => self.limit.saturating_sub(entry.count),
            _ => self.limit,
        }
    }

    /// When the current window for `id` closes, if one is open.
    pub fn reset_time(&self, id: &str) -> Option<u64> {
        self.reset_time_at(id, now_millis())
    }

    pub fn reset_time_at(&self, id: &str, now: u64) -> Option<u64> {
        self.windows
            .lock()
            .get(id)
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| entry.reset_time)
    }

    /// Drop every elapsed window.
    pub fn cleanup_at(&self, now: u64) {
        self.windows.lock().retain(|_, entry| !entry.is_expired(now));
    }

    pub fn stats(&self) -> RateLimitStats {
        self.stats_at(now_millis())
    }

    /// Clean up, then snapshot the live windows ordered by key.
    pub fn stats_at(&self, now: u64) -> RateLimitStats {
        self.cleanup_at(now);
        let windows = self.windows.lock();
        let mut entries: Vec<WindowSnapshot> = windows
            .iter()
            .map(|(key, w)| WindowSnapshot {
                key: key.clone(),
                count: w.count,
                reset_time: w.reset_time,
            })
            .collect();
        entries.sort_by(|a, b| a.key.cmp(&b.key));
        RateLimitStats {
            active_keys: entries.len(),
            entries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(1_000);

    #[test]
    fn test_window_fills_then_denies() {
        let limiter = RateLimiter::new(3, WINDOW);
        let remaining: Vec<u32> = (0..3)
            .map(|_| limiter.check_limit_at("ip", 3, WINDOW, 0).remaining)
            .collect();
        assert_eq!(remaining, [2, 1, 0]);

        let denied = limiter.check_limit_at("ip", 3, WINDOW, 10);
        assert_eq!(
            denied,
            Decision {
                allowed: false,
                remaining: 0,
                reset_time: 1_000
            }
        );
    }

    #[test]
    fn test_window_restarts_after_reset() {
        let limiter = RateLimiter::new(1, WINDOW);
        assert!(limiter.check_limit_at("ip", 1, WINDOW, 0).allowed);
        assert!(!limiter.check_limit_at("ip", 1, WINDOW, 1_000).allowed);

        let fresh = limiter.check_limit_at("ip", 1, WINDOW, 1_001);
        assert!(fresh.allowed);
        assert_eq!(fresh.reset_time, 2_001);
    }

    #[test]
    fn test_identifiers_are_independent() {
        let limiter = RateLimiter::new(1, WINDOW);
        assert!(limiter.check_limit_at("a", 1, WINDOW, 0).allowed);
        assert!(limiter.check_limit_at("b", 1, WINDOW, 0).allowed);
        assert!(!limiter.check_limit_at("a", 1, WINDOW, 0).allowed);
    }

    #[test]
    fn test_remaining_and_reset_queries() {
        let limiter = RateLimiter::new(5, WINDOW);
        assert_eq!(limiter.remaining_requests_at("ip", 0), 5);
        assert_eq!(limiter.reset_time_at("ip", 0), None);

        limiter.check_limit_at("ip", 5, WINDOW, 0);
        limiter.check_limit_at("ip", 5, WINDOW, 0);
        assert_eq!(limiter.remaining_requests_at("ip", 500), 3);
        assert_eq!(limiter.reset_time_at("ip", 500), Some(1_000));
        assert_eq!(limiter.remaining_requests_at("ip", 1_001), 5);
    }

    #[test]
    fn test_stats_cleans_up() {
        let limiter = RateLimiter::default();
        limiter.check_limit_at("old", 10, Duration::from_millis(10), 0);
        limiter.check_limit_at("new", 10, WINDOW, 0);
        limiter.check_limit_at("new", 10, WINDOW, 0);

        let stats = limiter.stats_at(100);
        assert_eq!(stats.active_keys, 1);
        assert_eq!(
            stats.entries,
            [WindowSnapshot {
                key: "new".into(),
                count: 2,
                reset_time: 1_000
            }]
        );

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["activeKeys"], 1);
        assert_eq!(json["entries"][0]["resetTime"], 1_000);
    }

    #[test]
    fn test_default_limits() {
        let limiter = RateLimiter::default();
        assert_eq!(limiter.limit(), 100);
        assert_eq!(limiter.check("x").remaining, 99);
    }
}
