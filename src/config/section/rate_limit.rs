//! `[rate_limit]` section configuration.
//!
//! ```toml
//! [rate_limit]
//! limit = 100          # Requests per window and client
//! window_secs = 3600   # Window length
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::ratelimit::{DEFAULT_LIMIT, DEFAULT_WINDOW};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    pub limit: u32,
    pub window_secs: u64,
}

impl RateLimitConfig {
    pub const LIMIT: FieldPath = FieldPath::new("rate_limit.limit");
    pub const WINDOW_SECS: FieldPath = FieldPath::new("rate_limit.window_secs");

    pub const fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.limit == 0 {
            diag.error(Self::LIMIT, "limit must be at least 1");
        }
        if self.window_secs == 0 {
            diag.error(Self::WINDOW_SECS, "window must be at least 1 second");
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            window_secs: DEFAULT_WINDOW.as_secs(),
        }
    }
}
