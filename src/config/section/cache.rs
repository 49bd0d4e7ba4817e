//! `[cache]` section configuration.
//!
//! ```toml
//! [cache]
//! enabled = true
//! ttl_secs = 86400    # 24 hours
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::{ConfigDiagnostics, FieldPath};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
    /// Entry lifetime in seconds.
    pub ttl_secs: u64,
}

impl CacheConfig {
    pub const TTL_SECS: FieldPath = FieldPath::new("cache.ttl_secs");

    pub const fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.enabled && self.ttl_secs == 0 {
            diag.warn(Self::TTL_SECS, "entries expire immediately; set `enabled = false` instead");
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_secs: 24 * 60 * 60,
        }
    }
}
