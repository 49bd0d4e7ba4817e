//! `[serve]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [serve]
//! interface = "127.0.0.1"     # Network interface (127.0.0.1 = localhost only)
//! port = 5277                 # HTTP port number
//! workers = 4                 # Request handler threads
//! ```
//!
//! Use `interface = "0.0.0.0"` to make the server accessible from LAN.

use std::net::{IpAddr, Ipv4Addr};

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServeConfig {
    /// Network interface to bind.
    /// - `127.0.0.1` (default): localhost only
    /// - `0.0.0.0`: all interfaces (LAN accessible)
    pub interface: IpAddr,

    /// HTTP port number.
    pub port: u16,

    /// Size of the request handler thread pool.
    pub workers: usize,

    /// Largest accepted request body in bytes.
    pub max_body_bytes: u64,
}

impl ServeConfig {
    pub const PORT: FieldPath = FieldPath::new("serve.port");
    pub const WORKERS: FieldPath = FieldPath::new("serve.workers");
    pub const MAX_BODY_BYTES: FieldPath = FieldPath::new("serve.max_body_bytes");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.port == 0 {
            diag.error(Self::PORT, "port must not be 0");
        }
        if self.workers == 0 {
            diag.error_with_hint(
                Self::WORKERS,
                "at least one worker is required",
                "set `workers = 4` or remove the field",
            );
        }
        if self.max_body_bytes == 0 {
            diag.error(Self::MAX_BODY_BYTES, "body limit must be positive");
        }
    }
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            interface: IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)),
            port: 5277,
            workers: 4,
            max_body_bytes: 1024 * 1024,
        }
    }
}
