//! HTTP service for avatar, favicon and QR generation.
//!
//! ```text
//! serve/
//! ├── lifecycle  # port binding with retry
//! ├── request    # ApiRequest: method, path, query, headers, body
//! ├── response   # ApiResponse and delivery over tiny_http
//! ├── router     # path/method dispatch
//! ├── avatar     # /api/avatar (GET, POST, OPTIONS)
//! ├── image      # /api/image (legacy)
//! ├── stats      # /api/avatar/stats, /api/avatar/themes
//! └── state      # AppState shared by all requests
//! ```

mod avatar;
mod image;
mod lifecycle;
mod request;
mod response;
mod router;
mod state;
mod stats;

use crate::{config::AppConfig, core::register_server, debug, log};
use anyhow::{Context, Result};
use request::{ApiRequest, ReadError};
use response::ApiResponse;
use state::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use tiny_http::{Request, Server};

/// Bound server ready to accept requests
pub struct BoundServer {
    server: Arc<Server>,
    addr: SocketAddr,
    state: Arc<AppState>,
}

/// Bind the HTTP server and register it for graceful shutdown.
pub fn bind_server(config: AppConfig) -> Result<BoundServer> {
    let bound = bind(AppState::from_config(config))?;
    register_server(Arc::clone(&bound.server));
    log!("serve"; "http://{}", bound.addr);
    Ok(bound)
}

fn bind(state: AppState) -> Result<BoundServer> {
    let serve = &state.config.serve;
    let (server, addr) = lifecycle::bind_with_retry(serve.interface, serve.port)?;
    Ok(BoundServer {
        server: Arc::new(server),
        addr,
        state: Arc::new(state),
    })
}

impl BoundServer {
    /// Get the bound address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Start the request loop (blocking) until the server is unblocked.
    pub fn run(self) -> Result<()> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.state.config.serve.workers)
            .thread_name(|i| format!("serve-{i}"))
            .panic_handler(|_| log!("serve"; "request handler panicked"))
            .build()
            .context("Failed to create request thread pool")?;

        for request in self.server.incoming_requests() {
            let state = Arc::clone(&self.state);
            pool.spawn(move || {
                if let Err(e) = handle_request(request, &state) {
                    log!("serve"; "request error: {e}");
                }
            });
        }
        Ok(())
    }
}

/// Handle a single HTTP request
fn handle_request(mut request: Request, state: &AppState) -> Result<()> {
    // Early exit if shutdown requested
    if crate::core::is_shutdown() {
        return ApiResponse::unavailable().respond(request);
    }

    let api = match ApiRequest::from_tiny(&mut request, state.config.serve.max_body_bytes) {
        Ok(api) => api,
        Err(ReadError::TooLarge(limit)) => {
            debug!("serve"; "{} {} -> 413", request.method(), request.url());
            return ApiResponse::payload_too_large(limit).respond(request);
        }
        Err(e) => return Err(e.into()),
    };
    let response = router::route(state, &api);
    debug!("serve"; "{} {} -> {}", request.method(), request.url(), response.status);
    response.respond(request)
}
