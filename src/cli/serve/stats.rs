//! Introspection and housekeeping: `/api/avatar/stats`, `/api/avatar/themes`
//! and `/api/avatar/cache`.

use serde_json::{Map, json};

use super::request::ApiRequest;
use super::response::ApiResponse;
use super::state::AppState;
use crate::{debug, schema::color_themes, utils::date::DateTimeUtc};

/// Cache and limiter counters; `?key=` also reports whether that artifact is cached.
pub fn stats(state: &AppState, req: &ApiRequest) -> ApiResponse {
    let mut body = json!({
        "cache": state.cache.stats(),
        "rateLimit": state.limiter.stats(),
        "timestamp": DateTimeUtc::now().to_rfc3339(),
    });
    if let Some(key) = req.param("key") {
        body["entry"] = json!({ "key": key, "cached": state.cache.has(key) });
    }
    ApiResponse::json(200, &body)
}

/// Drop the artifact named by `?key=`, or every cached artifact.
pub fn purge(state: &AppState, req: &ApiRequest) -> ApiResponse {
    let body = match req.param("key") {
        Some(key) => json!({ "key": key, "deleted": state.cache.delete(key) }),
        None => {
            let cleared = state.cache.stats().total;
            state.cache.clear();
            debug!("cache"; "cleared {} entries", cleared);
            json!({ "cleared": cleared })
        }
    };
    ApiResponse::json(200, &body)
}

pub fn themes() -> ApiResponse {
    let themes: Map<_, _> = color_themes()
        .into_iter()
        .map(|(name, colors)| (name.to_string(), json!(colors)))
        .collect();
    ApiResponse::json(200, &themes)
}
