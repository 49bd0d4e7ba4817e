//! Path and method dispatch.

use serde_json::json;

use super::request::{ApiRequest, Method};
use super::response::ApiResponse;
use super::state::AppState;
use super::{avatar, image, stats};

/// Route one request to its handler.
pub fn route(state: &AppState, req: &ApiRequest) -> ApiResponse {
    let path = req.path.trim_end_matches('/');
    match (path, req.method) {
        ("/api/avatar", Method::Get) => avatar::get(state, req),
        ("/api/avatar", Method::Post) => avatar::post(state, req),
        ("/api/avatar", Method::Options) => avatar::options(),
        ("/api/avatar/stats", Method::Get) => stats::stats(state, req),
        ("/api/avatar/cache", Method::Delete) => stats::purge(state, req),
        ("/api/avatar/themes", Method::Get) => stats::themes(),
        ("/api/image", Method::Get) => image::get(state, req),
        ("/api/image", Method::Options) => image::options(),
        (
            "/api/avatar" | "/api/avatar/stats" | "/api/avatar/themes" | "/api/avatar/cache"
            | "/api/image",
            _,
        ) => {
            method_not_allowed(path)
        }
        _ => not_found(path),
    }
}

fn not_found(path: &str) -> ApiResponse {
    ApiResponse::json(
        404,
        &json!({ "error": { "code": "NOT_FOUND", "message": format!("No route for {path}") } }),
    )
}

fn method_not_allowed(path: &str) -> ApiResponse {
    ApiResponse::json(
        405,
        &json!({
            "error": {
                "code": "METHOD_NOT_ALLOWED",
                "message": format!("Method not allowed on {path}"),
            }
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    fn state() -> AppState {
        AppState::for_tests(AppConfig::default())
    }

    #[test]
    fn test_unknown_path() {
        let res = route(&state(), &ApiRequest::new(Method::Get, "/nope"));
        assert_eq!(res.status, 404);
        assert_eq!(res.json_body()["error"]["code"], "NOT_FOUND");
    }

    #[test]
    fn test_wrong_method() {
        let state = state();
        let res = route(&state, &ApiRequest::new(Method::Post, "/api/image"));
        assert_eq!(res.status, 405);
        let res = route(&state, &ApiRequest::new(Method::Other, "/api/avatar"));
        assert_eq!(res.status, 405);
        let res = route(&state, &ApiRequest::new(Method::Get, "/api/avatar/cache"));
        assert_eq!(res.status, 405);
    }

    #[test]
    fn test_trailing_slash() {
        let res = route(&state(), &ApiRequest::new(Method::Get, "/api/avatar/themes/"));
        assert_eq!(res.status, 200);
    }

    #[test]
    fn test_dispatch() {
        let state = state();
        let res = route(&state, &ApiRequest::new(Method::Options, "/api/image"));
        assert_eq!(res.header("Access-Control-Allow-Methods"), Some("GET, OPTIONS"));
        let res = route(&state, &ApiRequest::new(Method::Get, "/api/avatar/stats"));
        assert!(res.json_body().get("cache").is_some());
        let res = route(&state, &ApiRequest::new(Method::Get, "/api/avatar?name=Ada"));
        assert_eq!(res.status, 200);
        let res = route(&state, &ApiRequest::new(Method::Delete, "/api/avatar/cache"));
        assert_eq!(res.json_body()["cleared"], 1);
    }
}
