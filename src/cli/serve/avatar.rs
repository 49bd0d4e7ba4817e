//! `/api/avatar`: structured avatar generation.

use base64::{Engine, engine::general_purpose::STANDARD};
use serde::Serialize;
use serde_json::{Map, Value, json};
use std::sync::Arc;

use super::request::ApiRequest;
use super::response::ApiResponse;
use super::state::{AppState, Artifact, ArtifactMetadata};
use crate::{
    cache::generate_key,
    error::AvatarError,
    log,
    render::{self, Output},
    schema::AvatarConfig,
    utils::{date::now_millis, mime},
    validate::validate_request,
};

const CACHE_CONTROL: &str = "public, max-age=86400";

// ============================================================================
// Query parameter mapping
// ============================================================================

/// Leading-integer parse: `"12px"` is 12, `"px"` is nothing.
fn parse_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (sign, digits) = match s.as_bytes().first() {
        Some(b'-') => (-1, &s[1..]),
        Some(b'+') => (1, &s[1..]),
        _ => (1, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}

/// Integer parameter; unparsable input is passed through so validation rejects it.
fn int_param(req: &ApiRequest, key: &str, default: i64) -> Value {
    match req.param(key) {
        None => json!(default),
        Some(raw) => parse_int(raw).map_or_else(|| json!(raw), |n| json!(n)),
    }
}

fn flag(req: &ApiRequest, key: &str) -> bool {
    req.param(key) == Some("true")
}

/// Map the flat GET parameters onto a configuration object.
fn config_from_query(req: &ApiRequest) -> Value {
    let bcolor = req.param("bcolor").unwrap_or("#ffffff");
    let gradient = flag(req, "gradient");

    let mut background = Map::new();
    background.insert("type".into(), json!(if gradient { "gradient" } else { "solid" }));
    background.insert("color".into(), json!({ "hex": bcolor }));
    if gradient {
        background.insert(
            "gradient".into(),
            json!({
                "type": "linear",
                "angle": 0,
                "stops": [
                    { "color": { "hex": bcolor }, "position": 0 },
                    { "color": { "hex": req.param("gradientColor").unwrap_or("#000000") }, "position": 100 },
                ],
            }),
        );
    }

    let mut config = json!({
        "name": req.param("name").unwrap_or("User"),
        "shape": {
            "type": req.param("shape").unwrap_or("circle"),
            "radius": int_param(req, "radius", 0),
        },
        "background": background,
        "typography": {
            "fontFamily": req.param("fontFamily").unwrap_or("Inter"),
            "weight": int_param(req, "fontWeight", 600),
            "style": req.param("fontStyle").unwrap_or("normal"),
            "alignment": req.param("textAlign").unwrap_or("center"),
        },
        "displayMode": { "type": "initials" },
        "export": {
            "format": req.param("format").unwrap_or("svg"),
            "size": req.param("size").unwrap_or("256"),
            "quality": int_param(req, "quality", 90),
            "transparency": flag(req, "transparency"),
        },
        "filters": {
            "grayscale": int_param(req, "grayscale", 0),
            "sepia": int_param(req, "sepia", 0),
            "blur": int_param(req, "blur", 0),
            "brightness": int_param(req, "brightness", 100),
        },
        "generateFavicon": flag(req, "generateFavicon"),
        "generateQR": flag(req, "generateQR"),
    });
    if let Some(data) = req.param("qrData") {
        config["qrData"] = json!(data);
    }
    config
}

// ============================================================================
// Handlers
// ============================================================================

pub fn get(state: &AppState, req: &ApiRequest) -> ApiResponse {
    handle_get(state, req).unwrap_or_else(|err| error_response(state, req, err))
}

pub fn post(state: &AppState, req: &ApiRequest) -> ApiResponse {
    handle_post(state, req).unwrap_or_else(|err| error_response(state, req, err))
}

pub fn options() -> ApiResponse {
    ApiResponse::empty(200)
        .with_header("Access-Control-Allow-Origin", "*")
        .with_header("Access-Control-Allow-Methods", "GET, POST, OPTIONS")
        .with_header("Access-Control-Allow-Headers", "Content-Type, Authorization")
}

fn handle_get(state: &AppState, req: &ApiRequest) -> Result<ApiResponse, AvatarError> {
    let decision = state.limiter.check(&req.client_id());
    if !decision.allowed {
        return Err(AvatarError::rate_limited());
    }

    let config = validate_request(&json!({ "config": config_from_query(req) }))?;
    let (artifact, cached) = lookup_or_generate(state, &config)?;

    let mut response = ApiResponse::new(200, artifact.content_type, artifact.body.clone())
        .with_header("Cache-Control", CACHE_CONTROL)
        .with_header("X-Cache", if cached { "HIT" } else { "MISS" })
        .with_header("X-Rate-Limit-Remaining", decision.remaining.to_string());
    if !cached {
        let metadata = json!({
            "dominantColor": artifact.metadata.dominant_color,
            "contrastRatio": artifact.metadata.contrast_ratio,
        });
        response = response.with_header("X-Metadata", metadata.to_string());
    }
    Ok(response)
}

/// Body of a successful `POST /api/avatar`.
#[derive(Debug, Serialize)]
struct Envelope<'a> {
    success: bool,
    data: String,
    metadata: &'a ArtifactMetadata,
    cached: bool,
}

fn handle_post(state: &AppState, req: &ApiRequest) -> Result<ApiResponse, AvatarError> {
    let decision = state.limiter.check(&req.client_id());
    if !decision.allowed {
        return Err(AvatarError::rate_limited());
    }

    let body: Value = serde_json::from_slice(&req.body).map_err(|e| {
        AvatarError::validation(
            "Invalid request body",
            vec![crate::validate::ValidationIssue::new("body", e.to_string())],
        )
    })?;
    let config = validate_request(&body)?;
    let (artifact, cached) = lookup_or_generate(state, &config)?;

    let envelope = Envelope {
        success: true,
        data: envelope_data(&artifact),
        metadata: &artifact.metadata,
        cached,
    };
    Ok(ApiResponse::json(200, &envelope))
}

/// Text artifacts are inlined; raster bytes become a base64 data URL.
fn envelope_data(artifact: &Artifact) -> String {
    match artifact.content_type {
        mime::types::SVG | mime::types::JSON => String::from_utf8_lossy(&artifact.body).into_owned(),
        content_type => format!("data:{content_type};base64,{}", STANDARD.encode(&artifact.body)),
    }
}

/// Serve from cache, or generate and store.
fn lookup_or_generate(
    state: &AppState,
    config: &AvatarConfig,
) -> Result<(Arc<Artifact>, bool), AvatarError> {
    let key = generate_key(config);
    if let Some(artifact) = state.cache.get(&key) {
        crate::debug!("cache"; "hit {}", key);
        return Ok((artifact, true));
    }

    let output: Output = render::produce(config, &state.rasterizer)?;
    let artifact = Arc::new(Artifact {
        content_type: output.content_type(),
        body: output.into_bytes(),
        metadata: ArtifactMetadata::describe(config, &key),
    });
    state.cache.set(key, Arc::clone(&artifact));
    Ok((artifact, false))
}

/// Client-facing errors pass through; the rest collapse to a processing error.
fn error_response(state: &AppState, req: &ApiRequest, err: AvatarError) -> ApiResponse {
    if matches!(err, AvatarError::RateLimit(_)) {
        return rate_limited(state, &req.client_id(), &err);
    }
    if err.is_client_facing() {
        return ApiResponse::json(err.status(), &err.to_body());
    }
    log!("error"; "avatar generation failed: {}", err);
    let err = AvatarError::processing("Failed to generate avatar");
    ApiResponse::json(err.status(), &err.to_body())
}

/// 429 carrying the caller's quota and the seconds until its window closes.
fn rate_limited(state: &AppState, id: &str, err: &AvatarError) -> ApiResponse {
    let retry_after = state
        .limiter
        .reset_time(id)
        .map_or(0, |reset| reset.saturating_sub(now_millis()).div_ceil(1000));
    ApiResponse::json(err.status(), &err.to_body())
        .with_header("Retry-After", retry_after.to_string())
        .with_header(
            "X-Rate-Limit-Remaining",
            state.limiter.remaining_requests(id).to_string(),
        )
}
