//! `/api/image`: the flat, legacy initials endpoint.

use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use serde_json::json;

use super::request::ApiRequest;
use super::response::ApiResponse;
use super::state::AppState;
use crate::{
    log,
    render::legacy::generate_initials_image,
    schema::ImageParams,
    validate::validate_image_params,
};

/// Numeric parameter; anything unparsable becomes NaN.
fn number(req: &ApiRequest, key: &str) -> Option<f64> {
    req.param(key)
        .map(|raw| raw.trim().parse::<f64>().unwrap_or(f64::NAN))
}

fn params_from_query(req: &ApiRequest) -> ImageParams {
    ImageParams {
        name: Some(req.param("name").unwrap_or_default().to_string()),
        width: number(req, "width"),
        height: number(req, "height"),
        color: req.param("color").map(str::to_string),
        bcolor: req.param("bcolor").map(str::to_string),
        radius: number(req, "radius"),
        gradient: req.param("gradient") == Some("true"),
        gradient_direction: req.param("gradientDirection").map(str::to_string),
        gradient_color: req.param("gradientColor").map(str::to_string),
        image_type: Some(req.param("imageType").unwrap_or("svg").to_string()),
    }
}

pub fn get(state: &AppState, req: &ApiRequest) -> ApiResponse {
    let params = match validate_image_params(&params_from_query(req)) {
        Ok(params) => params,
        Err(errors) => {
            return ApiResponse::json(
                400,
                &json!({ "error": "Invalid parameters", "details": errors.join(", ") }),
            );
        }
    };

    match generate_initials_image(&params, &state.rasterizer) {
        Ok((body, content_type)) => {
            let disposition = format!(
                "inline; filename=\"initials-{}.{}\"",
                utf8_percent_encode(&params.initials, NON_ALPHANUMERIC),
                params.image_type.extension()
            );
            ApiResponse::new(200, content_type, body)
                .with_header("Cache-Control", "public, max-age=31536000, immutable")
                .with_header("Content-Disposition", disposition)
                .with_header("Access-Control-Allow-Origin", "*")
        }
        Err(e) => {
            log!("error"; "image generation failed: {}", e);
            ApiResponse::json(
                500,
                &json!({ "error": "Internal server error", "details": "Failed to generate image" }),
            )
        }
    }
}

pub fn options() -> ApiResponse {
    ApiResponse::empty(200)
        .with_header("Access-Control-Allow-Origin", "*")
        .with_header("Access-Control-Allow-Methods", "GET, OPTIONS")
        .with_header("Access-Control-Allow-Headers", "Content-Type")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::serve::request::Method;
    use crate::config::AppConfig;

    fn request(query: &str) -> ApiRequest {
        ApiRequest::new(Method::Get, &format!("/api/image?{query}"))
    }

    #[test]
    fn test_svg_by_default() {
        let state = AppState::for_tests(AppConfig::default());
        let res = get(&state, &request("name=John+Doe&bcolor=%230000FF"));
        assert_eq!(res.status, 200);
        assert_eq!(res.header("Content-Type"), Some("image/svg+xml"));
        assert_eq!(
            res.header("Content-Disposition"),
            Some("inline; filename=\"initials-JD.svg\"")
        );
        assert_eq!(
            res.header("Cache-Control"),
            Some("public, max-age=31536000, immutable")
        );
        assert_eq!(res.header("Access-Control-Allow-Origin"), Some("*"));
        let svg = String::from_utf8_lossy(&res.body);
        assert!(svg.contains(r##"fill="#0000FF""##));
        assert!(svg.contains(">JD</text>"));
    }

    #[test]
    fn test_explicit_size_and_color() {
        let state = AppState::for_tests(AppConfig::default());
        let res = get(&state, &request("name=Ada+Lovelace&width=300&height=300&color=%23FF0000"));
        assert_eq!(res.status, 200);
        assert_eq!(res.header("Content-Type"), Some("image/svg+xml"));
        assert_eq!(
            res.header("Content-Disposition"),
            Some("inline; filename=\"initials-AL.svg\"")
        );
        assert_eq!(
            res.header("Cache-Control"),
            Some("public, max-age=31536000, immutable")
        );
        assert_eq!(res.header("Access-Control-Allow-Origin"), Some("*"));

        let svg = String::from_utf8_lossy(&res.body);
        assert!(svg.starts_with(r#"<svg width="300" height="300""#));
        assert!(svg.contains(r##"<rect width="100%" height="100%" fill="#FFFFFF" rx="0" ry="0"/>"##));
        assert!(svg.contains(r#"font-size="120""#));
        assert!(svg.contains(r##"fill="#FF0000" text-anchor="middle""##));
        assert!(svg.contains(">AL</text>"));
    }

    #[test]
    fn test_zero_width_defaults() {
        let state = AppState::for_tests(AppConfig::default());
        let res = get(&state, &request("name=Ada&width=0&height=0"));
        let svg = String::from_utf8_lossy(&res.body);
        assert!(svg.starts_with(r#"<svg width="200" height="200""#));
    }

    #[test]
    fn test_missing_name() {
        let state = AppState::for_tests(AppConfig::default());
        let res = get(&state, &request("color=red"));
        assert_eq!(res.status, 400);
        let body = res.json_body();
        assert_eq!(body["error"], "Invalid parameters");
        let details = body["details"].as_str().unwrap();
        assert!(details.contains("Name cannot be empty"));
        assert!(details.contains("Text color must be a valid hex color"));
    }

    #[test]
    fn test_bad_image_type() {
        let state = AppState::for_tests(AppConfig::default());
        let res = get(&state, &request("name=A&imageType=gif"));
        assert_eq!(res.status, 400);
        assert!(res.json_body()["details"].as_str().unwrap().contains("svg or png"));
    }

    #[test]
    fn test_png_without_fonts_is_internal_error() {
        let state = AppState::for_tests(AppConfig::default());
        let res = get(&state, &request("name=A&imageType=png"));
        assert_eq!(res.status, 500);
        assert_eq!(res.json_body()["details"], "Failed to generate image");
    }

    #[test]
    fn test_non_numeric_radius() {
        let params = params_from_query(&request("name=A&radius=big"));
        assert!(params.radius.is_some_and(f64::is_nan));
        let state = AppState::for_tests(AppConfig::default());
        assert_eq!(get(&state, &request("name=A&radius=big")).status, 400);
    }

    #[test]
    fn test_non_ascii_initials_are_encoded() {
        let state = AppState::for_tests(AppConfig::default());
        let res = get(&state, &request("name=%C3%89mile+Zola"));
        assert_eq!(
            res.header("Content-Disposition"),
            Some("inline; filename=\"initials-%C3%89Z.svg\"")
        );
    }
}
