//! Validation of structured avatar configurations.

use serde::Deserialize;
use serde_json::Value;

use super::fields::check_fields;
use super::{Diagnostics, ValidationIssue};
use crate::error::AvatarError;
use crate::schema::{AvatarConfig, Color, Gradient, is_valid_hex};

/// Validate an untrusted configuration object.
pub fn validate_config(value: &Value) -> Result<AvatarConfig, AvatarError> {
    const MESSAGE: &str = "Invalid configuration";

    let mut diag = Diagnostics::new();
    let config = decode_config(value, &mut diag, "config");
    finish(config, diag, MESSAGE)
}

/// Validate a `{config, apiKey?, cacheKey?}` envelope.
///
/// `apiKey` and `cacheKey` are type-checked and otherwise ignored; there is
/// no authentication and cache keys are always derived.
pub fn validate_request(value: &Value) -> Result<AvatarConfig, AvatarError> {
    const MESSAGE: &str = "Invalid request body";

    let Some(config) = value.get("config").filter(|c| !c.is_null()) else {
        return Err(AvatarError::validation(
            MESSAGE,
            vec![ValidationIssue::new("config", "required")],
        ));
    };

    let mut diag = Diagnostics::new();
    for key in ["apiKey", "cacheKey"] {
        if value.get(key).is_some_and(|v| !v.is_null() && !v.is_string()) {
            diag.error(key, "expected a string");
        }
    }
    let config = decode_config(config, &mut diag, "config");
    finish(config, diag, MESSAGE)
}

/// Type-check field by field, then decode what survived and range-check it.
fn decode_config(value: &Value, diag: &mut Diagnostics, root: &str) -> Option<AvatarConfig> {
    let mut walked = value.clone();
    if !check_fields(diag, &mut walked, root) {
        return None;
    }
    match AvatarConfig::deserialize(&walked) {
        Ok(config) => {
            check(&config, diag);
            Some(config)
        }
        Err(e) => {
            if diag.is_empty() {
                diag.error(root, e.to_string());
            }
            None
        }
    }
}

fn finish(
    config: Option<AvatarConfig>,
    diag: Diagnostics,
    message: &str,
) -> Result<AvatarConfig, AvatarError> {
    match (config, diag.into_result()) {
        (Some(config), Ok(())) => Ok(config),
        (_, Err(issues)) => Err(AvatarError::validation(message, issues)),
        (None, Ok(())) => Err(AvatarError::validation(message, Vec::new())),
    }
}

fn check(config: &AvatarConfig, diag: &mut Diagnostics) {
    let name_len = config.name.chars().count();
    if name_len == 0 {
        diag.error("name", "must not be empty");
    } else if name_len > 100 {
        diag.error("name", format!("must be at most 100 characters (got {name_len})"));
    }

    // shape
    let shape = &config.shape;
    diag.range("shape.radius", shape.radius, 0.0, 50.0);
    if let Some(border) = &shape.border {
        diag.range("shape.border.width", border.width, 0.0, 10.0);
        check_color(diag, "shape.border.color", &border.color);
    }
    if let Some(glow) = &shape.glow {
        diag.range("shape.glow.blur", glow.blur, 0.0, 20.0);
        diag.range("shape.glow.spread", glow.spread, 0.0, 10.0);
        check_color(diag, "shape.glow.color", &glow.color);
    }

    // background
    let background = &config.background;
    if let Some(color) = &background.color {
        check_color(diag, "background.color", color);
    }
    if let Some(gradient) = &background.gradient {
        check_gradient(diag, gradient);
    }
    if let Some(url) = &background.image_url
        && url::Url::parse(url).is_err()
    {
        diag.error("background.imageUrl", "must be an absolute URL");
    }

    // typography
    let typography = &config.typography;
    diag.range("typography.weight", typography.weight, 300, 900);
    if typography.weight % 100 != 0 {
        diag.error("typography.weight", "must be a multiple of 100");
    }
    if let Some(shadow) = &typography.shadow {
        diag.range("typography.shadow.offsetX", shadow.offset_x, -20.0, 20.0);
        diag.range("typography.shadow.offsetY", shadow.offset_y, -20.0, 20.0);
        diag.range("typography.shadow.blur", shadow.blur, 0.0, 20.0);
        check_color(diag, "typography.shadow.color", &shadow.color);
    }
    if let Some(outline) = &typography.outline {
        diag.range("typography.outline.width", outline.width, 0.0, 10.0);
        check_color(diag, "typography.outline.color", &outline.color);
    }

    diag.range("displayMode.maxWords", config.display_mode.max_words, 1, 3);
    diag.range("export.quality", config.export.quality, 0, 100);

    let filters = &config.filters;
    diag.range("filters.grayscale", filters.grayscale, 0, 100);
    diag.range("filters.sepia", filters.sepia, 0, 100);
    diag.range("filters.blur", filters.blur, 0, 10);
    diag.range("filters.brightness", filters.brightness, 0, 200);
}

fn check_color(diag: &mut Diagnostics, path: &str, color: &Color) {
    if !is_valid_hex(&color.hex) {
        diag.error(
            format!("{path}.hex"),
            format!("must be a hex color like #RRGGBB or #RGB (got {:?})", color.hex),
        );
    }
    diag.range(&format!("{path}.alpha"), color.alpha, 0.0, 1.0);
}

fn check_gradient(diag: &mut Diagnostics, gradient: &Gradient) {
    const PATH: &str = "background.gradient";

    match gradient {
        Gradient::Linear { angle, .. } => {
            diag.range(&format!("{PATH}.angle"), *angle, 0.0, 360.0);
        }
        Gradient::Radial {
            center_x,
            center_y,
            radius,
            ..
        } => {
            diag.range(&format!("{PATH}.centerX"), *center_x, 0.0, 100.0);
            diag.range(&format!("{PATH}.centerY"), *center_y, 0.0, 100.0);
            diag.range(&format!("{PATH}.radius"), *radius, 0.0, 100.0);
        }
        Gradient::Conic {
            center_x,
            center_y,
            angle,
            ..
        } => {
            diag.range(&format!("{PATH}.centerX"), *center_x, 0.0, 100.0);
            diag.range(&format!("{PATH}.centerY"), *center_y, 0.0, 100.0);
            diag.range(&format!("{PATH}.angle"), *angle, 0.0, 360.0);
        }
    }

    let stops = gradient.stops();
    if !(2..=5).contains(&stops.len()) {
        diag.error(
            format!("{PATH}.stops"),
            format!("must contain 2 to 5 stops (got {})", stops.len()),
        );
    }
    for (i, stop) in stops.iter().enumerate() {
        diag.range(&format!("{PATH}.stops.{i}.position"), stop.position, 0.0, 100.0);
        check_color(diag, &format!("{PATH}.stops.{i}.color"), &stop.color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ExportSize, ShapeKind};
    use serde_json::json;

    fn issues(err: AvatarError) -> Vec<ValidationIssue> {
        match err {
            AvatarError::Validation { issues, .. } => issues,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_minimal_config() {
        let config = validate_config(&json!({"name": "Grace Hopper"})).unwrap();
        assert_eq!(config.name, "Grace Hopper");
        assert_eq!(config.shape.kind, ShapeKind::Circle);
        assert_eq!(config.export.size, ExportSize::S256);
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let config =
            validate_config(&json!({"name": "A", "favouriteColor": "teal", "shape": {"sides": 7}}))
                .unwrap();
        assert_eq!(config.name, "A");
    }

    #[test]
    fn test_missing_name_rejected() {
        let issues = issues(validate_config(&json!({})).unwrap_err());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].path, "name");
        assert_eq!(issues[0].message, "required");
    }

    #[test]
    fn test_empty_and_long_names() {
        assert!(validate_config(&json!({"name": ""})).is_err());
        let long = "x".repeat(101);
        assert!(validate_config(&json!({ "name": long })).is_err());
        let max = "x".repeat(100);
        assert!(validate_config(&json!({ "name": max })).is_ok());
    }

    #[test]
    fn test_collects_all_range_issues() {
        let err = validate_config(&json!({
            "name": "A",
            "shape": {"radius": 80},
            "typography": {"weight": 950},
            "filters": {"blur": 11, "brightness": 250},
            "export": {"quality": 101}
        }))
        .unwrap_err();
        let paths: Vec<_> = issues(err).into_iter().map(|i| i.path).collect();
        for expected in [
            "shape.radius",
            "typography.weight",
            "filters.blur",
            "filters.brightness",
            "export.quality",
        ] {
            assert!(paths.iter().any(|p| p == expected), "missing {expected}: {paths:?}");
        }
    }

    #[test]
    fn test_weight_step() {
        let err = validate_config(&json!({"name": "A", "typography": {"weight": 450}})).unwrap_err();
        assert_eq!(issues(err)[0].path, "typography.weight");
        assert!(validate_config(&json!({"name": "A", "typography": {"weight": 300}})).is_ok());
    }

    #[test]
    fn test_bad_hex() {
        let err = validate_config(&json!({
            "name": "A",
            "background": {"type": "solid", "color": {"hex": "red"}}
        }))
        .unwrap_err();
        assert_eq!(issues(err)[0].path, "background.color.hex");
    }

    #[test]
    fn test_enum_out_of_set() {
        let err = validate_config(&json!({"name": "A", "shape": {"type": "star"}})).unwrap_err();
        assert_eq!(err.code(), "VALIDATION_ERROR");
        let issues = issues(err);
        assert_eq!(issues[0].path, "shape.type");
        assert!(issues[0].message.contains("star"));
    }

    #[test]
    fn test_type_and_range_issues_reported_together() {
        let err = validate_config(&json!({
            "name": "A",
            "shape": {"type": "star"},
            "filters": {"blur": 99}
        }))
        .unwrap_err();
        let paths: Vec<_> = issues(err).into_iter().map(|i| i.path).collect();
        assert_eq!(paths, ["shape.type", "filters.blur"]);
    }

    #[test]
    fn test_missing_name_still_range_checks() {
        let err = validate_config(&json!({"export": {"quality": 500}})).unwrap_err();
        let paths: Vec<_> = issues(err).into_iter().map(|i| i.path).collect();
        assert_eq!(paths, ["name", "export.quality"]);
    }

    #[test]
    fn test_gradient_stop_count() {
        let one_stop = json!({
            "name": "A",
            "background": {
                "type": "gradient",
                "gradient": {"type": "linear", "angle": 45,
                    "stops": [{"color": {"hex": "#000"}, "position": 0}]}
            }
        });
        let err = validate_config(&one_stop).unwrap_err();
        assert_eq!(issues(err)[0].path, "background.gradient.stops");
    }

    #[test]
    fn test_image_url_must_be_absolute() {
        let cfg = json!({"name": "A", "background": {"type": "image", "imageUrl": "not a url"}});
        assert!(validate_config(&cfg).is_err());
        let cfg = json!({"name": "A", "background": {"type": "image", "imageUrl": "https://x.test/a.png"}});
        assert!(validate_config(&cfg).is_ok());
    }

    #[test]
    fn test_request_envelope() {
        let config =
            validate_request(&json!({"config": {"name": "A"}, "apiKey": "k", "cacheKey": null}))
                .unwrap();
        assert_eq!(config.name, "A");

        let err = validate_request(&json!({"name": "A"})).unwrap_err();
        assert_eq!(issues(err)[0].path, "config");

        let err = validate_request(&json!({"config": {"name": 7}, "apiKey": 1})).unwrap_err();
        let paths: Vec<_> = issues(err).into_iter().map(|i| i.path).collect();
        assert_eq!(paths, ["apiKey", "name"]);
    }
}
