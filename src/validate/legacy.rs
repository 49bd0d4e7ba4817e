//! Validation of the legacy flat parameter set.
//!
//! Width and height are defaulted but deliberately not range-checked.

use crate::render::text::extract_initials;
use crate::schema::{ImageParams, ImageType, ValidatedImageParams, is_valid_hex};

const DEFAULT_DIMENSION: f64 = 200.0;

/// Validate legacy parameters, returning every problem found.
#[allow(clippy::cast_possible_truncation)] // Dimensions are rounded user input
pub fn validate_image_params(params: &ImageParams) -> Result<ValidatedImageParams, Vec<String>> {
    let mut errors = Vec::new();

    let name = params.name.as_deref().map(str::trim).unwrap_or_default();
    if params.name.is_none() {
        errors.push("Name is required and must be a string".to_string());
    }
    if name.is_empty() {
        errors.push("Name cannot be empty".to_string());
    }

    // Zero and unparsable values take the default
    let dimension = |v: Option<f64>| {
        v.filter(|d| d.is_finite() && *d != 0.0)
            .unwrap_or(DEFAULT_DIMENSION)
    };
    let width = dimension(params.width);
    let height = dimension(params.height);

    let color = params.color.clone().unwrap_or_else(|| "#000000".to_string());
    let bcolor = params.bcolor.clone().unwrap_or_else(|| "#FFFFFF".to_string());
    if !is_valid_hex(&color) {
        errors.push("Text color must be a valid hex color (e.g., #000000)".to_string());
    }
    if !is_valid_hex(&bcolor) {
        errors.push("Background color must be a valid hex color (e.g., #FFFFFF)".to_string());
    }

    let radius = params.radius.unwrap_or(0.0);
    if !(0.0..=50.0).contains(&radius) {
        errors.push("Radius must be a number between 0 and 50".to_string());
    }

    let gradient = params.gradient;
    let gradient_direction = params
        .gradient_direction
        .clone()
        .unwrap_or_else(|| "to bottom".to_string());
    let gradient_color = params.gradient_color.clone().unwrap_or_else(|| color.clone());
    if gradient && !is_valid_hex(&gradient_color) {
        errors.push("Gradient color must be a valid hex color (e.g., #FF0000)".to_string());
    }

    let image_type = match params.image_type.as_deref() {
        None => ImageType::Png,
        Some(raw) => ImageType::parse(raw).unwrap_or_else(|| {
            errors.push("Image type must be either svg or png".to_string());
            ImageType::Png
        }),
    };

    if !errors.is_empty() {
        return Err(errors);
    }

    let initials = extract_initials(name);
    if initials.is_empty() {
        return Err(vec![
            "Unable to extract initials from the provided name".to_string(),
        ]);
    }

    Ok(ValidatedImageParams {
        name: name.to_string(),
        width: width.round() as i64,
        height: height.round() as i64,
        color,
        bcolor,
        initials,
        radius: radius.round() as i64,
        gradient,
        gradient_direction,
        gradient_color,
        image_type,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(name: &str) -> ImageParams {
        ImageParams {
            name: Some(name.to_string()),
            ..ImageParams::default()
        }
    }

    #[test]
    fn test_defaults() {
        let v = validate_image_params(&params("  John Doe ")).unwrap();
        assert_eq!(v.name, "John Doe");
        assert_eq!(v.initials, "JD");
        assert_eq!((v.width, v.height), (200, 200));
        assert_eq!(v.color, "#000000");
        assert_eq!(v.bcolor, "#FFFFFF");
        assert_eq!(v.gradient_direction, "to bottom");
        assert_eq!(v.gradient_color, "#000000");
        assert_eq!(v.image_type, ImageType::Png);
    }

    #[test]
    fn test_dimensions_not_range_checked() {
        let mut p = params("Ada");
        p.width = Some(100_000.4);
        p.height = Some(-3.0);
        let v = validate_image_params(&p).unwrap();
        assert_eq!((v.width, v.height), (100_000, -3));
    }

    #[test]
    fn test_zero_or_nan_dimension_defaults() {
        let mut p = params("Ada");
        p.width = Some(0.0);
        p.height = Some(f64::NAN);
        let v = validate_image_params(&p).unwrap();
        assert_eq!((v.width, v.height), (200, 200));

        p.height = Some(-0.0);
        assert_eq!(validate_image_params(&p).unwrap().height, 200);
    }

    #[test]
    fn test_empty_name() {
        let errors = validate_image_params(&params("   ")).unwrap_err();
        assert_eq!(errors, vec!["Name cannot be empty".to_string()]);

        let errors = validate_image_params(&ImageParams::default()).unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_collects_color_and_radius_errors() {
        let mut p = params("Ada");
        p.color = Some("black".into());
        p.bcolor = Some("#12345".into());
        p.radius = Some(60.0);
        let errors = validate_image_params(&p).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_nan_radius_rejected() {
        let mut p = params("Ada");
        p.radius = Some(f64::NAN);
        assert!(validate_image_params(&p).is_err());
    }

    #[test]
    fn test_gradient_color_checked_only_with_gradient() {
        let mut p = params("Ada");
        p.gradient_color = Some("nope".into());
        assert!(validate_image_params(&p).is_ok());
        p.gradient = true;
        assert!(validate_image_params(&p).is_err());
    }
}
