//! Flat initials image for the legacy parameter set.

use super::{RenderContext, Rasterizer, collapse_whitespace, num};
use crate::error::AvatarError;
use crate::schema::{ExportFormat, ImageType, ValidatedImageParams};
use crate::utils::{mime, xml};

/// Gradient rotation for a CSS-like direction keyword.
pub fn gradient_rotation(direction: &str) -> u16 {
    match direction {
        "to right" => 0,
        "to left" => 180,
        "to top" => 270,
        _ => 90,
    }
}

/// Initials over a solid or two-stop gradient rounded rectangle.
#[allow(clippy::cast_precision_loss)] // Dimensions are small user-supplied integers
pub fn initials_svg(params: &ValidatedImageParams) -> String {
    let font_size = params.width.min(params.height) as f64 * 0.4;

    let (defs, fill) = if params.gradient {
        let id = RenderContext::new(0).next_id("grad");
        let defs = format!(
            r#"<defs>
                 <linearGradient id="{id}" gradientTransform="rotate({rotation})">
                   <stop offset="0%" stop-color="{from}" stop-opacity="1"/>
                   <stop offset="100%" stop-color="{to}" stop-opacity="0.8"/>
                 </linearGradient>
               </defs>"#,
            rotation = gradient_rotation(&params.gradient_direction),
            from = params.bcolor,
            to = params.gradient_color,
        );
        (defs, format!("url(#{id})"))
    } else {
        (String::new(), params.bcolor.clone())
    };

    collapse_whitespace(&format!(
        r#"<svg width="{w}" height="{h}" xmlns="http://www.w3.org/2000/svg">
             {defs}
             <rect width="100%" height="100%" fill="{fill}" rx="{r}" ry="{r}"/>
             <text x="50%" y="50%"
                   font-family="Arial, sans-serif"
                   font-size="{font_size}"
                   font-weight="bold"
                   fill="{color}"
                   text-anchor="middle"
                   dominant-baseline="central">{initials}</text>
           </svg>"#,
        w = params.width,
        h = params.height,
        r = params.radius,
        font_size = num(font_size),
        color = params.color,
        initials = xml::escape(&params.initials),
    ))
}

/// Encode the initials image in the requested type.
pub fn generate_initials_image(
    params: &ValidatedImageParams,
    rasterizer: &Rasterizer,
) -> Result<(Vec<u8>, &'static str), AvatarError> {
    let svg = initials_svg(params);
    match params.image_type {
        ImageType::Svg => Ok((svg.into_bytes(), mime::types::SVG)),
        ImageType::Png => {
            let bytes = rasterizer.encode(&svg, ExportFormat::Png, 100, false)?;
            Ok((bytes, mime::types::PNG))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> ValidatedImageParams {
        ValidatedImageParams {
            name: "John Doe".into(),
            width: 100,
            height: 80,
            color: "#FFFFFF".into(),
            bcolor: "#0000FF".into(),
            initials: "JD".into(),
            radius: 12,
            gradient: false,
            gradient_direction: "to bottom".into(),
            gradient_color: "#FF0000".into(),
            image_type: ImageType::Svg,
        }
    }

    #[test]
    fn test_solid_initials() {
        let svg = initials_svg(&params());
        assert!(svg.starts_with(r#"<svg width="100" height="80""#));
        assert!(svg.contains(r##"<rect width="100%" height="100%" fill="#0000FF" rx="12" ry="12"/>"##));
        assert!(svg.contains(r#"font-size="32""#));
        assert!(svg.contains(">JD</text>"));
        assert!(!svg.contains("<defs>"));
    }

    #[test]
    fn test_gradient_initials() {
        let mut p = params();
        p.gradient = true;
        p.gradient_direction = "to left".into();
        let svg = initials_svg(&p);
        assert!(svg.contains("rotate(180)"));
        assert!(svg.contains(r#"stop-opacity="0.8""#));
        assert!(svg.contains(r#"fill="url(#grad-"#));
    }

    #[test]
    fn test_rotation_table() {
        assert_eq!(gradient_rotation("to right"), 0);
        assert_eq!(gradient_rotation("to left"), 180);
        assert_eq!(gradient_rotation("to top"), 270);
        assert_eq!(gradient_rotation("to bottom"), 90);
        assert_eq!(gradient_rotation("diagonal"), 90);
    }

    #[test]
    fn test_svg_type_passthrough() {
        let rasterizer = Rasterizer::without_fonts();
        let (bytes, content_type) = generate_initials_image(&params(), &rasterizer).unwrap();
        assert_eq!(content_type, "image/svg+xml");
        assert!(bytes.starts_with(b"<svg"));
    }
}
