//! Background paint: solid fills, gradients, image patterns and textures.

use rand::Rng;
use std::f64::consts::PI;
use std::fmt::Write;

use super::{Fragment, RenderContext, num};
use crate::schema::{BackgroundConfig, BackgroundKind, Color, Gradient, GradientStop, Texture};
use crate::utils::xml;

/// Circles drawn per noise tile.
const NOISE_DOTS: usize = 50;

/// Side of every texture tile.
const TILE: u32 = 20;

/// Paint for the full-bleed background rect.
///
/// Only the payload selected by `kind` is read. A selected payload that is
/// missing paints transparent.
pub fn render(background: &BackgroundConfig, ctx: &mut RenderContext) -> Fragment {
    match background.kind {
        BackgroundKind::Solid => solid_fill(background.color.as_ref()),
        BackgroundKind::Gradient => background
            .gradient
            .as_ref()
            .map_or_else(|| solid_fill(None), |gradient| gradient_fill(gradient, ctx)),
        BackgroundKind::Image => background
            .image_url
            .as_deref()
            .map_or_else(|| solid_fill(None), |url| image_fill(url, ctx)),
        BackgroundKind::Texture => background
            .texture
            .map_or_else(|| solid_fill(None), |texture| texture_fill(texture, ctx)),
    }
}

pub fn solid_fill(color: Option<&Color>) -> Fragment {
    let paint = color.map_or_else(|| "transparent".to_string(), Color::to_paint);
    Fragment::attr(format!(r#"fill="{paint}""#))
}

fn stop_list(stops: &[GradientStop]) -> String {
    stops.iter().fold(String::new(), |mut out, stop| {
        let _ = write!(
            out,
            r#"<stop offset="{}%" stop-color="{}"/>"#,
            num(stop.position),
            stop.color.to_paint()
        );
        out
    })
}

/// Endpoints of a linear gradient running at `angle` degrees, in percent.
pub fn linear_endpoints(angle: f64) -> [f64; 4] {
    let theta = (angle - 90.0) * PI / 180.0;
    let (sin, cos) = theta.sin_cos();
    [50.0 + 50.0 * cos, 50.0 + 50.0 * sin, 50.0 - 50.0 * cos, 50.0 - 50.0 * sin]
}

pub fn gradient_fill(gradient: &Gradient, ctx: &mut RenderContext) -> Fragment {
    let id = ctx.next_id("gradient");
    let stops = stop_list(gradient.stops());

    let defs = match gradient {
        Gradient::Linear { angle, .. } => {
            let [x1, y1, x2, y2] = linear_endpoints(*angle);
            format!(
                r#"<linearGradient id="{id}" x1="{}%" y1="{}%" x2="{}%" y2="{}%">{stops}</linearGradient>"#,
                num(x1),
                num(y1),
                num(x2),
                num(y2)
            )
        }
        Gradient::Radial {
            center_x,
            center_y,
            radius,
            ..
        } => format!(
            r#"<radialGradient id="{id}" cx="{}%" cy="{}%" r="{}%">{stops}</radialGradient>"#,
            num(*center_x),
            num(*center_y),
            num(*radius)
        ),
        // Approximated as radial; the angle has no SVG counterpart.
        Gradient::Conic {
            center_x, center_y, ..
        } => format!(
            r#"<radialGradient id="{id}" cx="{}%" cy="{}%" r="50%">{stops}</radialGradient>"#,
            num(*center_x),
            num(*center_y)
        ),
    };

    Fragment {
        defs,
        attr: format!(r#"fill="url(#{id})""#),
    }
}

pub fn image_fill(url: &str, ctx: &mut RenderContext) -> Fragment {
    let id = ctx.next_id("image-pattern");
    let defs = format!(
        r#"<pattern id="{id}" patternUnits="userSpaceOnUse" width="100%" height="100%">
             <image href="{href}" width="100%" height="100%" preserveAspectRatio="xMidYMid slice"/>
           </pattern>"#,
        href = xml::escape(url)
    );
    Fragment {
        defs,
        attr: format!(r#"fill="url(#{id})""#),
    }
}

pub fn texture_fill(texture: Texture, ctx: &mut RenderContext) -> Fragment {
    let id = ctx.next_id(&format!("texture-{}", texture.as_str()));
    let content = match texture {
        Texture::Dots => r#"<circle cx="10" cy="10" r="2" fill="rgba(0,0,0,0.1)"/>"#.to_string(),
        Texture::Lines => {
            r#"<line x1="0" y1="10" x2="20" y2="10" stroke="rgba(0,0,0,0.1)" stroke-width="1"/>"#
                .to_string()
        }
        Texture::Grid => {
            r#"<path d="M 20 0 L 0 0 0 20" fill="none" stroke="rgba(0,0,0,0.1)" stroke-width="1"/>"#
                .to_string()
        }
        Texture::Noise => noise_dots(ctx),
    };

    Fragment {
        defs: format!(
            r#"<pattern id="{id}" patternUnits="userSpaceOnUse" width="{TILE}" height="{TILE}">{content}</pattern>"#
        ),
        attr: format!(r#"fill="url(#{id})""#),
    }
}

/// Small translucent circles scattered over one tile.
///
/// Draws from the context's seeded generator, so identical configurations
/// yield identical noise.
fn noise_dots(ctx: &mut RenderContext) -> String {
    let rng = ctx.rng();
    let tile = f64::from(TILE);
    (0..NOISE_DOTS).fold(String::new(), |mut out, _| {
        let x: f64 = rng.gen_range(0.0..tile);
        let y: f64 = rng.gen_range(0.0..tile);
        let r: f64 = rng.gen_range(0.0..0.5);
        let a: f64 = rng.gen_range(0.0..0.1);
        let _ = write!(
            out,
            r#"<circle cx="{}" cy="{}" r="{}" fill="rgba(0,0,0,{})"/>"#,
            num(x),
            num(y),
            num(r),
            num(a)
        );
        out
    })
}
