//! Shape outlines, borders and glow.

use std::f64::consts::PI;
use std::fmt::Write;

use super::{Fragment, RenderContext, num};
use crate::schema::{Border, BorderStyle, Glow, GlowKind, ShapeConfig, ShapeKind};

/// Everything the composer needs to draw one shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeFragment {
    /// Outline path data.
    pub path: String,
    /// `<clipPath>` definition and the `clip-path` attribute using it.
    pub clip: Fragment,
    /// Border stroke attributes for the outline element (may be empty).
    pub stroke: String,
    /// Glow filter definition and the `filter` attribute using it.
    pub glow: Option<Fragment>,
}

/// Outline path for a shape inscribed in `width`×`height`.
pub fn shape_path(kind: ShapeKind, radius: f64, width: f64, height: f64) -> String {
    let cx = width / 2.0;
    let cy = height / 2.0;
    let r = width.min(height) / 2.0;

    match kind {
        ShapeKind::Circle => format!(
            "M {} {cy} A {r} {r} 0 1 0 {} {cy} A {r} {r} 0 1 0 {} {cy}",
            num(cx - r),
            num(cx + r),
            num(cx - r),
            cy = num(cy),
            r = num(r),
        ),
        ShapeKind::Square => format!(
            "M 0 0 L {w} 0 L {w} {h} L 0 {h} Z",
            w = num(width),
            h = num(height)
        ),
        ShapeKind::RoundedRectangle => {
            let rr = radius.max(0.0).min(r);
            let (w, h) = (num(width), num(height));
            let (wr, hr, rr) = (num(width - rr), num(height - rr), num(rr));
            format!(
                "M {rr} 0 L {wr} 0 Q {w} 0 {w} {rr} L {w} {hr} Q {w} {h} {wr} {h} \
                 L {rr} {h} Q 0 {h} 0 {hr} L 0 {rr} Q 0 0 {rr} 0 Z"
            )
        }
        ShapeKind::Hexagon => {
            let hr = r * 0.9;
            let points: Vec<String> = (0..6)
                .map(|i| {
                    let angle = f64::from(i) * PI / 3.0;
                    format!("{} {}", num(cx + hr * angle.cos()), num(cy + hr * angle.sin()))
                })
                .collect();
            format!("M {} L {} Z", points[0], points[1..].join(" L "))
        }
    }
}

/// Border stroke attributes; empty when the border has no width.
pub fn stroke_attrs(border: &Border) -> String {
    if border.width <= 0.0 {
        return String::new();
    }
    let mut attrs = format!(
        r#"stroke="{}" stroke-width="{}""#,
        border.color.to_paint(),
        num(border.width)
    );
    match border.style {
        BorderStyle::Solid => attrs.push_str(r#" stroke-dasharray="none""#),
        BorderStyle::Dashed => attrs.push_str(r#" stroke-dasharray="5,5""#),
    }
    attrs
}

/// Glow filter applied to the shape group.
pub fn glow_filter(glow: &Glow, ctx: &mut RenderContext) -> Fragment {
    let id = ctx.next_id("glow");
    let mut defs = String::new();
    let _ = write!(
        defs,
        r#"<filter id="{id}" x="-50%" y="-50%" width="200%" height="200%">
             <feMorphology in="SourceAlpha" operator="dilate" radius="{spread}" result="spread"/>
             <feGaussianBlur in="spread" stdDeviation="{blur}" result="blurred"/>
             <feFlood flood-color="{color}" flood-opacity="{alpha}"/>
             <feComposite in2="blurred" operator="in" result="glow"/>"#,
        spread = num(glow.spread),
        blur = num(glow.blur),
        color = glow.color.hex,
        alpha = num(glow.color.alpha),
    );
    match glow.kind {
        GlowKind::Outer => defs.push_str(
            r#"<feMerge><feMergeNode in="glow"/><feMergeNode in="SourceGraphic"/></feMerge>"#,
        ),
        GlowKind::Inner => {
            defs.push_str(r#"<feComposite in="glow" in2="SourceGraphic" operator="atop"/>"#);
        }
    }
    defs.push_str("</filter>");

    Fragment {
        defs,
        attr: format!(r#"filter="url(#{id})""#),
    }
}

/// Render a shape into its path, clip, stroke and glow parts.
pub fn render(shape: &ShapeConfig, size: u32, ctx: &mut RenderContext) -> ShapeFragment {
    let side = f64::from(size);
    let path = shape_path(shape.kind, shape.radius, side, side);

    let clip_id = ctx.next_id("clip");
    let clip = Fragment {
        defs: format!(r#"<clipPath id="{clip_id}"><path d="{path}"/></clipPath>"#),
        attr: format!(r#"clip-path="url(#{clip_id})""#),
    };

    let stroke = shape.border.as_ref().map(stroke_attrs).unwrap_or_default();
    let glow = shape
        .glow
        .as_ref()
        .filter(|g| g.enabled)
        .map(|g| glow_filter(g, ctx));

    ShapeFragment {
        path,
        clip,
        stroke,
        glow,
    }
}
