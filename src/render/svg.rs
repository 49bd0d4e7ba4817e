//! Avatar document composition.

use serde::ser::{Serialize, SerializeMap, Serializer};

use super::{Fragment, RenderContext, background, collapse_whitespace, effect, num, shape, text};
use crate::schema::{Alignment, AvatarConfig, ExportSize};
use crate::utils::xml;

/// A composed avatar before it is wrapped in its root element.
#[derive(Debug, Clone)]
pub struct Composition {
    /// Canvas side in pixels.
    pub size: u32,
    /// Contents of the `<defs>` block.
    pub defs: String,
    /// Drawing elements.
    pub body: String,
}

impl Composition {
    /// Root-less markup: defs followed by the drawing.
    pub fn inner(&self) -> String {
        format!("<defs>{}</defs>{}", self.defs, self.body)
    }
}

fn attr(fragment: Option<&Fragment>) -> &str {
    fragment.map_or("", |f| f.attr.as_str())
}

fn text_anchor(alignment: Alignment, size: f64) -> (f64, &'static str) {
    match alignment {
        Alignment::Left => (size * 0.1, "start"),
        Alignment::Center => (size / 2.0, "middle"),
        Alignment::Right => (size * 0.9, "end"),
    }
}

/// Compose every layer of the avatar described by `config`.
pub fn compose(config: &AvatarConfig, ctx: &mut RenderContext) -> Composition {
    let size = config.pixel_size();
    let side = f64::from(size);
    let typography = &config.typography;

    let label = text::display_text(&config.name, &config.display_mode);
    let font_size = text::calculate_font_size(&label, size, typography);
    let font_family = text::font_family(&typography.font_family);

    let fill = background::render(&config.background, ctx);
    let outline = shape::render(&config.shape, size, ctx);
    let text_fx = effect::text_effects(
        typography.shadow.as_ref(),
        typography.outline.as_ref(),
        ctx,
    );
    let image_fx = effect::image_filters(&config.filters, ctx);

    let mut defs = String::new();
    let parts = [
        Some(&fill),
        Some(&outline.clip),
        outline.glow.as_ref(),
        text_fx.as_ref(),
        image_fx.as_ref(),
    ];
    for fragment in parts.into_iter().flatten() {
        defs.push_str(&fragment.defs);
    }

    let (x, anchor) = text_anchor(typography.alignment, side);

    let body = format!(
        r##"<g {glow}>
             <rect width="100%" height="100%" {fill} {clip} {image_fx}/>
             <path d="{path}" fill="none" {stroke}/>
           </g>
           <text x="{x}" y="{y}"
                 font-family="{font_family}"
                 font-size="{font_size}"
                 font-weight="{weight}"
                 font-style="{style}"
                 text-anchor="{anchor}"
                 dominant-baseline="central"
                 fill="#000000" {text_fx}>{label}</text>"##,
        glow = attr(outline.glow.as_ref()),
        fill = fill.attr,
        clip = outline.clip.attr,
        image_fx = attr(image_fx.as_ref()),
        path = outline.path,
        stroke = outline.stroke,
        x = num(x),
        y = num(side / 2.0),
        font_family = xml::escape(&font_family),
        weight = typography.weight,
        style = typography.style.as_str(),
        text_fx = attr(text_fx.as_ref()),
        label = xml::escape(&label),
    );

    Composition { size, defs, body }
}

/// Generate a standalone SVG avatar.
///
/// The result is a single `<svg>` element with all whitespace runs
/// collapsed to one space.
pub fn generate(config: &AvatarConfig) -> String {
    let mut ctx = RenderContext::for_config(config);
    let composition = compose(config, &mut ctx);
    let size = composition.size;
    collapse_whitespace(&format!(
        r#"<svg width="{size}" height="{size}" viewBox="0 0 {size} {size}"
                xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink">
             {}
           </svg>"#,
        composition.inner()
    ))
}

// ============================================================================
// Favicon sets
// ============================================================================

/// One SVG per canonical size, in ascending size order.
#[derive(Debug, Clone, Default)]
pub struct FaviconSet(Vec<(ExportSize, String)>);

impl FaviconSet {
    pub fn iter(&self) -> impl Iterator<Item = (ExportSize, &str)> {
        self.0.iter().map(|(size, svg)| (*size, svg.as_str()))
    }

    /// JSON object keyed by size label.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

impl Serialize for FaviconSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (size, svg) in &self.0 {
            map.serialize_entry(&size.to_string(), svg)?;
        }
        map.end()
    }
}

/// Generate the avatar once per canonical size.
pub fn generate_favicons(config: &AvatarConfig) -> FaviconSet {
    FaviconSet(
        ExportSize::ALL
            .into_iter()
            .map(|size| (size, generate(&config.with_size(size))))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{
        Border, Color, DisplayKind, Filters, Glow, Gradient, GradientStop, ShapeKind, TextShadow, Texture,
    };

    fn rich_config() -> AvatarConfig {
        let mut config = AvatarConfig::named("Grace Brewster Hopper");
        config.shape.kind = ShapeKind::Hexagon;
        config.shape.border = Some(Border {
            width: 4.0,
            ..Border::default()
        });
        config.shape.glow = Some(Glow {
            enabled: true,
            ..Glow::default()
        });
        config.background.kind = crate::schema::BackgroundKind::Gradient;
        config.background.gradient = Some(Gradient::Linear {
            angle: 0.0,
            stops: vec![
                GradientStop { color: Color::opaque("#ff0000"), position: 0.0 },
                GradientStop { color: Color::opaque("#0000ff"), position: 100.0 },
            ],
        });
        config.typography.shadow = Some(TextShadow {
            enabled: true,
            ..TextShadow::default()
        });
        config.filters = Filters {
            sepia: 40,
            ..Filters::default()
        };
        config
    }

    /// Every `url(#id)` reference must point at an `id="..."` in the document.
    fn assert_references_resolve(svg: &str) {
        for chunk in svg.split("url(#").skip(1) {
            let id = &chunk[..chunk.find(')').unwrap()];
            assert!(svg.contains(&format!(r#"id="{id}""#)), "dangling #{id}");
        }
    }

    #[test]
    fn test_minimal_document() {
        let svg = generate(&AvatarConfig::named("John Doe"));
        assert!(svg.starts_with(r#"<svg width="256" height="256""#));
        assert!(svg.ends_with("</svg>"));
        assert_eq!(svg.matches("<svg").count(), 1);
        assert!(svg.contains(">JD</text>"));
        assert!(svg.contains(r##"fill="#000000""##));
        assert!(!svg.contains("  "));
        assert!(!svg.contains('\n'));
    }

    #[test]
    fn test_defs_never_inside_attributes() {
        let svg = generate(&rich_config());
        assert_eq!(svg.matches("<defs>").count(), 1);
        assert!(!svg.contains("\"<"));
        assert_references_resolve(&svg);
    }

    #[test]
    fn test_ids_unique_within_document() {
        let svg = generate(&rich_config());
        let ids: Vec<&str> = svg
            .split(r#" id=""#)
            .skip(1)
            .map(|s| &s[..s.find('"').unwrap()])
            .collect();
        let mut unique = ids.clone();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(ids.len(), unique.len());
        assert!(ids.len() >= 5);
    }

    #[test]
    fn test_ids_differ_between_documents() {
        let config = rich_config();
        let a = generate(&config);
        let b = generate(&config);
        assert_ne!(a, b);
    }

    #[test]
    fn test_identity_filters_not_emitted() {
        let svg = generate(&AvatarConfig::named("Ada"));
        assert!(!svg.contains("image-filters"));
    }

    #[test]
    fn test_alignment() {
        let mut config = AvatarConfig::named("Ada");
        config.typography.alignment = Alignment::Left;
        let svg = generate(&config);
        assert!(svg.contains(r#"x="25.6""#));
        assert!(svg.contains(r#"text-anchor="start""#));

        config.typography.alignment = Alignment::Right;
        let svg = generate(&config);
        assert!(svg.contains(r#"x="230.4""#));
        assert!(svg.contains(r#"text-anchor="end""#));
    }

    #[test]
    fn test_label_and_family_escaped() {
        let mut config = AvatarConfig::named("<b> & co");
        config.display_mode.kind = DisplayKind::Truncated;
        config.typography.font_family = "Open Sans".into();
        let svg = generate(&config);
        assert!(svg.contains("&lt;b&gt; &amp;</text>"));
        assert!(svg.contains("font-family=\"&quot;Open Sans&quot;"));
    }

    #[test]
    fn test_noise_texture_is_reproducible() {
        let mut config = AvatarConfig::named("Ada");
        config.background.kind = crate::schema::BackgroundKind::Texture;
        config.background.texture = Some(Texture::Noise);
        let strip = |svg: String| {
            svg[svg.find("<circle").unwrap()..svg.find("</pattern>").unwrap()].to_string()
        };
        assert_eq!(strip(generate(&config)), strip(generate(&config)));
    }

    #[test]
    fn test_favicon_sizes() {
        let set = generate_favicons(&AvatarConfig::named("Ada"));
        let sizes: Vec<ExportSize> = set.iter().map(|(size, _)| size).collect();
        assert_eq!(sizes, ExportSize::ALL);
        for (size, svg) in set.iter() {
            let px = size.pixels();
            let expected = format!(r#"<svg width="{px}" height="{px}""#);
            assert!(svg.starts_with(&expected));
        }

        let json: serde_json::Value = serde_json::from_str(&set.to_json()).unwrap();
        let keys: Vec<&String> = json.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["64", "128", "256", "512"]);
    }
}
