//! Hex + alpha colors and WCAG contrast math.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Accepted hex notation: `#RGB` or `#RRGGBB`.
static HEX_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#([A-Fa-f0-9]{6}|[A-Fa-f0-9]{3})$").unwrap());

/// Check a string against the accepted hex notation.
pub fn is_valid_hex(s: &str) -> bool {
    HEX_COLOR.is_match(s)
}

const fn default_alpha() -> f64 {
    1.0
}

/// A color as supplied by callers: hex plus optional alpha.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub hex: String,
    #[serde(default = "default_alpha")]
    pub alpha: f64,
}

impl Color {
    pub fn new(hex: impl Into<String>, alpha: f64) -> Self {
        Self {
            hex: hex.into(),
            alpha,
        }
    }

    pub fn opaque(hex: impl Into<String>) -> Self {
        Self::new(hex, 1.0)
    }

    /// RGB channels; `#RGB` is expanded, malformed input reads as black.
    pub fn rgb(&self) -> [u8; 3] {
        hex_to_rgb(&self.hex)
    }

    /// Paint value for SVG attributes.
    ///
    /// Bare hex when opaque, `rgba(r, g, b, a)` otherwise.
    pub fn to_paint(&self) -> String {
        if self.alpha < 1.0 {
            let [r, g, b] = self.rgb();
            format!("rgba({r}, {g}, {b}, {})", self.alpha)
        } else {
            self.hex.clone()
        }
    }
}

/// Parse `#RGB` / `#RRGGBB` (leading `#` optional) into channels.
///
/// Anything unparseable yields black, matching how contrast is computed
/// for missing colors.
pub fn hex_to_rgb(hex: &str) -> [u8; 3] {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    let expanded: String = match digits.len() {
        3 => digits.chars().flat_map(|c| [c, c]).collect(),
        6 => digits.to_string(),
        _ => return [0, 0, 0],
    };
    let channel = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).ok();
    match (channel(0), channel(2), channel(4)) {
        (Some(r), Some(g), Some(b)) => [r, g, b],
        _ => [0, 0, 0],
    }
}

/// WCAG relative luminance in `[0, 1]`.
fn relative_luminance(r: u8, g: u8, b: u8) -> f64 {
    let linear = |c: u8| {
        let c = f64::from(c) / 255.0;
        if c <= 0.03928 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    0.2126 * linear(r) + 0.7152 * linear(g) + 0.0722 * linear(b)
}

/// WCAG contrast ratio between two hex colors, in `[1, 21]`.
pub fn contrast_ratio(a: &str, b: &str) -> f64 {
    let [r1, g1, b1] = hex_to_rgb(a);
    let [r2, g2, b2] = hex_to_rgb(b);
    let l1 = relative_luminance(r1, g1, b1);
    let l2 = relative_luminance(r2, g2, b2);
    let (lighter, darker) = if l1 >= l2 { (l1, l2) } else { (l2, l1) };
    (lighter + 0.05) / (darker + 0.05)
}

/// Dominant color of a palette: the first entry, black when empty.
pub fn dominant_color(colors: &[&Color]) -> String {
    colors
        .first()
        .map_or_else(|| "#000000".to_string(), |c| c.hex.clone())
}

/// Named preset palettes offered to clients.
pub fn color_themes() -> Vec<(&'static str, Vec<Color>)> {
    let palette = |hexes: [&str; 5]| hexes.into_iter().map(Color::opaque).collect();
    vec![
        (
            "pastel",
            palette(["#FFB3BA", "#BAFFC9", "#BAE1FF", "#FFFFBA", "#FFDFBA"]),
        ),
        (
            "neon",
            palette(["#FF073A", "#39FF14", "#0080FF", "#FFFF00", "#FF8C00"]),
        ),
        (
            "brand",
            palette(["#1DA1F2", "#4267B2", "#E60023", "#25D366", "#FF5722"]),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_validation() {
        assert!(is_valid_hex("#fff"));
        assert!(is_valid_hex("#A1b2C3"));
        assert!(!is_valid_hex("fff"));
        assert!(!is_valid_hex("#ffff"));
        assert!(!is_valid_hex("#gggggg"));
        assert!(!is_valid_hex("#FF0000AA"));
    }

    #[test]
    fn test_hex_to_rgb() {
        assert_eq!(hex_to_rgb("#FF8000"), [255, 128, 0]);
        assert_eq!(hex_to_rgb("0a0b0c"), [10, 11, 12]);
        assert_eq!(hex_to_rgb("#f80"), [255, 136, 0]);
        assert_eq!(hex_to_rgb("nonsense"), [0, 0, 0]);
    }

    #[test]
    fn test_paint() {
        assert_eq!(Color::opaque("#123456").to_paint(), "#123456");
        assert_eq!(
            Color::new("#000000", 0.5).to_paint(),
            "rgba(0, 0, 0, 0.5)"
        );
        assert_eq!(Color::new("#fff", 0.25).to_paint(), "rgba(255, 255, 255, 0.25)");
    }

    #[test]
    fn test_contrast_extremes() {
        let ratio = contrast_ratio("#000000", "#FFFFFF");
        assert!((ratio - 21.0).abs() < 1e-9);
        assert!((contrast_ratio("#FFFFFF", "#000000") - 21.0).abs() < 1e-9);
        assert!((contrast_ratio("#777777", "#777777") - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_luminance_bounds() {
        assert!(relative_luminance(0, 0, 0).abs() < 1e-12);
        assert!((relative_luminance(255, 255, 255) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_dominant_color() {
        let red = Color::opaque("#FF0000");
        assert_eq!(dominant_color(&[&red]), "#FF0000");
        assert_eq!(dominant_color(&[]), "#000000");
    }

    #[test]
    fn test_themes() {
        let themes = color_themes();
        assert_eq!(themes.len(), 3);
        assert!(themes.iter().all(|(_, colors)| colors.len() == 5));
    }

    #[test]
    fn test_deserialize_default_alpha() {
        let c: Color = serde_json::from_str(r##"{"hex":"#abc"}"##).unwrap();
        assert_eq!(c.alpha, 1.0);
    }
}
