//! Avatar configuration model.
//!
//! These types mirror the JSON accepted by `POST /api/avatar`. Every nested
//! object carries `#[serde(default)]`, so `{"name": "Ada"}` deserializes into
//! a complete configuration. Range checks live in [`crate::validate`].

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Color;

// ============================================================================
// Aggregate root
// ============================================================================

/// Full description of one image to generate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvatarConfig {
    pub name: String,
    #[serde(default)]
    pub shape: ShapeConfig,
    #[serde(default)]
    pub background: BackgroundConfig,
    #[serde(default)]
    pub typography: TypographyConfig,
    #[serde(default)]
    pub display_mode: DisplayMode,
    #[serde(default)]
    pub export: ExportOptions,
    #[serde(default)]
    pub filters: Filters,
    #[serde(default)]
    pub generate_favicon: bool,
    #[serde(default, rename = "generateQR")]
    pub generate_qr: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qr_data: Option<String>,
}

impl AvatarConfig {
    /// Configuration with every section at its default.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shape: ShapeConfig::default(),
            background: BackgroundConfig::default(),
            typography: TypographyConfig::default(),
            display_mode: DisplayMode::default(),
            export: ExportOptions::default(),
            filters: Filters::default(),
            generate_favicon: false,
            generate_qr: false,
            qr_data: None,
        }
    }

    /// Pixel edge of the square output.
    pub const fn pixel_size(&self) -> u32 {
        self.export.size.pixels()
    }

    /// Copy of this configuration rendered at another canonical size.
    pub fn with_size(&self, size: ExportSize) -> Self {
        let mut config = self.clone();
        config.export.size = size;
        config
    }
}

// ============================================================================
// Shape
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShapeKind {
    #[default]
    Circle,
    Square,
    RoundedRectangle,
    Hexagon,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeConfig {
    #[serde(rename = "type")]
    pub kind: ShapeKind,
    /// Corner radius, only used by rounded rectangles.
    pub radius: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border: Option<Border>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub glow: Option<Glow>,
}

impl Default for ShapeConfig {
    fn default() -> Self {
        Self {
            kind: ShapeKind::Circle,
            radius: 0.0,
            border: None,
            glow: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderStyle {
    #[default]
    Solid,
    Dashed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Border {
    pub width: f64,
    pub color: Color,
    pub style: BorderStyle,
}

impl Default for Border {
    fn default() -> Self {
        Self {
            width: 0.0,
            color: Color::opaque("#000000"),
            style: BorderStyle::Solid,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GlowKind {
    Inner,
    #[default]
    Outer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Glow {
    pub enabled: bool,
    #[serde(rename = "type")]
    pub kind: GlowKind,
    pub blur: f64,
    pub spread: f64,
    pub color: Color,
}

impl Default for Glow {
    fn default() -> Self {
        Self {
            enabled: false,
            kind: GlowKind::Outer,
            blur: 5.0,
            spread: 2.0,
            color: Color::new("#ffffff", 0.5),
        }
    }
}

// ============================================================================
// Background
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundKind {
    #[default]
    Solid,
    Gradient,
    Image,
    Texture,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Texture {
    Dots,
    Lines,
    Grid,
    Noise,
}

impl Texture {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dots => "dots",
            Self::Lines => "lines",
            Self::Grid => "grid",
            Self::Noise => "noise",
        }
    }
}

/// Background fill; `kind` selects which payload is active.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BackgroundConfig {
    #[serde(rename = "type")]
    pub kind: BackgroundKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gradient: Option<Gradient>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub texture: Option<Texture>,
    pub transparency: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    pub color: Color,
    pub position: f64,
}

/// Gradient definitions, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Gradient {
    Linear {
        #[serde(default)]
        angle: f64,
        stops: Vec<GradientStop>,
    },
    #[serde(rename_all = "camelCase")]
    Radial {
        #[serde(default = "half")]
        center_x: f64,
        #[serde(default = "half")]
        center_y: f64,
        #[serde(default = "half")]
        radius: f64,
        stops: Vec<GradientStop>,
    },
    /// Rendered as a radial gradient; SVG has no conic paint server.
    #[serde(rename_all = "camelCase")]
    Conic {
        #[serde(default = "half")]
        center_x: f64,
        #[serde(default = "half")]
        center_y: f64,
        #[serde(default)]
        angle: f64,
        stops: Vec<GradientStop>,
    },
}

const fn half() -> f64 {
    50.0
}

impl Gradient {
    pub fn stops(&self) -> &[GradientStop] {
        match self {
            Self::Linear { stops, .. } | Self::Radial { stops, .. } | Self::Conic { stops, .. } => {
                stops
            }
        }
    }
}

// ============================================================================
// Typography
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

impl FontStyle {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Italic => "italic",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    #[default]
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextShadow {
    pub enabled: bool,
    pub offset_x: f64,
    pub offset_y: f64,
    pub blur: f64,
    pub color: Color,
}

impl Default for TextShadow {
    fn default() -> Self {
        Self {
            enabled: false,
            offset_x: 2.0,
            offset_y: 2.0,
            blur: 4.0,
            color: Color::new("#000000", 0.5),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextOutline {
    pub enabled: bool,
    pub width: f64,
    pub color: Color,
}

impl Default for TextOutline {
    fn default() -> Self {
        Self {
            enabled: false,
            width: 1.0,
            color: Color::opaque("#000000"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TypographyConfig {
    pub font_family: String,
    pub weight: i32,
    pub style: FontStyle,
    pub alignment: Alignment,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shadow: Option<TextShadow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outline: Option<TextOutline>,
}

impl Default for TypographyConfig {
    fn default() -> Self {
        Self {
            font_family: "Inter".to_string(),
            weight: 600,
            style: FontStyle::Normal,
            alignment: Alignment::Center,
            shadow: None,
            outline: None,
        }
    }
}

// ============================================================================
// Display mode
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayKind {
    #[default]
    Initials,
    Truncated,
    Emoji,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DisplayMode {
    #[serde(rename = "type")]
    pub kind: DisplayKind,
    pub max_words: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
}

impl Default for DisplayMode {
    fn default() -> Self {
        Self {
            kind: DisplayKind::Initials,
            max_words: 2,
            emoji: None,
        }
    }
}

// ============================================================================
// Export
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Png,
    Jpeg,
    Webp,
    Svg,
}

impl ExportFormat {
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Webp => "webp",
            Self::Svg => "svg",
        }
    }

    pub const fn is_raster(self) -> bool {
        !matches!(self, Self::Svg)
    }
}

/// One of the four canonical output sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "SizeRepr", into = "String")]
pub enum ExportSize {
    S64,
    S128,
    #[default]
    S256,
    S512,
}

impl ExportSize {
    pub const ALL: [Self; 4] = [Self::S64, Self::S128, Self::S256, Self::S512];

    pub const fn pixels(self) -> u32 {
        match self {
            Self::S64 => 64,
            Self::S128 => 128,
            Self::S256 => 256,
            Self::S512 => 512,
        }
    }

    pub fn from_pixels(px: u64) -> Option<Self> {
        Self::ALL.into_iter().find(|s| u64::from(s.pixels()) == px)
    }

    /// Canonical size closest to `target` (ties resolve to the smaller size).
    pub fn nearest(target: f64) -> Self {
        Self::ALL
            .into_iter()
            .reduce(|best, s| {
                if (f64::from(s.pixels()) - target).abs() < (f64::from(best.pixels()) - target).abs()
                {
                    s
                } else {
                    best
                }
            })
            .unwrap_or_default()
    }
}

impl fmt::Display for ExportSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.pixels())
    }
}

impl From<ExportSize> for String {
    fn from(size: ExportSize) -> Self {
        size.to_string()
    }
}

/// Wire form of a size: `"256"` or `256`.
#[derive(Deserialize)]
#[serde(untagged)]
enum SizeRepr {
    Text(String),
    Number(u64),
}

impl TryFrom<SizeRepr> for ExportSize {
    type Error = String;

    fn try_from(repr: SizeRepr) -> Result<Self, Self::Error> {
        let px = match &repr {
            SizeRepr::Text(s) => s.trim().parse::<u64>().ok(),
            SizeRepr::Number(n) => Some(*n),
        };
        px.and_then(Self::from_pixels).ok_or_else(|| {
            let shown = match repr {
                SizeRepr::Text(s) => s,
                SizeRepr::Number(n) => n.to_string(),
            };
            format!("size must be one of 64, 128, 256, 512 (got {shown})")
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    pub format: ExportFormat,
    pub quality: i32,
    pub size: ExportSize,
    pub transparency: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: ExportFormat::Png,
            quality: 90,
            size: ExportSize::S256,
            transparency: false,
        }
    }
}

// ============================================================================
// Filters
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Filters {
    pub grayscale: i32,
    pub sepia: i32,
    pub blur: i32,
    pub brightness: i32,
}

impl Filters {
    /// No-op chain: nothing needs to be emitted.
    pub const fn is_identity(&self) -> bool {
        self.grayscale == 0 && self.sepia == 0 && self.blur == 0 && self.brightness == 100
    }
}

impl Default for Filters {
    fn default() -> Self {
        Self {
            grayscale: 0,
            sepia: 0,
            blur: 0,
            brightness: 100,
        }
    }
}
