//! Declarative data model consumed by the render pipeline.

mod avatar;
mod color;
mod legacy;

pub use avatar::{
    Alignment, AvatarConfig, BackgroundConfig, BackgroundKind, Border, BorderStyle, DisplayKind,
    DisplayMode, ExportFormat, ExportOptions, ExportSize, Filters, FontStyle, Glow, GlowKind,
    Gradient, GradientStop, ShapeConfig, ShapeKind, TextOutline, TextShadow, Texture,
    TypographyConfig,
};
pub use color::{Color, color_themes, contrast_ratio, dominant_color, is_valid_hex};
pub use legacy::{ImageParams, ImageType, ValidatedImageParams};
