//! Flat parameter set of the legacy `/api/image` endpoint.

use serde::Serialize;

/// Raw, unvalidated legacy parameters as read from the query string.
#[derive(Debug, Clone, Default)]
pub struct ImageParams {
    pub name: Option<String>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub color: Option<String>,
    pub bcolor: Option<String>,
    pub radius: Option<f64>,
    pub gradient: bool,
    pub gradient_direction: Option<String>,
    pub gradient_color: Option<String>,
    pub image_type: Option<String>,
}

/// Legacy output encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageType {
    Svg,
    Png,
}

impl ImageType {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "svg" => Some(Self::Svg),
            "png" => Some(Self::Png),
            _ => None,
        }
    }

    pub const fn extension(self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Png => "png",
        }
    }
}

/// Legacy parameters after validation, with initials pre-extracted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidatedImageParams {
    pub name: String,
    pub width: i64,
    pub height: i64,
    pub color: String,
    pub bcolor: String,
    pub initials: String,
    pub radius: i64,
    pub gradient: bool,
    pub gradient_direction: String,
    pub gradient_color: String,
    pub image_type: ImageType,
}
