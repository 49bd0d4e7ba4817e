//! MIME type constants for generated artifacts and API responses.

/// Common MIME type constants.
pub mod types {
    pub const PLAIN: &str = "text/plain; charset=utf-8";
    pub const JSON: &str = "application/json";

    pub const PNG: &str = "image/png";
    pub const JPEG: &str = "image/jpeg";
    pub const WEBP: &str = "image/webp";
    pub const SVG: &str = "image/svg+xml";
}

/// Map an export extension to its MIME type.
pub fn from_extension(ext: &str) -> &'static str {
    match ext {
        "svg" => types::SVG,
        "png" => types::PNG,
        "jpg" | "jpeg" => types::JPEG,
        "webp" => types::WEBP,
        "json" => types::JSON,
        _ => types::PLAIN,
    }
}
