//! SVG to raster conversion.
//!
//! Parses with `usvg`, paints with `resvg`, encodes with `image`.

use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::{ExtendedColorType, ImageEncoder, ImageError};
use resvg::tiny_skia::{Color, Pixmap, Transform};
use thiserror::Error;
use usvg::fontdb;

use crate::error::AvatarError;
use crate::schema::ExportFormat;

/// Largest accepted raster side.
pub const MAX_DIMENSION: u32 = 4096;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid SVG: {0}")]
    Parse(#[from] usvg::Error),

    #[error("unsupported raster size {width}x{height}")]
    Size { width: u32, height: u32 },

    #[error("no font faces available")]
    NoFonts,

    #[error("{0} is not a raster format")]
    NotRaster(&'static str),

    #[error("encoding failed: {0}")]
    Encode(#[from] ImageError),
}

impl From<RenderError> for AvatarError {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::NoFonts => Self::FontLoad(err.to_string()),
            other => Self::image_generation("Failed to generate image", other.to_string()),
        }
    }
}

/// Shared rasterizer holding the font database.
///
/// Loading system fonts is slow, so one instance is built at startup and
/// shared by every request.
#[derive(Clone)]
pub struct Rasterizer {
    fonts: Arc<fontdb::Database>,
}

impl Rasterizer {
    pub fn new<P: AsRef<Path>>(load_system_fonts: bool, font_dirs: &[P]) -> Self {
        let mut db = fontdb::Database::new();
        if load_system_fonts {
            db.load_system_fonts();
        }
        for dir in font_dirs {
            db.load_fonts_dir(dir);
        }
        crate::debug!("render"; "loaded {} font faces", db.len());
        Self {
            fonts: Arc::new(db),
        }
    }

    /// Rasterizer with an empty font database.
    pub fn without_fonts() -> Self {
        Self {
            fonts: Arc::new(fontdb::Database::new()),
        }
    }

    pub fn font_count(&self) -> usize {
        self.fonts.len()
    }

    /// Paint `svg` into a pixmap at its intrinsic size.
    ///
    /// With `backdrop`, transparent regions are composited onto white.
    pub fn rasterize(&self, svg: &str, backdrop: bool) -> Result<Pixmap, RenderError> {
        if self.fonts.len() == 0 && svg.contains("<text") {
            return Err(RenderError::NoFonts);
        }

        let opt = usvg::Options {
            fontdb: Arc::clone(&self.fonts),
            ..Default::default()
        };
        let tree = usvg::Tree::from_str(svg, &opt)?;

        let size = tree.size().to_int_size();
        let (width, height) = (size.width(), size.height());
        if width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(RenderError::Size { width, height });
        }
        let mut pixmap = Pixmap::new(width, height).ok_or(RenderError::Size { width, height })?;
        if backdrop {
            pixmap.fill(Color::WHITE);
        }
        resvg::render(&tree, Transform::default(), &mut pixmap.as_mut());
        Ok(pixmap)
    }

    /// Rasterize and encode `svg` as `format`.
    ///
    /// `quality` only affects JPEG; WebP is written lossless. JPEG always gets
    /// a white backdrop since it has no alpha channel.
    pub fn encode(
        &self,
        svg: &str,
        format: ExportFormat,
        quality: u8,
        backdrop: bool,
    ) -> Result<Vec<u8>, AvatarError> {
        let backdrop = backdrop || format == ExportFormat::Jpeg;
        let pixmap = self.rasterize(svg, backdrop)?;
        Ok(encode_pixmap(&pixmap, format, quality)?)
    }
}

/// Straight (non-premultiplied) RGBA bytes.
fn straight_rgba(pixmap: &Pixmap) -> Vec<u8> {
    pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect()
}

pub fn encode_pixmap(pixmap: &Pixmap, format: ExportFormat, quality: u8) -> Result<Vec<u8>, RenderError> {
    let (width, height) = (pixmap.width(), pixmap.height());
    let rgba = straight_rgba(pixmap);
    let mut out = Cursor::new(Vec::new());

    match format {
        ExportFormat::Png => {
            PngEncoder::new(&mut out).write_image(&rgba, width, height, ExtendedColorType::Rgba8)?;
        }
        ExportFormat::Jpeg => {
            let rgb: Vec<u8> = rgba
                .chunks_exact(4)
                .flat_map(|px| [px[0], px[1], px[2]])
                .collect();
            JpegEncoder::new_with_quality(&mut out, quality.clamp(1, 100))
                .write_image(&rgb, width, height, ExtendedColorType::Rgb8)?;
        }
        ExportFormat::Webp => {
            WebPEncoder::new_lossless(&mut out)
                .write_image(&rgba, width, height, ExtendedColorType::Rgba8)?;
        }
        ExportFormat::Svg => return Err(RenderError::NotRaster("svg")),
    }

    Ok(out.into_inner())
}
