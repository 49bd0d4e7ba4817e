//! Configuration-to-SVG compositing pipeline.
//!
//! # Architecture
//!
//! ```text
//! AvatarConfig
//!     │
//!     ├──► text        display text, font size, font stack
//!     ├──► background  paint server defs + fill
//!     ├──► shape       outline path, clip path, border, glow
//!     ├──► effect      text filter, image filter chain
//!     │
//!     ▼
//!   svg ──► one <svg> document (whitespace-collapsed)
//!     │
//!     ├──► qr      decorative pseudo-QR around the avatar
//!     └──► raster  PNG / JPEG / WebP
//! ```
//!
//! Processors never emit markup inside another element's attribute list:
//! each returns a [`Fragment`] whose `defs` go to the document `<defs>` and
//! whose `attr` is spliced onto the element that uses it.

pub mod background;
pub mod effect;
pub mod legacy;
pub mod qr;
pub mod raster;
pub mod shape;
pub mod svg;
pub mod text;

pub use raster::{RenderError, Rasterizer};
pub use svg::{FaviconSet, generate, generate_favicons};

use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::AvatarError;
use crate::schema::{AvatarConfig, ExportFormat};
use crate::utils::mime;

// ============================================================================
// Fragments
// ============================================================================

/// Markup produced by one processor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fragment {
    /// Resource definitions (gradients, patterns, filters).
    pub defs: String,
    /// Attribute referencing those resources, e.g. `fill="url(#id)"`.
    pub attr: String,
}

impl Fragment {
    pub fn attr(attr: impl Into<String>) -> Self {
        Self {
            defs: String::new(),
            attr: attr.into(),
        }
    }
}

// ============================================================================
// Per-document context
// ============================================================================

/// Process-wide salt so ids differ across restarts.
static PROCESS_SALT: LazyLock<u32> = LazyLock::new(rand::random);

/// Monotonic document counter.
static DOCUMENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// State scoped to the generation of a single document.
///
/// Hands out fragment ids that are unique within the process and seeds the
/// noise texture from the configuration fingerprint.
pub struct RenderContext {
    doc: String,
    next_id: u32,
    rng: StdRng,
}

impl RenderContext {
    pub fn new(seed: u64) -> Self {
        let seq = DOCUMENT_SEQ.fetch_add(1, Ordering::Relaxed);
        Self {
            doc: format!("{:x}{seq:x}", *PROCESS_SALT),
            next_id: 0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn for_config(config: &AvatarConfig) -> Self {
        Self::new(crate::cache::config_seed(config))
    }

    /// Fresh id with the given prefix, e.g. `gradient-3fa91c2-0`.
    pub fn next_id(&mut self, prefix: &str) -> String {
        let id = format!("{prefix}-{}-{}", self.doc, self.next_id);
        self.next_id += 1;
        id
    }

    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }
}

// ============================================================================
// Formatting helpers
// ============================================================================

/// Collapse every whitespace run to one space and trim the ends.
pub fn collapse_whitespace(markup: &str) -> String {
    markup.split_ascii_whitespace().collect::<Vec<_>>().join(" ")
}

/// Compact number formatting for coordinates: integers print bare,
/// everything else keeps at most three decimals.
pub fn num(v: f64) -> String {
    if (v - v.round()).abs() < 1e-9 {
        // Avoid "-0"
        let r = v.round();
        return format!("{}", if r == 0.0 { 0.0 } else { r });
    }
    let s = format!("{v:.3}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

// ============================================================================
// Top-level artifact production
// ============================================================================

/// A generated artifact ready to be served or written.
#[derive(Debug, Clone)]
pub enum Output {
    Svg(String),
    Raster { bytes: Vec<u8>, format: ExportFormat },
    Favicons(FaviconSet),
}

impl Output {
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Svg(_) => mime::types::SVG,
            Self::Raster { format, .. } => mime::from_extension(format.extension()),
            Self::Favicons(_) => mime::types::JSON,
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Self::Svg(svg) => svg.into_bytes(),
            Self::Raster { bytes, .. } => bytes,
            Self::Favicons(set) => set.to_json().into_bytes(),
        }
    }
}

/// Produce the artifact a validated configuration asks for.
///
/// Priority: QR (when requested with non-empty data), then favicon set,
/// then a single avatar encoded per `export.format`.
pub fn produce(config: &AvatarConfig, rasterizer: &Rasterizer) -> Result<Output, AvatarError> {
    if config.generate_qr
        && let Some(data) = config.qr_data.as_deref().filter(|d| !d.is_empty())
    {
        return Ok(Output::Svg(qr::generate_with_avatar(config, data)));
    }

    if config.generate_favicon {
        return Ok(Output::Favicons(generate_favicons(config)));
    }

    let svg = generate(config);
    let format = config.export.format;
    if !format.is_raster() {
        return Ok(Output::Svg(svg));
    }

    let bytes = rasterizer.encode(
        &svg,
        format,
        u8::try_from(config.export.quality.clamp(0, 100)).unwrap_or(90),
        !config.export.transparency,
    )?;
    Ok(Output::Raster { bytes, format })
}
