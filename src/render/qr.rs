//! Decorative QR-style frame around an avatar.
//!
//! The module pattern is derived from a hash of the payload but does not
//! encode it. Scanners will not read these images.

use std::fmt::Write;

use super::{RenderContext, collapse_whitespace, num, svg};
use crate::schema::{AvatarConfig, ExportSize};

/// Modules per side.
pub const GRID: u32 = 25;

/// Module rows and columns left empty for the avatar.
const RESERVED: std::ops::RangeInclusive<u32> = 8..=16;

/// Offset of the right and bottom finder patterns, in modules.
const FINDER_OFFSET: u32 = 18;

/// Rolling 32-bit string hash over UTF-16 code units.
pub fn rolling_hash(s: &str) -> u32 {
    s.encode_utf16()
        .fold(0i32, |hash, unit| {
            (hash << 5).wrapping_sub(hash).wrapping_add(i32::from(unit))
        })
        .unsigned_abs()
}

/// Whether module (`row`, `col`) is dark for this payload.
pub fn is_dark(data: &str, row: u32, col: u32) -> bool {
    rolling_hash(&format!("{data}{row}{col}")) % 2 == 0
}

fn is_reserved(row: u32, col: u32) -> bool {
    RESERVED.contains(&row) && RESERVED.contains(&col)
}

fn finder(out: &mut String, x: f64, y: f64, m: f64) {
    for (inset, span, fill) in [(0.0, 7.0, "black"), (1.0, 5.0, "white"), (2.0, 3.0, "black")] {
        let _ = write!(
            out,
            r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{fill}"/>"#,
            num(x + inset * m),
            num(y + inset * m),
            num(span * m),
            num(span * m)
        );
    }
}

/// Module rectangles plus three finder patterns for a `side`-pixel grid.
pub fn pattern(data: &str, side: f64) -> String {
    let m = side / f64::from(GRID);
    let mut out = String::new();

    for row in 0..GRID {
        for col in 0..GRID {
            if is_reserved(row, col) || !is_dark(data, row, col) {
                continue;
            }
            let _ = write!(
                out,
                r#"<rect x="{}" y="{}" width="{m}" height="{m}" fill="black"/>"#,
                num(f64::from(col) * m),
                num(f64::from(row) * m),
                m = num(m)
            );
        }
    }

    let far = f64::from(FINDER_OFFSET) * m;
    finder(&mut out, 0.0, 0.0, m);
    finder(&mut out, far, 0.0, m);
    finder(&mut out, 0.0, far, m);
    out
}

/// QR-style frame with the avatar in the reserved centre.
///
/// The avatar is rendered at the canonical size nearest 30% of the canvas
/// and scaled into a centred 30% box.
pub fn generate_with_avatar(config: &AvatarConfig, data: &str) -> String {
    let size = f64::from(config.pixel_size());
    let grid_side = size * 0.8;
    let grid_offset = (size - grid_side) / 2.0;
    let avatar_side = size * 0.3;
    let avatar_offset = (size - avatar_side) / 2.0;

    let avatar_config = config.with_size(ExportSize::nearest(avatar_side));
    let mut ctx = RenderContext::for_config(&avatar_config);
    let avatar = svg::compose(&avatar_config, &mut ctx);

    collapse_whitespace(&format!(
        r#"<svg width="{s}" height="{s}" viewBox="0 0 {s} {s}" xmlns="http://www.w3.org/2000/svg">
             <rect width="100%" height="100%" fill="white"/>
             <g transform="translate({go}, {go})">{pattern}</g>
             <svg x="{ao}" y="{ao}" width="{aw}" height="{aw}" viewBox="0 0 {av} {av}">{inner}</svg>
           </svg>"#,
        s = num(size),
        go = num(grid_offset),
        pattern = pattern(data, grid_side),
        ao = num(avatar_offset),
        aw = num(avatar_side),
        av = avatar.size,
        inner = avatar.inner(),
    ))
}
