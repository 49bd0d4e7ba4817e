//! Display text derivation and font sizing.

use crate::schema::{DisplayKind, DisplayMode, TypographyConfig};

/// Shown for emoji mode when no emoji is configured.
pub const DEFAULT_EMOJI: &str = "👤";

/// Known families and their fallback stacks.
const FONT_STACKS: &[(&str, &str)] = &[
    (
        "Inter",
        r#"Inter, -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif"#,
    ),
    (
        "Roboto",
        r#"Roboto, -apple-system, BlinkMacSystemFont, "Segoe UI", sans-serif"#,
    ),
    (
        "Open Sans",
        r#""Open Sans", -apple-system, BlinkMacSystemFont, "Segoe UI", sans-serif"#,
    ),
    (
        "Lato",
        r#"Lato, -apple-system, BlinkMacSystemFont, "Segoe UI", sans-serif"#,
    ),
    (
        "Montserrat",
        r#"Montserrat, -apple-system, BlinkMacSystemFont, "Segoe UI", sans-serif"#,
    ),
    (
        "Poppins",
        r#"Poppins, -apple-system, BlinkMacSystemFont, "Segoe UI", sans-serif"#,
    ),
];

fn first_upper(word: &str) -> String {
    word.chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_default()
}

/// First letter of the first and last word, uppercased.
///
/// A single word yields one letter; blank input yields an empty string.
pub fn extract_initials(name: &str) -> String {
    let words: Vec<&str> = name.split_whitespace().collect();
    match words.as_slice() {
        [] => String::new(),
        [only] => first_upper(only),
        [first, .., last] => first_upper(first) + &first_upper(last),
    }
}

/// First `max_words` whitespace-separated words, joined by single spaces.
pub fn truncate_name(name: &str, max_words: usize) -> String {
    name.split_whitespace()
        .take(max_words)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Visible text for a name under the given display mode.
pub fn display_text(name: &str, mode: &DisplayMode) -> String {
    match mode.kind {
        DisplayKind::Initials => extract_initials(name),
        DisplayKind::Truncated => truncate_name(name, usize::try_from(mode.max_words).unwrap_or(2)),
        DisplayKind::Emoji => mode
            .emoji
            .as_deref()
            .filter(|e| !e.is_empty())
            .unwrap_or(DEFAULT_EMOJI)
            .to_string(),
    }
}

/// Font size fitting `text` into a square of `container` pixels.
///
/// Longer text shrinks (down to half of the base size) and heavier weights
/// shrink slightly, since they read larger.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn calculate_font_size(text: &str, container: u32, typography: &TypographyConfig) -> u32 {
    let base = f64::from(container) * 0.4;
    let len = text.chars().count().max(1) as f64;
    let length_factor = (1.0 - (len - 1.0) * 0.15).max(0.5);
    let weight_factor = 1.0 - f64::from(typography.weight - 400) / 2000.0;
    (base * length_factor * weight_factor).round().max(1.0) as u32
}

/// CSS font stack for a family name.
pub fn font_family(family: &str) -> String {
    FONT_STACKS
        .iter()
        .find(|(name, _)| *name == family)
        .map_or_else(|| format!("{family}, sans-serif"), |(_, stack)| (*stack).to_string())
}

/// Google Fonts stylesheet URL for a family and weight list.
pub fn google_font_url(family: &str, weights: &[u16]) -> String {
    let family = family.split_whitespace().collect::<Vec<_>>().join("+");
    let weights = weights
        .iter()
        .map(u16::to_string)
        .collect::<Vec<_>>()
        .join(",");
    format!("https://fonts.googleapis.com/css2?family={family}:wght@{weights}&display=swap")
}
