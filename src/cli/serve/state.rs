//! Shared service state handed to every request.

use serde::Serialize;
use std::sync::Arc;

use crate::{
    cache::ArtifactCache,
    config::AppConfig,
    log,
    ratelimit::RateLimiter,
    render::{Rasterizer, text::google_font_url},
    schema::{AvatarConfig, contrast_ratio, dominant_color},
    utils::date::DateTimeUtc,
};

/// Descriptive metadata stored alongside a generated artifact.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactMetadata {
    pub dominant_color: String,
    pub contrast_ratio: f64,
    /// Stylesheet serving the configured family at its weight.
    pub font_url: String,
    pub generated_at: String,
    pub cache_key: String,
}

impl ArtifactMetadata {
    /// Metadata for `config`, measured against black text.
    pub fn describe(config: &AvatarConfig, cache_key: &str) -> Self {
        let background = config.background.color.as_ref();
        let typography = &config.typography;
        let weight = u16::try_from(typography.weight).unwrap_or(400);
        Self {
            dominant_color: dominant_color(&background.into_iter().collect::<Vec<_>>()),
            contrast_ratio: contrast_ratio(
                background.map_or("#ffffff", |c| c.hex.as_str()),
                "#000000",
            ),
            font_url: google_font_url(&typography.font_family, &[weight]),
            generated_at: DateTimeUtc::now().to_rfc3339(),
            cache_key: cache_key.to_string(),
        }
    }
}

/// A generated response body, as kept in the cache.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub body: Vec<u8>,
    pub content_type: &'static str,
    pub metadata: ArtifactMetadata,
}

/// Everything a request handler needs.
pub struct AppState {
    pub config: AppConfig,
    pub cache: ArtifactCache<Arc<Artifact>>,
    pub limiter: RateLimiter,
    pub rasterizer: Rasterizer,
}

impl AppState {
    pub fn from_config(config: AppConfig) -> Self {
        let cache = if config.cache.enabled {
            ArtifactCache::new(config.cache.ttl())
        } else {
            ArtifactCache::disabled()
        };
        if !cache.is_enabled() {
            log!("cache"; "disabled, every request renders");
        }
        let limiter = RateLimiter::new(config.rate_limit.limit, config.rate_limit.window());
        let rasterizer =
            Rasterizer::new(config.render.load_system_fonts, config.render.font_dirs.as_slice());
        log!("render"; "{} font faces loaded", rasterizer.font_count());

        Self {
            config,
            cache,
            limiter,
            rasterizer,
        }
    }

    /// State with defaults and no fonts, for tests.
    #[cfg(test)]
    pub fn for_tests(config: AppConfig) -> Self {
        Self {
            cache: ArtifactCache::new(config.cache.ttl()),
            limiter: RateLimiter::new(config.rate_limit.limit, config.rate_limit.window()),
            rasterizer: Rasterizer::without_fonts(),
            config,
        }
    }
}
