//! Configuration section definitions.
//!
//! Each module corresponds to a section in `avatar.toml`:
//!
//! | Module       | TOML Section    | Purpose                            |
//! |--------------|-----------------|------------------------------------|
//! | `serve`      | `[serve]`       | HTTP listener and worker pool      |
//! | `cache`      | `[cache]`       | Artifact cache lifetime            |
//! | `rate_limit` | `[rate_limit]`  | Per-client request window          |
//! | `render`     | `[render]`      | Font discovery for rasterization   |

mod cache;
mod rate_limit;
mod render;
mod serve;

pub use cache::CacheConfig;
pub use rate_limit::RateLimitConfig;
pub use render::RenderConfig;
pub use serve::ServeConfig;
