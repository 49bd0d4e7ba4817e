//! In-memory artifact cache.
//!
//! Entries expire after a TTL. Expired entries are swept on every insert and
//! evicted lazily on lookup; there is no size bound, so memory grows with
//! the number of distinct live keys.

mod key;
mod store;

pub use key::{config_seed, generate_key};
pub use store::{ArtifactCache, CacheStats, DEFAULT_TTL};
