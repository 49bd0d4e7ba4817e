//! TTL map behind a mutex.

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::time::Duration;

use crate::utils::date::now_millis;

/// Default entry lifetime: 24 hours.
pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Clone)]
struct Entry<V> {
    value: V,
    /// Epoch millis after which the entry is dead.
    expires_at: u64,
}

impl<V> Entry<V> {
    const fn is_expired(&self, now: u64) -> bool {
        now > self.expires_at
    }
}

/// Entry counts reported by [`ArtifactCache::stats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub total: usize,
    pub active: usize,
    pub expired: usize,
}

/// Thread-safe key/value cache with per-entry expiry.
///
/// Clock-dependent operations have `*_at` variants taking epoch millis.
pub struct ArtifactCache<V> {
    entries: Mutex<FxHashMap<String, Entry<V>>>,
    ttl: Duration,
    enabled: bool,
}

impl<V: Clone> ArtifactCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(FxHashMap::default()),
            ttl,
            enabled: true,
        }
    }

    /// A cache that stores nothing.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::new(DEFAULT_TTL)
        }
    }

    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set(&self, key: impl Into<String>, value: V) {
        self.set_with_ttl(key, value, self.ttl);
    }

    pub fn set_with_ttl(&self, key: impl Into<String>, value: V, ttl: Duration) {
        self.set_at(key, value, ttl, now_millis());
    }

    /// Insert, then sweep every expired entry.
    #[allow(clippy::cast_possible_truncation)]
    pub fn set_at(&self, key: impl Into<String>, value: V, ttl: Duration, now: u64) {
        if !self.enabled {
            return;
        }
        let expires_at = now.saturating_add(ttl.as_millis() as u64);
        let mut entries = self.entries.lock();
        entries.insert(key.into(), Entry { value, expires_at });
        entries.retain(|_, entry| !entry.is_expired(now));
    }

    pub fn get(&self, key: &str) -> Option<V> {
        self.get_at(key, now_millis())
    }

    /// Look up a live entry, evicting it if it has expired.
    pub fn get_at(&self, key: &str, now: u64) -> Option<V> {
        let mut entries = self.entries.lock();
        match entries.get(key) {
            Some(entry) if entry.is_expired(now) => {
                entries.remove(key);
                None
            }
            Some(entry) => Some(entry.value.clone()),
            None => None,
        }
    }

    pub fn has(&self, key: &str) -> bool {
        self.has_at(key, now_millis())
    }

    pub fn has_at(&self, key: &str, now: u64) -> bool {
        self.get_at(key, now).is_some()
    }

    /// Remove an entry, reporting whether it existed.
    pub fn delete(&self, key: &str) -> bool {
        self.entries.lock().remove(key).is_some()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    pub fn stats(&self) -> CacheStats {
        self.stats_at(now_millis())
    }

    pub fn stats_at(&self, now: u64) -> CacheStats {
        let entries = self.entries.lock();
        let expired = entries.values().filter(|e| e.is_expired(now)).count();
        CacheStats {
            total: entries.len(),
            active: entries.len() - expired,
            expired,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR: Duration = Duration::from_secs(3600);

    #[test]
    fn test_set_get_roundtrip() {
        let cache = ArtifactCache::new(HOUR);
        cache.set("k", 1);
        assert_eq!(cache.get("k"), Some(1));
        assert!(cache.has("k"));
        assert_eq!(cache.get("missing"), None);
    }

    #[test]
    fn test_expiry_is_strict() {
        let cache = ArtifactCache::new(HOUR);
        cache.set_at("k", "v", Duration::from_millis(100), 1_000);
        assert_eq!(cache.get_at("k", 1_100), Some("v"));
        assert_eq!(cache.get_at("k", 1_101), None);
        // Lazily evicted
        assert_eq!(cache.stats_at(0).total, 0);
    }

    #[test]
    fn test_set_sweeps_expired() {
        let cache = ArtifactCache::new(HOUR);
        cache.set_at("old", 1, Duration::from_millis(10), 0);
        cache.set_at("older", 2, Duration::from_millis(5), 0);
        assert_eq!(
            cache.stats_at(50),
            CacheStats {
                total: 2,
                active: 0,
                expired: 2
            }
        );

        cache.set_at("new", 3, HOUR, 50);
        assert_eq!(
            cache.stats_at(50),
            CacheStats {
                total: 1,
                active: 1,
                expired: 0
            }
        );
    }

    #[test]
    fn test_delete_and_clear() {
        let cache = ArtifactCache::new(HOUR);
        cache.set("a", 1);
        cache.set("b", 2);
        assert!(cache.delete("a"));
        assert!(!cache.delete("a"));
        cache.clear();
        assert_eq!(cache.stats().total, 0);
    }

    #[test]
    fn test_overwrite_refreshes_expiry() {
        let cache = ArtifactCache::new(HOUR);
        cache.set_at("k", 1, Duration::from_millis(10), 0);
        cache.set_at("k", 2, Duration::from_millis(10), 100);
        assert_eq!(cache.get_at("k", 105), Some(2));
    }

    #[test]
    fn test_disabled_cache_stores_nothing() {
        let cache = ArtifactCache::disabled();
        cache.set("k", 1);
        assert!(!cache.has("k"));
        assert!(!cache.is_enabled());
    }

    #[test]
    fn test_concurrent_inserts() {
        let cache = std::sync::Arc::new(ArtifactCache::new(HOUR));
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let cache = std::sync::Arc::clone(&cache);
                std::thread::spawn(move || {
                    for i in 0..100 {
                        cache.set(format!("{t}-{i}"), i);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(cache.stats().active, 800);
    }
}
