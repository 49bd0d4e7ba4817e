//! Content-addressed cache keys.

use serde_json::{Map, Value};

use crate::schema::AvatarConfig;

/// Hex characters kept from the digest.
const KEY_LEN: usize = 16;

/// Canonical bytes for a configuration.
///
/// Top-level keys are sorted; nested objects keep their serialized order.
fn canonical_bytes(config: &AvatarConfig) -> Vec<u8> {
    let value = match serde_json::to_value(config) {
        Ok(Value::Object(map)) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(entries.into_iter().collect::<Map<_, _>>())
        }
        Ok(other) => other,
        Err(_) => Value::Null,
    };
    serde_json::to_vec(&value).unwrap_or_default()
}

/// Stable cache key for a validated configuration.
pub fn generate_key(config: &AvatarConfig) -> String {
    let hash = blake3::hash(&canonical_bytes(config));
    hex::encode(&hash.as_bytes()[..KEY_LEN / 2])
}

/// Seed for per-configuration randomness (noise textures).
pub fn config_seed(config: &AvatarConfig) -> u64 {
    let hash = blake3::hash(&canonical_bytes(config));
    let mut seed = [0u8; 8];
    seed.copy_from_slice(&hash.as_bytes()[..8]);
    u64::from_le_bytes(seed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_shape() {
        let key = generate_key(&AvatarConfig::named("Ada"));
        assert_eq!(key.len(), KEY_LEN);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_equal_configs_equal_keys() {
        let a = AvatarConfig::named("Ada");
        let b = AvatarConfig::named("Ada");
        assert_eq!(generate_key(&a), generate_key(&b));
        assert_eq!(config_seed(&a), config_seed(&b));
    }

    #[test]
    fn test_any_field_changes_key() {
        let base = AvatarConfig::named("Ada");
        let mut renamed = base.clone();
        renamed.name = "Grace".into();
        let mut qr = base.clone();
        qr.generate_qr = true;
        let mut weight = base.clone();
        weight.typography.weight = 700;

        let key = generate_key(&base);
        for other in [renamed, qr, weight] {
            assert_ne!(key, generate_key(&other));
        }
    }

    #[test]
    fn test_top_level_keys_sorted() {
        let bytes = canonical_bytes(&AvatarConfig::named("Ada"));
        let value: Value = serde_json::from_slice(&bytes).unwrap();
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }
}
