//! Unique resource names for concurrently running scenarios.

/// Build `<prefix>-<resource>-<16 hex chars>`, e.g. `redis-service-3f9c0a1b2c3d4e5f`.
///
/// Uniqueness of these names is what keeps concurrent scenarios from
/// touching each other's platform resources.
#[must_use]
pub fn prefixed_random_name(prefix: &str, resource: &str) -> String {
    use std::collections::hash_map::RandomState;
    use std::hash::{BuildHasher, Hasher};

    let mut hasher = RandomState::new().build_hasher();
    hasher.write_u128(
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0),
    );
    hasher.write(prefix.as_bytes());
    hasher.write(resource.as_bytes());
    hasher.write_u64(RandomState::new().build_hasher().finish());
    format!("{prefix}-{resource}-{:016x}", hasher.finish())
}
