//! Parameter-keyed cache slots
//!
//! Expensive background data (hill profile, cloud noise texture, shimmer
//! layout) survives across frames in a [`CacheEntry`]. An entry is reused only
//! while both its generation and its parameter key match the caller's; any
//! mismatch regenerates it. Bumping the generation invalidates every entry at
//! once without touching them.
//!
//! Parameter keys and seeds derived from them come from [`ParamHasher`], a
//! 64-bit FNV-1a hasher, so they are identical across toolchains and runs.

use std::hash::Hasher;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Stable 64-bit FNV-1a hasher for cache keys and layout seeds
#[derive(Debug, Clone, Copy)]
pub struct ParamHasher(u64);

impl Default for ParamHasher {
    fn default() -> Self {
        Self(FNV_OFFSET)
    }
}

impl Hasher for ParamHasher {
    fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.0 ^= u64::from(byte);
            self.0 = self.0.wrapping_mul(FNV_PRIME);
        }
    }

    fn finish(&self) -> u64 {
        self.0
    }
}

/// Cached value tagged with the generation and parameter key it was built for
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    slot: Option<Slot<V>>,
    rebuilds: u64,
}

#[derive(Debug, Clone)]
struct Slot<V> {
    generation: u64,
    key: u64,
    value: V,
}

impl<V> Default for CacheEntry<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> CacheEntry<V> {
    /// Empty entry
    pub fn new() -> Self {
        Self { slot: None, rebuilds: 0 }
    }

    /// Whether a value exists for this generation and key
    pub fn is_valid(&self, generation: u64, key: u64) -> bool {
        self.slot.as_ref().is_some_and(|s| s.generation == generation && s.key == key)
    }

    /// Return the cached value, rebuilding it first if it is stale
    pub fn get_or_insert_with(&mut self, generation: u64, key: u64, build: impl FnOnce() -> V) -> &V {
        if !self.is_valid(generation, key) {
            self.slot = None;
        }
        let rebuilds = &mut self.rebuilds;
        &self
            .slot
            .get_or_insert_with(|| {
                log::trace!("Rebuilding {} (generation {generation})", std::any::type_name::<V>());
                *rebuilds += 1;
                Slot { generation, key, value: build() }
            })
            .value
    }

    /// Drop the cached value
    pub fn invalidate(&mut self) {
        self.slot = None;
    }

    /// Number of times the value has been built
    pub fn rebuilds(&self) -> u64 {
        self.rebuilds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reuses_until_key_or_generation_changes() {
        let mut entry = CacheEntry::new();
        assert_eq!(*entry.get_or_insert_with(0, 7, || 1), 1);
        assert_eq!(*entry.get_or_insert_with(0, 7, || 2), 1);
        assert_eq!(*entry.get_or_insert_with(0, 8, || 3), 3);
        assert_eq!(*entry.get_or_insert_with(1, 8, || 4), 4);
        assert_eq!(entry.rebuilds(), 3);
    }

    #[test]
    fn test_param_hasher_is_fnv1a() {
        let empty = ParamHasher::default();
        assert_eq!(empty.finish(), 0xcbf2_9ce4_8422_2325);

        let mut hasher = ParamHasher::default();
        hasher.write(b"a");
        assert_eq!(hasher.finish(), 0xaf63_dc4c_8601_ec8c);

        let mut hasher = ParamHasher::default();
        hasher.write(b"foobar");
        assert_eq!(hasher.finish(), 0x8594_4171_f739_67e8);
    }

    #[test]
    fn test_invalidate_forces_rebuild() {
        let mut entry = CacheEntry::new();
        entry.get_or_insert_with(0, 0, || "a");
        entry.invalidate();
        assert!(!entry.is_valid(0, 0));
        assert_eq!(*entry.get_or_insert_with(0, 0, || "b"), "b");
    }
}
