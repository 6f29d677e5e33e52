//! Unified cache builder for both backing stores.
//!
//! Picks the key store at runtime and hides the concrete cache type behind
//! [`Cache`].
//!
//! ## Example
//!
//! ```rust
//! use sampled_lru::builder::{Backing, CacheBuilder};
//!
//! let mut cache = CacheBuilder::new(100)
//!     .backing(Backing::Ordered)
//!     .seed(7)
//!     .build::<u64, String>();
//! cache.insert(1, "hello".to_string());
//! assert_eq!(cache.find(&1), Some(&"hello".to_string()));
//! ```

use std::hash::Hash;

use crate::error::ConfigError;
use crate::policy::DEFAULT_SEED;
use crate::policy::hashed::HashCache;
use crate::policy::ordered::OrderedCache;

/// Key store behind a [`Cache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backing {
    /// `BTreeMap`, O(log n) lookups, `K: Ord`.
    Ordered,
    /// `FxHashMap`, O(1) average lookups, `K: Hash + Eq`.
    #[default]
    Hash,
}

/// Plain configuration record for a [`Cache`].
///
/// | Field      | Type      | Default          |
/// |------------|-----------|------------------|
/// | `capacity` | `usize`   | 1000             |
/// | `seed`     | `u64`     | [`DEFAULT_SEED`] |
/// | `backing`  | `Backing` | `Backing::Hash`  |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    pub capacity: usize,
    pub seed: u64,
    pub backing: Backing,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: 1000,
            seed: DEFAULT_SEED,
            backing: Backing::default(),
        }
    }
}

/// Cache wrapper with one API regardless of backing store.
pub struct Cache<K, V>
where
    K: Ord + Hash + Clone,
{
    inner: CacheInner<K, V>,
}

enum CacheInner<K, V>
where
    K: Ord + Hash + Clone,
{
    Ordered(OrderedCache<K, V>),
    Hash(HashCache<K, V>),
}

impl<K, V> Cache<K, V>
where
    K: Ord + Hash + Clone,
{
    /// Builds a cache from a [`CacheConfig`].
    pub fn try_from_config(config: CacheConfig) -> Result<Self, ConfigError> {
        let inner = match config.backing {
            Backing::Ordered => {
                CacheInner::Ordered(OrderedCache::try_with_seed(config.capacity, config.seed)?)
            },
            Backing::Hash => {
                CacheInner::Hash(HashCache::try_with_seed(config.capacity, config.seed)?)
            },
        };
        Ok(Self { inner })
    }

    pub fn backing(&self) -> Backing {
        match &self.inner {
            CacheInner::Ordered(_) => Backing::Ordered,
            CacheInner::Hash(_) => Backing::Hash,
        }
    }

    /// Inserts or overwrites `key`, refreshing its recency.
    pub fn insert(&mut self, key: K, value: V) {
        match &mut self.inner {
            CacheInner::Ordered(cache) => cache.insert(key, value),
            CacheInner::Hash(cache) => cache.insert(key, value),
        }
    }

    /// Looks up `key`, refreshing its recency on a hit.
    pub fn find(&mut self, key: &K) -> Option<&V> {
        match &mut self.inner {
            CacheInner::Ordered(cache) => cache.find(key),
            CacheInner::Hash(cache) => cache.find(key),
        }
    }

    pub fn peek(&self, key: &K) -> Option<&V> {
        match &self.inner {
            CacheInner::Ordered(cache) => cache.peek(key),
            CacheInner::Hash(cache) => cache.peek(key),
        }
    }

    /// Runs the randomized eviction once.
    pub fn evict(&mut self) {
        match &mut self.inner {
            CacheInner::Ordered(cache) => cache.evict(),
            CacheInner::Hash(cache) => cache.evict(),
        }
    }

    /// Removes `key`, returning its value if it was cached.
    pub fn evict_key(&mut self, key: &K) -> Option<V> {
        match &mut self.inner {
            CacheInner::Ordered(cache) => cache.evict_key(key),
            CacheInner::Hash(cache) => cache.evict_key(key),
        }
    }

    pub fn contains(&self, key: &K) -> bool {
        match &self.inner {
            CacheInner::Ordered(cache) => cache.contains(key),
            CacheInner::Hash(cache) => cache.contains(key),
        }
    }

    pub fn len(&self) -> usize {
        match &self.inner {
            CacheInner::Ordered(cache) => cache.len(),
            CacheInner::Hash(cache) => cache.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        match &self.inner {
            CacheInner::Ordered(cache) => cache.capacity(),
            CacheInner::Hash(cache) => cache.capacity(),
        }
    }

    pub fn clear(&mut self) {
        match &mut self.inner {
            CacheInner::Ordered(cache) => cache.clear(),
            CacheInner::Hash(cache) => cache.clear(),
        }
    }
}

/// Builder for [`Cache`] instances.
#[derive(Debug, Clone, Copy)]
pub struct CacheBuilder {
    config: CacheConfig,
}

impl CacheBuilder {
    /// Starts from the default config with the given capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            config: CacheConfig {
                capacity,
                ..CacheConfig::default()
            },
        }
    }

    pub fn from_config(config: CacheConfig) -> Self {
        Self { config }
    }

    /// Seeds the eviction generator for reproducible victims.
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    pub fn backing(mut self, backing: Backing) -> Self {
        self.config.backing = backing;
        self
    }

    pub fn config(&self) -> CacheConfig {
        self.config
    }

    /// # Errors
    ///
    /// Returns [`ConfigError`] if the capacity is zero.
    pub fn try_build<K, V>(self) -> Result<Cache<K, V>, ConfigError>
    where
        K: Ord + Hash + Clone,
    {
        Cache::try_from_config(self.config)
    }

    /// # Panics
    ///
    /// Panics if the capacity is zero. See [`try_build`](Self::try_build).
    pub fn build<K, V>(self) -> Cache<K, V>
    where
        K: Ord + Hash + Clone,
    {
        match self.try_build() {
            Ok(cache) => cache,
            Err(err) => panic!("{}", err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_backings_basic_ops() {
        for backing in [Backing::Ordered, Backing::Hash] {
            let mut cache = CacheBuilder::new(10).backing(backing).build::<u64, String>();
            assert_eq!(cache.backing(), backing);

            cache.insert(1, "one".to_string());
            cache.insert(2, "two".to_string());
            assert_eq!(cache.find(&1), Some(&"one".to_string()));
            assert_eq!(cache.peek(&2), Some(&"two".to_string()));
            assert_eq!(cache.find(&3), None);
            assert!(cache.contains(&1));
            assert_eq!(cache.len(), 2);

            cache.insert(1, "ONE".to_string());
            assert_eq!(cache.find(&1), Some(&"ONE".to_string()));

            assert_eq!(cache.evict_key(&2), Some("two".to_string()));
            cache.evict();
            assert!(cache.is_empty());

            cache.insert(5, "five".to_string());
            cache.clear();
            assert!(cache.is_empty());
            assert_eq!(cache.capacity(), 10);
        }
    }

    #[test]
    fn capacity_enforcement() {
        for backing in [Backing::Ordered, Backing::Hash] {
            let mut cache = CacheBuilder::new(2).backing(backing).seed(3).build::<u64, u64>();
            cache.insert(1, 1);
            cache.insert(2, 2);
            cache.insert(3, 3);
            assert_eq!(cache.len(), 2);
            assert!(cache.contains(&3));
            assert!(cache.contains(&1) ^ cache.contains(&2));
        }
    }

    #[test]
    fn zero_capacity_fails_to_build() {
        let err = CacheBuilder::new(0).try_build::<u8, u8>().err();
        assert_eq!(err, Some(ConfigError::zero_capacity()));
    }

    #[test]
    #[should_panic(expected = "capacity must be greater than zero")]
    fn build_panics_on_zero_capacity() {
        let _ = CacheBuilder::new(0).build::<u8, u8>();
    }

    #[test]
    fn unbounded_capacity_builds_for_both_backings() {
        for backing in [Backing::Ordered, Backing::Hash] {
            let mut cache = CacheBuilder::new(usize::MAX).backing(backing).build::<u32, u32>();
            cache.insert(7, 70);
            assert_eq!(cache.find(&7), Some(&70));
        }
    }

    #[test]
    fn config_defaults() {
        let config = CacheConfig::default();
        assert_eq!(config.capacity, 1000);
        assert_eq!(config.seed, DEFAULT_SEED);
        assert_eq!(config.backing, Backing::Hash);
        assert_eq!(CacheBuilder::from_config(config).config(), config);
    }
}
