//! # Cache Trait Hierarchy
//!
//! Shared interface for the sampled caches, so callers can be written once
//! against either backing store.
//!
//! ## Architecture
//!
//! ```text
//!   ┌─────────────────────────────────────────┐
//!   │          ReadOnlyCache<K, V>            │
//!   │  contains(&, &K) → bool                 │
//!   │  len(&) → usize                         │
//!   │  is_empty(&) → bool                     │
//!   │  capacity(&) → usize                    │
//!   └──────────────────┬──────────────────────┘
//!                      ▼
//!   ┌─────────────────────────────────────────┐
//!   │            CoreCache<K, V>              │
//!   │  insert(&mut, K, V) → Option<V>         │
//!   │  get(&mut, &K) → Option<&V>             │
//!   │  clear(&mut)                            │
//!   └──────────────────┬──────────────────────┘
//!                      ▼
//!   ┌─────────────────────────────────────────┐
//!   │           MutableCache<K, V>            │
//!   │  remove(&mut, &K) → Option<V>           │
//!   │  remove_batch(&mut, &[K])               │
//!   └──────────────────┬──────────────────────┘
//!                      ▼
//!   ┌─────────────────────────────────────────┐
//!   │          SampledEviction<K, V>          │
//!   │  evict_one(&mut) → Option<(K, V)>       │
//!   │  peek(&, &K) → Option<&V>               │
//!   │  last_access(&, &K) → Option<u64>       │
//!   └─────────────────────────────────────────┘
//! ```
//!
//! ## Trait Summary
//!
//! | Trait             | Extends         | Purpose                                 |
//! |-------------------|-----------------|-----------------------------------------|
//! | `ReadOnlyCache`   | -               | Queries that never touch recency        |
//! | `CoreCache`       | `ReadOnlyCache` | Insert, recency-refreshing get, clear   |
//! | `MutableCache`    | `CoreCache`     | Arbitrary key removal                   |
//! | `SampledEviction` | `MutableCache`  | Two-random-choice eviction and clocks   |
//!
//! ## Thread Safety
//!
//! None of the implementations synchronize internally. Wrap a cache in a
//! `Mutex` or shard keys across independent instances for shared use.

/// Read-only cache queries. None of these refresh recency.
pub trait ReadOnlyCache<K, V> {
    /// Returns `true` if `key` is cached.
    fn contains(&self, key: &K) -> bool;

    /// Returns the number of cached entries.
    fn len(&self) -> usize;

    /// Returns `true` if nothing is cached.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the fixed maximum number of entries.
    fn capacity(&self) -> usize;
}

/// Core cache operations.
///
/// # Example
///
/// ```
/// use sampled_lru::policy::hashed::HashCache;
/// use sampled_lru::traits::{CoreCache, ReadOnlyCache};
///
/// fn warm_cache<C: CoreCache<u64, String>>(cache: &mut C, data: &[(u64, String)]) {
///     for (key, value) in data {
///         cache.insert(*key, value.clone());
///     }
/// }
///
/// let mut cache = HashCache::new(100);
/// warm_cache(&mut cache, &[(1, "one".to_string()), (2, "two".to_string())]);
/// assert_eq!(cache.len(), 2);
/// ```
pub trait CoreCache<K, V>: ReadOnlyCache<K, V> {
    /// Inserts or overwrites `key`, returning the previous value if any.
    ///
    /// Inserting a new key into a full cache evicts one entry first.
    ///
    /// ```
    /// use sampled_lru::policy::ordered::OrderedCache;
    /// use sampled_lru::traits::CoreCache;
    ///
    /// let mut cache = OrderedCache::new(10);
    /// assert_eq!(CoreCache::insert(&mut cache, 1, "first"), None);
    /// assert_eq!(CoreCache::insert(&mut cache, 1, "second"), Some("first"));
    /// ```
    fn insert(&mut self, key: K, value: V) -> Option<V>;

    /// Looks up `key`, counting a hit as a use for eviction purposes.
    fn get(&mut self, key: &K) -> Option<&V>;

    /// Removes every entry.
    fn clear(&mut self);
}

/// Caches that support arbitrary key-based removal.
///
/// # Example
///
/// ```
/// use sampled_lru::policy::ordered::OrderedCache;
/// use sampled_lru::traits::{MutableCache, ReadOnlyCache};
///
/// fn invalidate_keys<C: MutableCache<u64, String>>(cache: &mut C, keys: &[u64]) {
///     for key in keys {
///         cache.remove(key);
///     }
/// }
///
/// let mut cache = OrderedCache::new(100);
/// cache.insert(1, "one".to_string());
/// cache.insert(2, "two".to_string());
/// cache.insert(3, "three".to_string());
///
/// invalidate_keys(&mut cache, &[1, 3]);
/// assert!(!cache.contains(&1));
/// assert!(cache.contains(&2));
/// assert!(!cache.contains(&3));
/// ```
pub trait MutableCache<K, V>: CoreCache<K, V> {
    /// Removes `key`, returning its value if it was cached.
    fn remove(&mut self, key: &K) -> Option<V>;

    /// Removes several keys; results are in input order.
    fn remove_batch(&mut self, keys: &[K]) -> Vec<Option<V>> {
        keys.iter().map(|k| self.remove(k)).collect()
    }
}

/// Caches evicting by two-random-choice over a logical clock.
pub trait SampledEviction<K, V>: MutableCache<K, V> {
    /// Runs the randomized eviction once and returns the victim, or `None`
    /// if the cache is empty.
    fn evict_one(&mut self) -> Option<(K, V)>;

    /// Looks up `key` without refreshing its recency.
    fn peek(&self, key: &K) -> Option<&V>;

    /// Clock value recorded at the key's last insert or hit.
    fn last_access(&self, key: &K) -> Option<u64>;
}
