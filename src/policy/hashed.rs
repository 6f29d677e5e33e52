//! Hash-keyed cache with two-random-choice eviction.
//!
//! Same policy as [`OrderedCache`](crate::policy::ordered::OrderedCache), but
//! keys are located through an `FxHashMap`, so `K` only needs `Hash + Eq`
//! and lookups are O(1) on average.
//!
//! ## Sampling
//!
//! Candidates are drawn from the dense handle array in
//! [`SampleIndex`], never from the hash table's buckets. Every live entry has
//! probability `1/len` per draw regardless of how keys hash.
//!
//! Sampling buckets directly (pick a random bucket, walk forward to the next
//! occupied one) would save the dense array but is biased: an entry sitting
//! after a long run of empty buckets is reached from every bucket in that run,
//! while entries sharing a bucket with others are only reachable as the first
//! element of that bucket. That scheme is not provided.
//!
//! ## Operations
//!
//! | Operation    | Time   | Notes                                    |
//! |--------------|--------|------------------------------------------|
//! | `insert`     | O(1)*  | *Average; may evict one entry            |
//! | `find`       | O(1)*  | Refreshes recency on hit                 |
//! | `evict`      | O(1)*  | Two draws, swap-remove, one map removal  |
//! | `evict_key`  | O(1)*  |                                          |
//!
//! ## Example Usage
//!
//! ```
//! use sampled_lru::policy::hashed::HashCache;
//!
//! let mut cache = HashCache::with_seed(3, 42);
//! for (k, v) in [("a", 1), ("b", 2), ("c", 3)] {
//!     cache.insert(k, v);
//! }
//!
//! // keep "a" warm
//! cache.find(&"a");
//! cache.insert("d", 4);
//!
//! assert_eq!(cache.len(), 3);
//! assert_eq!(cache.find(&"d"), Some(&4));
//! ```

use std::fmt;
use std::hash::Hash;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use rustc_hash::FxHashMap;
use tracing::{debug, trace, warn};

use crate::ds::{MAX_RESERVE, SampleIndex, SlotId};
use crate::error::{ConfigError, InvariantError};
#[cfg(feature = "metrics")]
use crate::metrics::metrics_impl::SampledMetrics;
#[cfg(feature = "metrics")]
use crate::metrics::snapshot::SampledMetricsSnapshot;
#[cfg(feature = "metrics")]
use crate::metrics::traits::{CoreMetricsRecorder, MetricsSnapshotProvider, SamplingMetricsRecorder};
use crate::policy::DEFAULT_SEED;
use crate::traits::{CoreCache, MutableCache, ReadOnlyCache, SampledEviction};

/// Bounded cache over an `FxHashMap` with approximate-LRU eviction.
///
/// # Example
///
/// ```
/// use sampled_lru::policy::hashed::HashCache;
///
/// let mut cache = HashCache::new(100);
/// cache.insert("key", 1);
/// assert!(cache.remove_key(&"key"));
/// assert!(!cache.remove_key(&"key"));
/// ```
pub struct HashCache<K, V>
where
    K: Hash + Eq + Clone,
{
    map: FxHashMap<K, SlotId>,
    index: SampleIndex<K, V>,
    capacity: usize,
    rng: SmallRng,
    #[cfg(feature = "metrics")]
    metrics: SampledMetrics,
}

impl<K, V> HashCache<K, V>
where
    K: Hash + Eq + Clone,
{
    /// # Panics
    ///
    /// Panics if `capacity` is zero. See [`try_new`](Self::try_new).
    pub fn new(capacity: usize) -> Self {
        Self::with_seed(capacity, DEFAULT_SEED)
    }

    /// # Errors
    ///
    /// Returns [`ConfigError`] if `capacity` is zero.
    pub fn try_new(capacity: usize) -> Result<Self, ConfigError> {
        Self::try_with_seed(capacity, DEFAULT_SEED)
    }

    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn with_seed(capacity: usize, seed: u64) -> Self {
        match Self::try_with_seed(capacity, seed) {
            Ok(cache) => cache,
            Err(err) => panic!("{}", err),
        }
    }

    pub fn try_with_seed(capacity: usize, seed: u64) -> Result<Self, ConfigError> {
        if capacity == 0 {
            warn!(seed, "rejected hash cache with zero capacity");
            return Err(ConfigError::zero_capacity());
        }
        debug!(capacity, seed, "created hash sampled cache");
        Ok(Self {
            map: FxHashMap::with_capacity_and_hasher(capacity.min(MAX_RESERVE), Default::default()),
            index: SampleIndex::with_capacity(capacity),
            capacity,
            rng: SmallRng::seed_from_u64(seed),
            #[cfg(feature = "metrics")]
            metrics: SampledMetrics::default(),
        })
    }

    /// Inserts `key`, or overwrites its value and refreshes its recency.
    #[inline]
    pub fn insert(&mut self, key: K, value: V) {
        self.upsert(key, value);
    }

    fn upsert(&mut self, key: K, value: V) -> Option<V> {
        #[cfg(feature = "metrics")]
        self.metrics.record_insert_call();

        if let Some(&id) = self.map.get(&key) {
            #[cfg(feature = "metrics")]
            self.metrics.record_insert_update();
            return self
                .index
                .touch(id)
                .map(|entry| std::mem::replace(&mut entry.value, value));
        }

        // Evict before inserting so the table never holds more than
        // `capacity` keys.
        if self.index.len() >= self.capacity {
            self.evict_one();
        }

        let id = self.index.push(key.clone(), value);
        self.map.insert(key, id);
        #[cfg(feature = "metrics")]
        self.metrics.record_insert_new();
        None
    }

    /// Looks up `key`, refreshing its recency on a hit.
    pub fn find(&mut self, key: &K) -> Option<&V> {
        match self.map.get(key) {
            Some(&id) => {
                #[cfg(feature = "metrics")]
                self.metrics.record_get_hit();
                self.index.touch(id).map(|entry| &entry.value)
            },
            None => {
                #[cfg(feature = "metrics")]
                self.metrics.record_get_miss();
                None
            },
        }
    }

    pub fn peek(&self, key: &K) -> Option<&V> {
        let id = *self.map.get(key)?;
        self.index.get(id).map(|entry| &entry.value)
    }

    pub fn last_access(&self, key: &K) -> Option<u64> {
        let id = *self.map.get(key)?;
        self.index.get(id).map(|entry| entry.timestamp)
    }

    /// Runs the randomized eviction once. No-op on an empty cache.
    #[inline]
    pub fn evict(&mut self) {
        self.evict_one();
    }

    /// Draws two live entries, evicts the less recently used one, and returns
    /// it.
    pub fn evict_one(&mut self) -> Option<(K, V)> {
        #[cfg(feature = "metrics")]
        self.metrics.record_evict_call();

        let sample = self.index.sample(&mut self.rng)?;
        #[cfg(feature = "metrics")]
        {
            self.metrics.record_sample_draw();
            if sample.is_self_pair() {
                self.metrics.record_self_pair();
            }
        }

        let entry = self.index.unlink(sample.victim)?;
        self.map.remove(&entry.key);
        trace!(
            first = sample.first,
            second = sample.second,
            victim_position = entry.position,
            victim_timestamp = entry.timestamp,
            len = self.map.len(),
            "evicted sampled entry"
        );
        #[cfg(feature = "metrics")]
        self.metrics.record_evicted_entry();

        Some(entry.into_key_value())
    }

    /// Removes `key`, returning its value if it was cached.
    pub fn evict_key(&mut self, key: &K) -> Option<V> {
        #[cfg(feature = "metrics")]
        self.metrics.record_remove_call();

        let id = self.map.remove(key)?;
        let entry = self.index.unlink(id)?;
        #[cfg(feature = "metrics")]
        self.metrics.record_remove_found();
        Some(entry.value)
    }

    #[inline]
    pub fn remove_key(&mut self, key: &K) -> bool {
        self.evict_key(key).is_some()
    }

    #[inline]
    pub fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.map.clear();
        self.index.clear();
        #[cfg(feature = "metrics")]
        self.metrics.record_clear();
    }

    /// Iterates entries in dense-index order without touching recency.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.index
            .handles()
            .iter()
            .filter_map(|&id| self.index.get(id))
            .map(|entry| (&entry.key, &entry.value))
    }

    /// Verifies that the key map and the sampling index agree.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.index.check_invariants()?;
        if self.map.len() != self.index.len() {
            return Err(InvariantError::new(format!(
                "map holds {} keys but index holds {} entries",
                self.map.len(),
                self.index.len()
            )));
        }
        if self.map.len() > self.capacity {
            return Err(InvariantError::new(format!(
                "len {} exceeds capacity {}",
                self.map.len(),
                self.capacity
            )));
        }
        for (key, &id) in &self.map {
            match self.index.get(id) {
                Some(entry) if entry.key == *key => {},
                Some(_) => {
                    return Err(InvariantError::new(format!(
                        "{:?} holds a different key than the map",
                        id
                    )));
                },
                None => {
                    return Err(InvariantError::new(format!("map points at stale {:?}", id)));
                },
            }
        }
        Ok(())
    }
}

#[cfg(feature = "metrics")]
impl<K, V> HashCache<K, V>
where
    K: Hash + Eq + Clone,
{
    pub fn metrics_snapshot(&self) -> SampledMetricsSnapshot {
        SampledMetricsSnapshot::from_metrics(
            &self.metrics,
            self.map.len(),
            self.capacity,
            self.index.clock(),
        )
    }

    pub fn reset_metrics(&mut self) {
        self.metrics.reset();
    }
}

#[cfg(feature = "metrics")]
impl<K, V> MetricsSnapshotProvider<SampledMetricsSnapshot> for HashCache<K, V>
where
    K: Hash + Eq + Clone,
{
    fn snapshot(&self) -> SampledMetricsSnapshot {
        self.metrics_snapshot()
    }
}

impl<K, V> fmt::Debug for HashCache<K, V>
where
    K: Hash + Eq + Clone + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashCache")
            .field("capacity", &self.capacity)
            .field("len", &self.map.len())
            .field("clock", &self.index.clock())
            .finish_non_exhaustive()
    }
}

impl<K, V> ReadOnlyCache<K, V> for HashCache<K, V>
where
    K: Hash + Eq + Clone,
{
    #[inline]
    fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    #[inline]
    fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<K, V> CoreCache<K, V> for HashCache<K, V>
where
    K: Hash + Eq + Clone,
{
    #[inline]
    fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.upsert(key, value)
    }

    #[inline]
    fn get(&mut self, key: &K) -> Option<&V> {
        self.find(key)
    }

    fn clear(&mut self) {
        HashCache::clear(self);
    }
}

impl<K, V> MutableCache<K, V> for HashCache<K, V>
where
    K: Hash + Eq + Clone,
{
    #[inline]
    fn remove(&mut self, key: &K) -> Option<V> {
        self.evict_key(key)
    }
}

impl<K, V> SampledEviction<K, V> for HashCache<K, V>
where
    K: Hash + Eq + Clone,
{
    #[inline]
    fn evict_one(&mut self) -> Option<(K, V)> {
        HashCache::evict_one(self)
    }

    #[inline]
    fn peek(&self, key: &K) -> Option<&V> {
        HashCache::peek(self, key)
    }

    #[inline]
    fn last_access(&self, key: &K) -> Option<u64> {
        HashCache::last_access(self, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod basic_operations {
        use super::*;

        #[test]
        fn insert_and_find() {
            let mut cache = HashCache::new(100);
            cache.insert("key1", "value1");
            assert_eq!(cache.len(), 1);
            assert_eq!(cache.find(&"key1"), Some(&"value1"));
        }

        #[test]
        fn find_missing_returns_none() {
            let mut cache: HashCache<&str, i32> = HashCache::new(10);
            assert_eq!(cache.find(&"missing"), None);
        }

        #[test]
        fn update_existing_key() {
            let mut cache = HashCache::new(10);
            cache.insert("key", "initial");
            cache.insert("key", "updated");
            assert_eq!(cache.len(), 1);
            assert_eq!(cache.find(&"key"), Some(&"updated"));
        }

        #[test]
        fn string_keys_and_values() {
            let mut cache = HashCache::new(10);
            cache.insert(String::from("hello"), String::from("world"));
            cache.insert(String::from("foo"), String::from("bar"));
            assert_eq!(
                cache.find(&String::from("hello")),
                Some(&String::from("world"))
            );
            assert_eq!(cache.evict_key(&String::from("foo")), Some(String::from("bar")));
        }

        #[test]
        fn iter_visits_every_entry_once() {
            let mut cache = HashCache::new(8);
            for i in 0..8 {
                cache.insert(i, i * 2);
            }
            cache.evict_key(&3);
            let mut seen: Vec<_> = cache.iter().map(|(k, v)| (*k, *v)).collect();
            seen.sort_unstable();
            assert_eq!(seen.len(), 7);
            assert!(seen.iter().all(|(k, v)| *v == k * 2 && *k != 3));
        }

        #[test]
        fn zero_capacity_is_rejected() {
            assert!(HashCache::<u8, u8>::try_new(0).is_err());
            assert_eq!(HashCache::<u8, u8>::try_new(1).unwrap().capacity(), 1);
        }

        #[test]
        #[should_panic(expected = "capacity must be greater than zero")]
        fn new_panics_on_zero_capacity() {
            let _ = HashCache::<u8, u8>::new(0);
        }

        #[test]
        fn unbounded_capacity_constructs_and_inserts() {
            let mut cache = HashCache::<u32, u32>::try_new(usize::MAX).unwrap();
            cache.insert(1, 1);
            assert_eq!(cache.find(&1), Some(&1));
            assert!(cache.map.capacity() < usize::MAX / 2);
            cache.check_invariants().unwrap();
        }
    }

    mod eviction_behavior {
        use super::*;

        #[test]
        fn eviction_maintains_capacity() {
            let mut cache = HashCache::new(3);
            for i in 0..20 {
                cache.insert(i, i * 10);
                assert!(cache.len() <= 3);
            }
            assert_eq!(cache.len(), 3);
        }

        #[test]
        fn overflow_keeps_survivors_unchanged() {
            let mut cache = HashCache::with_seed(5, 17);
            for i in 0..5 {
                cache.insert(i, i * 100);
            }
            cache.insert(99, 9900);

            let survivors: Vec<_> = (0..5).filter(|i| cache.contains(i)).collect();
            assert_eq!(survivors.len(), 4);
            for i in survivors {
                assert_eq!(cache.peek(&i), Some(&(i * 100)));
            }
            assert_eq!(cache.peek(&99), Some(&9900));
        }

        #[test]
        fn older_of_two_is_usually_the_victim() {
            // "hot" is only evicted when both draws land on it.
            let mut cold_victims = 0;
            let mut hot_victims = 0;
            for seed in 0..64 {
                let mut cache = HashCache::with_seed(2, seed);
                cache.insert("cold", 0);
                cache.insert("hot", 1);
                match cache.evict_one() {
                    Some(("cold", _)) => cold_victims += 1,
                    Some(("hot", _)) => hot_victims += 1,
                    other => panic!("unexpected eviction {other:?}"),
                }
                assert_eq!(cache.len(), 1);
            }
            assert_eq!(cold_victims + hot_victims, 64);
            assert!(cold_victims > hot_victims);
        }

        #[test]
        fn internal_consistency_after_evictions() {
            let mut cache = HashCache::with_seed(10, 2);
            for i in 0..100 {
                cache.insert(i, i * 10);
                if i % 4 == 0 {
                    cache.find(&(i / 2));
                }
            }
            assert_eq!(cache.len(), 10);
            assert_eq!(cache.index.len(), 10);
            cache.check_invariants().unwrap();

            for (position, &id) in cache.index.handles().iter().enumerate() {
                let entry = cache.index.get(id).unwrap();
                assert_eq!(entry.position(), position);
                assert_eq!(cache.map.get(entry.key()), Some(&id));
            }
        }
    }

    mod explicit_removal {
        use super::*;

        #[test]
        fn evict_key_present_and_absent() {
            let mut cache = HashCache::new(4);
            cache.insert(1, 'a');
            cache.insert(2, 'b');

            assert_eq!(cache.evict_key(&1), Some('a'));
            assert_eq!(cache.len(), 1);
            assert_eq!(cache.evict_key(&1), None);
            assert_eq!(cache.len(), 1);
            assert_eq!(cache.find(&2), Some(&'b'));
        }

        #[test]
        fn removal_frees_room_without_eviction() {
            let mut cache = HashCache::new(2);
            cache.insert(1, 1);
            cache.insert(2, 2);
            cache.remove_key(&1);
            cache.insert(3, 3);
            assert!(cache.contains(&2));
            assert!(cache.contains(&3));
        }
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;
        use std::collections::HashMap;

        proptest! {
            // Below capacity nothing is evicted, so the cache must agree with
            // a plain map.
            #[test]
            fn matches_model_while_under_capacity(
                ops in prop::collection::vec((0u8..32, any::<u32>(), any::<bool>()), 0..150),
            ) {
                let mut cache = HashCache::with_seed(32, 0);
                let mut model = HashMap::new();
                for (key, value, is_insert) in ops {
                    if is_insert {
                        cache.insert(key, value);
                        model.insert(key, value);
                    } else {
                        prop_assert_eq!(cache.evict_key(&key), model.remove(&key));
                    }
                    prop_assert_eq!(cache.len(), model.len());
                }
                for (key, value) in &model {
                    prop_assert_eq!(cache.find(key), Some(value));
                }
                prop_assert!(cache.check_invariants().is_ok());
            }

            #[test]
            fn capacity_bound_holds(
                capacity in 1usize..16,
                seed in any::<u64>(),
                keys in prop::collection::vec(any::<u16>(), 0..300),
            ) {
                let mut cache = HashCache::with_seed(capacity, seed);
                for key in keys {
                    cache.insert(key, ());
                    prop_assert!(cache.len() <= capacity);
                    prop_assert!(cache.contains(&key));
                }
                prop_assert!(cache.check_invariants().is_ok());
            }
        }
    }

    #[cfg(feature = "metrics")]
    mod metrics {
        use super::*;

        #[test]
        fn self_pairs_are_counted_on_single_entry() {
            let mut cache = HashCache::with_seed(1, 9);
            cache.insert(1, 1);
            cache.insert(2, 2);
            let snap = cache.metrics_snapshot();
            assert_eq!(snap.sample_draws, 1);
            assert_eq!(snap.self_pairs, 1);
            assert_eq!(snap.evicted_entries, 1);

            cache.reset_metrics();
            assert_eq!(cache.metrics_snapshot().sample_draws, 0);
        }
    }
}
