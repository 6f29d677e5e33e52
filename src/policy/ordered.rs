//! Ordered-key cache with two-random-choice eviction.
//!
//! Keys live in a `BTreeMap` that maps each key to a stable [`SlotId`]; the
//! entries themselves (value, timestamp, position) live in a shared
//! [`SampleIndex`]. When the cache is full, two live entries are drawn
//! uniformly at random and the one used less recently is evicted.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────────┐
//! │                       OrderedCache<K, V> Layout                             │
//! │                                                                             │
//! │   map: BTreeMap<K, SlotId>         index: SampleIndex<K, V>                 │
//! │                                                                             │
//! │   ┌──────────┬────────┐            slots                     dense          │
//! │   │  "alpha" │  #0    │──────►  #0 (alpha, v, ts=7, pos=2)   ┌────┬────┬────┐│
//! │   │  "beta"  │  #2    │──────►  #2 (beta,  v, ts=3, pos=0)   │ #2 │ #1 │ #0 ││
//! │   │  "gamma" │  #1    │──────►  #1 (gamma, v, ts=5, pos=1)   └────┴────┴────┘│
//! │   └──────────┴────────┘                                        0    1    2  │
//! │                                                                             │
//! │   Eviction (two random choices):                                            │
//! │     1. i = rand[0, len), j = rand[0, len)   (with replacement)              │
//! │     2. victim = older of dense[i], dense[j]                                 │
//! │     3. dense.swap_remove(victim.pos); patch moved entry's pos               │
//! │     4. map.remove(victim.key)                                               │
//! └─────────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Insert Flow
//! ───────────
//!
//! ```text
//!   insert(key, value):
//!     map.entry(key)              one O(log n) probe
//!       Occupied → stamp with next clock value, overwrite value
//!       Vacant   → allocate entry, fill the vacant map slot
//!                  evict once if len >= capacity (new entry not yet sampleable)
//!                  append handle to dense array
//! ```
//!
//! ## Operations
//!
//! | Operation    | Time       | Notes                                     |
//! |--------------|------------|-------------------------------------------|
//! | `insert`     | O(log n)   | Single map probe, may evict one entry     |
//! | `find`       | O(log n)   | Refreshes recency on hit                  |
//! | `peek`       | O(log n)   | No recency refresh                        |
//! | `evict`      | O(log n)   | O(1) sampling + O(log n) map removal      |
//! | `evict_key`  | O(log n)   | Swap-remove compaction in the index       |
//! | `len`        | O(1)       |                                           |
//!
//! ## Thread Safety
//!
//! Not thread-safe. Guard with a `Mutex` or shard across instances.
//!
//! ## Example Usage
//!
//! ```
//! use sampled_lru::policy::ordered::OrderedCache;
//!
//! let mut cache = OrderedCache::with_seed(2, 7);
//! cache.insert("a", 1);
//! cache.insert("b", 2);
//! cache.insert("c", 3); // evicts "a" or "b"
//!
//! assert_eq!(cache.find(&"c"), Some(&3));
//! assert_eq!(cache.len(), 2);
//! assert!(cache.contains(&"a") ^ cache.contains(&"b"));
//! ```

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::fmt;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::{debug, trace, warn};

use crate::ds::{SampleIndex, SlotId};
use crate::error::{ConfigError, InvariantError};
#[cfg(feature = "metrics")]
use crate::metrics::metrics_impl::SampledMetrics;
#[cfg(feature = "metrics")]
use crate::metrics::snapshot::SampledMetricsSnapshot;
#[cfg(feature = "metrics")]
use crate::metrics::traits::{CoreMetricsRecorder, MetricsSnapshotProvider, SamplingMetricsRecorder};
use crate::policy::DEFAULT_SEED;
use crate::traits::{CoreCache, MutableCache, ReadOnlyCache, SampledEviction};

/// Bounded cache over a `BTreeMap` with approximate-LRU eviction.
///
/// # Type Parameters
///
/// - `K`: Key type, must be `Ord + Clone` (one clone is kept in the entry)
/// - `V`: Value type
///
/// # Example
///
/// ```
/// use sampled_lru::policy::ordered::OrderedCache;
///
/// let mut cache = OrderedCache::new(100);
/// cache.insert(1, "one");
/// cache.insert(1, "uno");
///
/// assert_eq!(cache.find(&1), Some(&"uno"));
/// assert_eq!(cache.evict_key(&1), Some("uno"));
/// assert_eq!(cache.find(&1), None);
/// ```
pub struct OrderedCache<K, V>
where
    K: Ord + Clone,
{
    map: BTreeMap<K, SlotId>,
    index: SampleIndex<K, V>,
    capacity: usize,
    rng: SmallRng,
    #[cfg(feature = "metrics")]
    metrics: SampledMetrics,
}

impl<K, V> OrderedCache<K, V>
where
    K: Ord + Clone,
{
    /// Creates a cache holding at most `capacity` entries, seeded with
    /// [`DEFAULT_SEED`].
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero. See [`try_new`](Self::try_new).
    pub fn new(capacity: usize) -> Self {
        Self::with_seed(capacity, DEFAULT_SEED)
    }

    /// Fallible [`new`](Self::new).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `capacity` is zero.
    pub fn try_new(capacity: usize) -> Result<Self, ConfigError> {
        Self::try_with_seed(capacity, DEFAULT_SEED)
    }

    /// Creates a cache whose eviction draws are reproducible for `seed`.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn with_seed(capacity: usize, seed: u64) -> Self {
        match Self::try_with_seed(capacity, seed) {
            Ok(cache) => cache,
            Err(err) => panic!("{}", err),
        }
    }

    /// Fallible [`with_seed`](Self::with_seed).
    pub fn try_with_seed(capacity: usize, seed: u64) -> Result<Self, ConfigError> {
        if capacity == 0 {
            warn!(seed, "rejected ordered cache with zero capacity");
            return Err(ConfigError::zero_capacity());
        }
        debug!(capacity, seed, "created ordered sampled cache");
        Ok(Self {
            map: BTreeMap::new(),
            index: SampleIndex::with_capacity(capacity),
            capacity,
            rng: SmallRng::seed_from_u64(seed),
            #[cfg(feature = "metrics")]
            metrics: SampledMetrics::default(),
        })
    }

    /// Inserts `key`, or overwrites its value and refreshes its recency if it
    /// is already cached.
    ///
    /// A new key arriving at a full cache evicts one sampled entry first.
    #[inline]
    pub fn insert(&mut self, key: K, value: V) {
        self.upsert(key, value);
    }

    fn upsert(&mut self, key: K, value: V) -> Option<V> {
        #[cfg(feature = "metrics")]
        self.metrics.record_insert_call();

        match self.map.entry(key) {
            Entry::Occupied(slot) => {
                let id = *slot.get();
                #[cfg(feature = "metrics")]
                self.metrics.record_insert_update();
                self.index
                    .touch(id)
                    .map(|entry| std::mem::replace(&mut entry.value, value))
            },
            Entry::Vacant(slot) => {
                let id = self.index.allocate(slot.key().clone(), value);
                slot.insert(id);
                if self.index.len() >= self.capacity {
                    self.evict_one();
                }
                self.index.link(id);
                #[cfg(feature = "metrics")]
                self.metrics.record_insert_new();
                None
            },
        }
    }

    /// Looks up `key`. A hit counts as a use and refreshes its recency.
    ///
    /// ```
    /// use sampled_lru::policy::ordered::OrderedCache;
    ///
    /// let mut cache = OrderedCache::new(4);
    /// cache.insert("k", 42);
    /// let before = cache.last_access(&"k").unwrap();
    ///
    /// assert_eq!(cache.find(&"k"), Some(&42));
    /// assert!(cache.last_access(&"k").unwrap() > before);
    /// assert_eq!(cache.find(&"missing"), None);
    /// ```
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

    /// Looks up `key` without refreshing its recency.
    pub fn peek(&self, key: &K) -> Option<&V> {
        let id = *self.map.get(key)?;
        self.index.get(id).map(|entry| &entry.value)
    }

    /// Clock value recorded at the key's last insert or hit.
    pub fn last_access(&self, key: &K) -> Option<u64> {
        let id = *self.map.get(key)?;
        self.index.get(id).map(|entry| entry.timestamp)
    }

    /// Runs the randomized eviction once. No-op on an empty cache.
    #[inline]
    pub fn evict(&mut self) {
        self.evict_one();
    }

    /// Runs the randomized eviction once and returns the evicted pair.
    ///
    /// Also runs from `insert` while the new entry is allocated but not yet
    /// linked, so the new key is never its own victim.
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

    /// Removes `key` and reports whether it was cached.
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

    /// Removes every entry. Timestamps keep increasing afterwards.
    pub fn clear(&mut self) {
        self.map.clear();
        self.index.clear();
        #[cfg(feature = "metrics")]
        self.metrics.record_clear();
    }

    /// Iterates entries in ascending key order without touching recency.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.map
            .iter()
            .filter_map(|(key, &id)| self.index.get(id).map(|entry| (key, &entry.value)))
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
            let entry = self
                .index
                .get(id)
                .ok_or_else(|| InvariantError::new(format!("map points at stale {:?}", id)))?;
            if entry.key != *key {
                return Err(InvariantError::new(format!(
                    "{:?} holds a different key than the map",
                    id
                )));
            }
        }
        Ok(())
    }
}

#[cfg(feature = "metrics")]
impl<K, V> OrderedCache<K, V>
where
    K: Ord + Clone,
{
    /// Returns a snapshot of cache metrics.
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
impl<K, V> MetricsSnapshotProvider<SampledMetricsSnapshot> for OrderedCache<K, V>
where
    K: Ord + Clone,
{
    fn snapshot(&self) -> SampledMetricsSnapshot {
        self.metrics_snapshot()
    }
}

impl<K, V> fmt::Debug for OrderedCache<K, V>
where
    K: Ord + Clone + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderedCache")
            .field("capacity", &self.capacity)
            .field("len", &self.map.len())
            .field("clock", &self.index.clock())
            .finish_non_exhaustive()
    }
}

impl<K, V> ReadOnlyCache<K, V> for OrderedCache<K, V>
where
    K: Ord + Clone,
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

impl<K, V> CoreCache<K, V> for OrderedCache<K, V>
where
    K: Ord + Clone,
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
        OrderedCache::clear(self);
    }
}

impl<K, V> MutableCache<K, V> for OrderedCache<K, V>
where
    K: Ord + Clone,
{
    #[inline]
    fn remove(&mut self, key: &K) -> Option<V> {
        self.evict_key(key)
    }
}

impl<K, V> SampledEviction<K, V> for OrderedCache<K, V>
where
    K: Ord + Clone,
{
    #[inline]
    fn evict_one(&mut self) -> Option<(K, V)> {
        OrderedCache::evict_one(self)
    }

    #[inline]
    fn peek(&self, key: &K) -> Option<&V> {
        OrderedCache::peek(self, key)
    }

    #[inline]
    fn last_access(&self, key: &K) -> Option<u64> {
        OrderedCache::last_access(self, key)
    }
}
