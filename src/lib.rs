//! sampled-lru: bounded in-memory caches with two-random-choice eviction.
//!
//! When a cache is full, two live entries are drawn uniformly at random and
//! the one with the older logical-clock stamp is evicted. This approximates
//! LRU without an access list: each entry carries one timestamp and one
//! position in a dense sampling array, and eviction is O(1) apart from the
//! key-map removal.
//!
//! - [`OrderedCache`]: `BTreeMap` key store.
//! - [`HashCache`]: `FxHashMap` key store.
//! - [`builder::CacheBuilder`]: pick either at runtime.
//!
//! Caches are single-owner and unsynchronized. Each owns its own seeded
//! generator, so two instances never share random state.

pub mod builder;
pub mod ds;
pub mod error;
#[cfg(feature = "metrics")]
pub mod metrics;
pub mod policy;
pub mod prelude;
pub mod traits;

pub use crate::builder::{Backing, Cache, CacheBuilder, CacheConfig};
pub use crate::error::{ConfigError, InvariantError};
pub use crate::policy::hashed::HashCache;
pub use crate::policy::ordered::OrderedCache;
