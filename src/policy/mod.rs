//! Sampled-LRU cache variants.
//!
//! - [`ordered::OrderedCache`]: `BTreeMap` key store, `K: Ord`.
//! - [`hashed::HashCache`]: `FxHashMap` key store, `K: Hash + Eq`.
//!
//! Both evict with the same two-random-choice policy over a shared
//! [`SampleIndex`](crate::ds::SampleIndex) and behave identically apart from
//! lookup cost and iteration order.

pub mod hashed;
pub mod ordered;

/// Seed for the eviction generator when the caller does not supply one.
pub const DEFAULT_SEED: u64 = 0x9e37_79b9_7f4a_7c15;
