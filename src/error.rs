//! Error types for sampled-lru.
//!
//! ## Key Components
//!
//! - [`ConfigError`]: Returned when a cache is configured with invalid
//!   parameters. Zero capacity is the only invalid configuration today.
//! - [`InvariantError`]: Returned by `check_invariants` when the storage map,
//!   entry slots, and sampling index disagree.
//!
//! Lookups and removals of absent keys are not errors: they report `None` or
//! `false`.
//!
//! ## Example Usage
//!
//! ```
//! use sampled_lru::error::ConfigError;
//! use sampled_lru::policy::hashed::HashCache;
//!
//! let cache: Result<HashCache<u64, String>, ConfigError> = HashCache::try_new(64);
//! assert!(cache.is_ok());
//!
//! let bad = HashCache::<u64, String>::try_new(0);
//! assert!(bad.is_err());
//! ```

use std::fmt;

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Error returned when cache configuration parameters are invalid.
///
/// Produced by fallible constructors such as
/// [`OrderedCache::try_new`](crate::policy::ordered::OrderedCache::try_new)
/// and [`CacheBuilder::try_build`](crate::builder::CacheBuilder::try_build).
///
/// # Example
///
/// ```
/// use sampled_lru::policy::ordered::OrderedCache;
///
/// let err = OrderedCache::<u64, u64>::try_new(0).unwrap_err();
/// assert!(err.to_string().contains("capacity"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(String);

impl ConfigError {
    /// Creates a new `ConfigError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// The error every constructor returns for `capacity == 0`.
    #[inline]
    pub fn zero_capacity() -> Self {
        Self::new("cache capacity must be greater than zero")
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// Error returned when internal cache invariants are violated.
///
/// Carries a description of the first check that failed, e.g. a slot whose
/// recorded position does not match where its handle sits in the sampling
/// index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for InvariantError {}
