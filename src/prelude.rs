pub use crate::builder::{Backing, Cache, CacheBuilder, CacheConfig};
pub use crate::ds::{SampleIndex, SlotId};
pub use crate::error::{ConfigError, InvariantError};
#[cfg(feature = "metrics")]
pub use crate::metrics::snapshot::SampledMetricsSnapshot;
pub use crate::policy::hashed::HashCache;
pub use crate::policy::ordered::OrderedCache;
pub use crate::traits::{CoreCache, MutableCache, ReadOnlyCache, SampledEviction};
