use crate::metrics::metrics_impl::SampledMetrics;

/// Point-in-time copy of [`SampledMetrics`] plus gauges.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct SampledMetricsSnapshot {
    pub get_calls: u64,
    pub get_hits: u64,
    pub get_misses: u64,

    pub insert_calls: u64,
    pub insert_updates: u64,
    pub insert_new: u64,

    pub evict_calls: u64,
    pub evicted_entries: u64,
    pub sample_draws: u64,
    pub self_pairs: u64,

    pub remove_calls: u64,
    pub remove_found: u64,
    pub clears: u64,

    // gauges captured at snapshot time
    pub cache_len: usize,
    pub capacity: usize,
    pub clock: u64,
}

impl SampledMetricsSnapshot {
    pub fn from_metrics(metrics: &SampledMetrics, cache_len: usize, capacity: usize, clock: u64) -> Self {
        Self {
            get_calls: metrics.get_calls,
            get_hits: metrics.get_hits,
            get_misses: metrics.get_misses,
            insert_calls: metrics.insert_calls,
            insert_updates: metrics.insert_updates,
            insert_new: metrics.insert_new,
            evict_calls: metrics.evict_calls,
            evicted_entries: metrics.evicted_entries,
            sample_draws: metrics.sample_draws,
            self_pairs: metrics.self_pairs,
            remove_calls: metrics.remove_calls,
            remove_found: metrics.remove_found,
            clears: metrics.clears,
            cache_len,
            capacity,
            clock,
        }
    }
}
