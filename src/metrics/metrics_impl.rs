use crate::metrics::traits::{CoreMetricsRecorder, SamplingMetricsRecorder};

/// Counters recorded by both sampled caches.
#[derive(Debug, Default, Clone)]
pub struct SampledMetrics {
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
}

impl SampledMetrics {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Fraction of `get` calls that hit, or `0.0` before any call.
    pub fn hit_rate(&self) -> f64 {
        if self.get_calls == 0 {
            0.0
        } else {
            self.get_hits as f64 / self.get_calls as f64
        }
    }
}

impl CoreMetricsRecorder for SampledMetrics {
    fn record_get_hit(&mut self) {
        self.get_calls += 1;
        self.get_hits += 1;
    }
    fn record_get_miss(&mut self) {
        self.get_calls += 1;
        self.get_misses += 1;
    }
    fn record_insert_call(&mut self) {
        self.insert_calls += 1;
    }
    fn record_insert_new(&mut self) {
        self.insert_new += 1;
    }
    fn record_insert_update(&mut self) {
        self.insert_updates += 1;
    }
    fn record_evict_call(&mut self) {
        self.evict_calls += 1;
    }
    fn record_evicted_entry(&mut self) {
        self.evicted_entries += 1;
    }
    fn record_clear(&mut self) {
        self.clears += 1;
    }
}

impl SamplingMetricsRecorder for SampledMetrics {
    fn record_sample_draw(&mut self) {
        self.sample_draws += 1;
    }
    fn record_self_pair(&mut self) {
        self.self_pairs += 1;
    }
    fn record_remove_call(&mut self) {
        self.remove_calls += 1;
    }
    fn record_remove_found(&mut self) {
        self.remove_found += 1;
    }
}
