//! Example exporting cache counters in Prometheus text format.
//!
//! Run with: cargo run --example metrics_export --features metrics

use sampled_lru::metrics::exporter::PrometheusTextExporter;
use sampled_lru::metrics::traits::{MetricsExporter, MetricsSnapshotProvider};
use sampled_lru::policy::hashed::HashCache;

fn main() {
    let mut cache = HashCache::with_seed(64, 1);
    for i in 0..256u32 {
        cache.insert(i % 96, i);
        cache.find(&(i % 48));
    }

    let exporter = PrometheusTextExporter::new("demo_cache", std::io::stdout());
    exporter.export(&cache.snapshot());
}

// Expected output (abridged):
// # TYPE demo_cache_get_calls_total counter
// demo_cache_get_calls_total 256
// ...
// # TYPE demo_cache_capacity gauge
// demo_cache_capacity 64
// ...
