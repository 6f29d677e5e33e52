//! Optional counters for cache behaviour (feature `metrics`).
//!
//! Recording is split from consumption: the caches write into
//! [`SampledMetrics`](metrics_impl::SampledMetrics), tests and benches read a
//! [`SampledMetricsSnapshot`](snapshot::SampledMetricsSnapshot), and
//! production code hands snapshots to a
//! [`MetricsExporter`](traits::MetricsExporter).

pub mod exporter;
pub mod metrics_impl;
pub mod snapshot;
pub mod traits;
