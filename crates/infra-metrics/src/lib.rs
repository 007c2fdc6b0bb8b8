// Courier Infrastructure - Prometheus Metrics Adapter
// Implements: StatsReporter

mod prometheus;

pub use prometheus::{sample_value, PrometheusStats};
