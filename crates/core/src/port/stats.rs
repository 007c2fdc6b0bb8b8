// Stats Reporter Port

/// Counter and gauge capability. Absence only affects observability.
pub trait StatsReporter: Send + Sync {
    /// Add `amount` to the counter identified by `name` and `labels`
    fn counter_inc(&self, name: &str, labels: &[(&str, &str)], amount: u64);

    /// Overwrite the gauge identified by `name` and `labels`
    fn gauge_set(&self, name: &str, labels: &[(&str, &str)], value: f64);
}

/// Reporter that drops everything
pub struct NoopStatsReporter;

impl StatsReporter for NoopStatsReporter {
    fn counter_inc(&self, _name: &str, _labels: &[(&str, &str)], _amount: u64) {}

    fn gauge_set(&self, _name: &str, _labels: &[(&str, &str)], _value: f64) {}
}

/// Exposes everything recorded so far as Prometheus text
pub trait MetricsExporter: Send + Sync {
    fn render(&self) -> String;
}
