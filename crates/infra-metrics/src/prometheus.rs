// Prometheus Stats Reporter
//
// Each instance owns its recorder instead of installing a global one, so
// the daemon and every test get an isolated registry.

use courier_core::domain::NAMESPACE;
use courier_core::port::{MetricsExporter, StatsReporter};
use metrics::{counter, describe_counter, describe_gauge, gauge, Label};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle, PrometheusRecorder};
use tracing::debug;

const COUNTERS: &[(&str, &str)] = &[
    ("queue_created", "Queues created"),
    ("queue_deleted", "Queues deleted"),
    ("queues_described", "Queue listings served"),
    ("message_pushed", "Messages pushed"),
    ("message_popped", "Messages popped"),
    ("queue_status_described", "Queue status requests served"),
    ("queue_purged", "Queues purged"),
    ("queue_tags_updated", "Queue tag replacements"),
];

const GAUGES: &[(&str, &str)] = &[
    ("messages_pending", "Messages pending in all queues"),
    ("queue_count", "Number of created queues"),
    ("queue_tag_count", "Number of tags on all queues"),
];

fn metric_name(name: &str) -> String {
    format!("{}_{}", NAMESPACE, name)
}

fn to_labels(labels: &[(&str, &str)]) -> Vec<Label> {
    labels
        .iter()
        .map(|(k, v)| Label::new(k.to_string(), v.to_string()))
        .collect()
}

/// `StatsReporter` backed by the Prometheus exporter.
///
/// Names are prefixed with the `msg` namespace.
pub struct PrometheusStats {
    recorder: PrometheusRecorder,
    handle: PrometheusHandle,
}

impl PrometheusStats {
    pub fn new() -> Self {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        metrics::with_local_recorder(&recorder, || {
            for (name, help) in COUNTERS {
                describe_counter!(metric_name(name), *help);
            }
            for (name, help) in GAUGES {
                describe_gauge!(metric_name(name), *help);
            }
        });

        debug!("Prometheus recorder ready");
        Self { recorder, handle }
    }

    /// Current value of an unlabelled metric, if it was ever recorded
    pub fn value_of(&self, name: &str) -> Option<f64> {
        sample_value(&self.render(), &metric_name(name))
    }
}

impl Default for PrometheusStats {
    fn default() -> Self {
        Self::new()
    }
}

impl StatsReporter for PrometheusStats {
    fn counter_inc(&self, name: &str, labels: &[(&str, &str)], amount: u64) {
        let labels = to_labels(labels);
        metrics::with_local_recorder(&self.recorder, || {
            counter!(metric_name(name), labels).increment(amount);
        });
    }

    fn gauge_set(&self, name: &str, labels: &[(&str, &str)], value: f64) {
        let labels = to_labels(labels);
        metrics::with_local_recorder(&self.recorder, || {
            gauge!(metric_name(name), labels).set(value);
        });
    }
}

impl MetricsExporter for PrometheusStats {
    fn render(&self) -> String {
        self.handle.render()
    }
}

/// Value of the unlabelled sample `full_name` in a text exposition
pub fn sample_value(exposition: &str, full_name: &str) -> Option<f64> {
    exposition.lines().find_map(|line| {
        let rest = line.strip_prefix(full_name)?.strip_prefix(' ')?;
        rest.trim().parse().ok()
    })
}
