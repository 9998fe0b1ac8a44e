//! Metrics for the ZiGate protocol session.
//!
//! Every metric the session records is declared here as a [`Metric`]
//! constant, so names are typed once and carry their description, unit and
//! label keys. The `metrics` crate is re-exported for convenience.
//!
//! # Example
//!
//! ```rust,ignore
//! use zigate_metrics::{describe_metrics, metric_defs, metrics, MetricLabels};
//!
//! // Initialize metric descriptions at startup, after installing a recorder
//! describe_metrics();
//!
//! let labels = MetricLabels::new("living_room");
//! metrics::counter!(metric_defs::FRAMES_RECEIVED.name, &labels.to_labels()).increment(1);
//! ```
//!
//! Without an installed recorder every call is a no-op.

pub use metrics;

use metrics::{describe_counter, describe_gauge, describe_histogram, Unit};

/// The kind of metric (counter, gauge, or histogram).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    /// A monotonically increasing counter.
    Counter,
    /// A gauge that can go up and down.
    Gauge,
    /// A histogram for recording distributions.
    Histogram,
}

impl MetricKind {
    /// Returns the kind as a lowercase string.
    pub const fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Counter => "counter",
            MetricKind::Gauge => "gauge",
            MetricKind::Histogram => "histogram",
        }
    }
}

impl std::fmt::Display for MetricKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A metric declaration with its metadata.
///
/// ```rust
/// use zigate_metrics::metrics::Unit;
/// use zigate_metrics::{Metric, MetricKind};
///
/// const FRAMES: Metric = Metric::counter("zigate.frames.received")
///     .with_description("Frames that passed length and checksum checks")
///     .with_unit(Unit::Count)
///     .with_labels(&["connection"]);
///
/// assert_eq!(FRAMES.kind, MetricKind::Counter);
/// ```
#[derive(Debug, Clone)]
pub struct Metric {
    /// The metric name (e.g., "zigate.frames.received").
    pub name: &'static str,
    pub kind: MetricKind,
    /// Human-readable description of the metric.
    pub description: &'static str,
    pub unit: Option<Unit>,
    /// Expected label keys for this metric.
    pub labels: &'static [&'static str],
}

impl Metric {
    /// Creates a new counter metric with the given name.
    pub const fn counter(name: &'static str) -> Self {
        Self::with_kind(name, MetricKind::Counter)
    }

    /// Creates a new gauge metric with the given name.
    pub const fn gauge(name: &'static str) -> Self {
        Self::with_kind(name, MetricKind::Gauge)
    }

    /// Creates a new histogram metric with the given name.
    pub const fn histogram(name: &'static str) -> Self {
        Self::with_kind(name, MetricKind::Histogram)
    }

    const fn with_kind(name: &'static str, kind: MetricKind) -> Self {
        Self {
            name,
            kind,
            description: "",
            unit: None,
            labels: &[],
        }
    }

    pub const fn with_description(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    pub const fn with_unit(mut self, unit: Unit) -> Self {
        self.unit = Some(unit);
        self
    }

    pub const fn with_labels(mut self, labels: &'static [&'static str]) -> Self {
        self.labels = labels;
        self
    }

    /// Registers this metric's description with the installed recorder.
    pub fn describe(&self) {
        match (self.kind, self.unit) {
            (MetricKind::Counter, Some(unit)) => {
                describe_counter!(self.name, unit, self.description);
            }
            (MetricKind::Counter, None) => {
                describe_counter!(self.name, self.description);
            }
            (MetricKind::Gauge, Some(unit)) => {
                describe_gauge!(self.name, unit, self.description);
            }
            (MetricKind::Gauge, None) => {
                describe_gauge!(self.name, self.description);
            }
            (MetricKind::Histogram, Some(unit)) => {
                describe_histogram!(self.name, unit, self.description);
            }
            (MetricKind::Histogram, None) => {
                describe_histogram!(self.name, self.description);
            }
        }
    }

    /// Whether `key` is one of the declared label keys.
    pub fn has_label(&self, key: &str) -> bool {
        self.labels.iter().any(|label| *label == key)
    }
}

pub mod metric_defs {
    use super::{Metric, Unit};

    // ========================================================================
    // Framing
    // ========================================================================

    pub const FRAMES_RECEIVED: Metric = Metric::counter("zigate.frames.received")
        .with_description("Frames that passed length and checksum checks")
        .with_unit(Unit::Count)
        .with_labels(&["connection"]);

    pub const FRAMES_REJECTED: Metric = Metric::counter("zigate.frames.rejected")
        .with_description("Delimited frames discarded for a bad length or checksum")
        .with_unit(Unit::Count)
        .with_labels(&["connection", "reason"]);

    pub const ASSEMBLER_DISCARDED_BYTES: Metric =
        Metric::counter("zigate.assembler.discarded_bytes")
            .with_description("Bytes dropped as noise between frames or on buffer overflow")
            .with_unit(Unit::Bytes)
            .with_labels(&["connection"]);

    // ========================================================================
    // Dispatch
    // ========================================================================

    pub const DECODE_ERRORS: Metric = Metric::counter("zigate.frames.decode_errors")
        .with_description("Valid frames whose body did not match the message layout")
        .with_unit(Unit::Count)
        .with_labels(&["connection", "msg_type"]);

    pub const MESSAGES_UNKNOWN: Metric = Metric::counter("zigate.messages.unknown")
        .with_description("Frames with a message type no layout is registered for")
        .with_unit(Unit::Count)
        .with_labels(&["connection"]);

    pub const ATTRIBUTE_REPORTS: Metric = Metric::counter("zigate.attributes.reports")
        .with_description("Attribute reports and read/write responses")
        .with_unit(Unit::Count)
        .with_labels(&["connection", "cluster"]);

    // ========================================================================
    // Device Store
    // ========================================================================

    pub const DEVICES_KNOWN: Metric = Metric::gauge("zigate.devices.known")
        .with_description("Device keys with at least one recorded property")
        .with_unit(Unit::Count)
        .with_labels(&["connection"]);

    pub const ALL: &[&Metric] = &[
        &FRAMES_RECEIVED,
        &FRAMES_REJECTED,
        &ASSEMBLER_DISCARDED_BYTES,
        &DECODE_ERRORS,
        &MESSAGES_UNKNOWN,
        &ATTRIBUTE_REPORTS,
        &DEVICES_KNOWN,
    ];
}

/// Labels identifying one connection to a dongle.
#[derive(Debug, Clone)]
pub struct MetricLabels {
    pub connection: String,
}

impl MetricLabels {
    pub fn new(connection: impl Into<String>) -> Self {
        Self {
            connection: connection.into(),
        }
    }

    pub fn to_labels(&self) -> Vec<(&'static str, String)> {
        vec![("connection", self.connection.clone())]
    }

    /// Connection labels followed by `extra`.
    pub fn with(&self, extra: &[(&'static str, String)]) -> Vec<(&'static str, String)> {
        let mut labels = self.to_labels();
        labels.extend_from_slice(extra);
        labels
    }
}

/// Register descriptions of every metric with the installed recorder.
pub fn describe_metrics() {
    for metric in metric_defs::ALL {
        metric.describe();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_labels() {
        let labels = MetricLabels::new("usb0");
        assert_eq!(labels.to_labels(), vec![("connection", "usb0".to_string())]);

        let extended = labels.with(&[("reason", "checksum".to_string())]);
        assert_eq!(extended.len(), 2);
        assert!(extended.contains(&("reason", "checksum".to_string())));
    }

    #[test]
    fn test_metric_definitions() {
        assert_eq!(metric_defs::FRAMES_RECEIVED.name, "zigate.frames.received");
        assert_eq!(metric_defs::FRAMES_RECEIVED.kind, MetricKind::Counter);
        assert_eq!(metric_defs::ASSEMBLER_DISCARDED_BYTES.unit, Some(Unit::Bytes));
        assert_eq!(metric_defs::DEVICES_KNOWN.kind, MetricKind::Gauge);
        assert!(metric_defs::FRAMES_REJECTED.has_label("reason"));
        assert!(metric_defs::DECODE_ERRORS.has_label("msg_type"));
    }

    #[test]
    fn test_all_metrics_have_connection_label() {
        assert_eq!(metric_defs::ALL.len(), 7);
        for metric in metric_defs::ALL {
            assert!(metric.has_label("connection"), "{}", metric.name);
            assert!(!metric.description.is_empty(), "{}", metric.name);
        }
    }

    #[test]
    fn test_metric_names_unique() {
        let mut names: Vec<_> = metric_defs::ALL.iter().map(|m| m.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), metric_defs::ALL.len());
    }

    #[test]
    fn test_describe_without_recorder() {
        describe_metrics();
        assert_eq!(MetricKind::Histogram.to_string(), "histogram");
        const LATENCY: Metric =
            Metric::histogram("zigate.test.latency").with_unit(Unit::Milliseconds);
        LATENCY.describe();
    }
}
