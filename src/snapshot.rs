//! Snapshot types for serializing counter state.
//!
//! This module requires the `serde` feature:
//!
//! ```toml
//! [dependencies]
//! strisce = { version = "0.1", features = ["serde"] }
//! ```
//!
//! # Examples
//!
//! ```rust
//! use strisce::counters::adder::LongAdder;
//! use strisce::snapshot::CounterSnapshot;
//!
//! let counter = LongAdder::named("requests");
//! counter.add(42);
//!
//! let snapshot = CounterSnapshot::from_observable(&counter);
//! assert_eq!(snapshot.name, "requests");
//! ```

use crate::counters::{CounterValue, Observable};
use serde::{Deserialize, Serialize};

/// Name reported for counters created without one.
pub const UNNAMED: &str = "(unnamed)";

/// A snapshot of a single counter's state.
///
/// Values serialize untagged: integers as JSON integers, floats as JSON
/// numbers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CounterSnapshot {
    /// The name of the counter.
    pub name: String,
    /// The value of the counter.
    pub value: CounterValue,
}

impl CounterSnapshot {
    /// Creates a new counter snapshot.
    pub fn new(name: impl Into<String>, value: CounterValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// Creates a snapshot from an observable counter.
    pub fn from_observable(counter: &dyn Observable) -> Self {
        Self::new(display_name(counter), counter.value())
    }

    /// Creates a snapshot from an observable counter and resets it.
    pub fn from_observable_and_reset(counter: &dyn Observable) -> Self {
        Self::new(display_name(counter), counter.value_and_reset())
    }
}

fn display_name(counter: &dyn Observable) -> String {
    match counter.name() {
        "" => UNNAMED.to_string(),
        name => name.to_string(),
    }
}

/// A point-in-time capture of a set of counters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricsSnapshot {
    /// Optional timestamp in milliseconds since Unix epoch.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub timestamp_ms: Option<u64>,
    /// The counter snapshots.
    pub counters: Vec<CounterSnapshot>,
}

impl MetricsSnapshot {
    /// Creates a new metrics snapshot with the given counters.
    pub fn new(counters: Vec<CounterSnapshot>) -> Self {
        Self {
            timestamp_ms: None,
            counters,
        }
    }

    /// Creates a new metrics snapshot with counters and a timestamp.
    pub fn with_timestamp(counters: Vec<CounterSnapshot>, timestamp_ms: u64) -> Self {
        Self {
            timestamp_ms: Some(timestamp_ms),
            counters,
        }
    }

    /// Finds a counter by name.
    pub fn get(&self, name: &str) -> Option<&CounterSnapshot> {
        self.counters.iter().find(|c| c.name == name)
    }

    /// Collects snapshots from an iterator of observable counters.
    pub fn collect<'a>(counters: impl Iterator<Item = &'a dyn Observable>) -> Self {
        Self::new(counters.map(CounterSnapshot::from_observable).collect())
    }

    /// Collects snapshots from an iterator of observable counters and resets them.
    pub fn collect_and_reset<'a>(counters: impl Iterator<Item = &'a dyn Observable>) -> Self {
        Self::new(
            counters
                .map(CounterSnapshot::from_observable_and_reset)
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counters::adder::{DoubleAdder, LongAdder};

    #[test]
    fn test_from_observable() {
        let counter = LongAdder::named("requests");
        counter.add(100);

        let snapshot = CounterSnapshot::from_observable(&counter);
        assert_eq!(snapshot.name, "requests");
        assert_eq!(snapshot.value, CounterValue::Signed(100));
    }

    #[test]
    fn test_from_observable_unnamed() {
        let counter = LongAdder::new();
        let snapshot = CounterSnapshot::from_observable(&counter);
        assert_eq!(snapshot.name, UNNAMED);
    }

    #[test]
    fn test_from_observable_and_reset() {
        let counter = LongAdder::named("resettable");
        counter.add(75);

        let snapshot = CounterSnapshot::from_observable_and_reset(&counter);
        assert_eq!(snapshot.value, CounterValue::Signed(75));
        assert_eq!(counter.sum(), 0);
    }

    #[test]
    fn test_metrics_snapshot_collect() {
        let c1 = LongAdder::named("c1");
        let c2 = DoubleAdder::named("c2");
        c1.add(10);
        c2.add(0.5);

        let counters: Vec<&dyn Observable> = vec![&c1, &c2];
        let snapshot = MetricsSnapshot::collect(counters.into_iter());

        assert_eq!(snapshot.counters.len(), 2);
        assert_eq!(snapshot.get("c1").unwrap().value, CounterValue::Signed(10));
        assert_eq!(snapshot.get("c2").unwrap().value, CounterValue::Float(0.5));
        assert!(snapshot.get("c3").is_none());
    }

    #[test]
    fn test_metrics_snapshot_collect_and_reset() {
        let c = LongAdder::named("c");
        c.add(3);
        let counters: Vec<&dyn Observable> = vec![&c];
        let snapshot = MetricsSnapshot::collect_and_reset(counters.into_iter());
        assert_eq!(snapshot.get("c").unwrap().value, CounterValue::Signed(3));
        assert_eq!(c.sum(), 0);
    }

    #[test]
    fn test_serialize_counter_snapshot() {
        let snapshot = CounterSnapshot::new("test", CounterValue::Signed(42));
        let json = serde_json::to_string(&snapshot).unwrap();
        assert_eq!(json, r#"{"name":"test","value":42}"#);
    }

    #[test]
    fn test_deserialize_counter_snapshot() {
        let snapshot: CounterSnapshot =
            serde_json::from_str(r#"{"name":"test","value":-42}"#).unwrap();
        assert_eq!(snapshot.value, CounterValue::Signed(-42));

        let snapshot: CounterSnapshot =
            serde_json::from_str(r#"{"name":"test","value":1.5}"#).unwrap();
        assert_eq!(snapshot.value, CounterValue::Float(1.5));
    }

    #[test]
    fn test_serialize_metrics_snapshot() {
        let snapshot = MetricsSnapshot::with_timestamp(
            vec![CounterSnapshot::new("a", CounterValue::Signed(1))],
            1234567890,
        );
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("\"timestamp_ms\":1234567890"));

        let untimed = serde_json::to_string(&MetricsSnapshot::new(vec![])).unwrap();
        assert_eq!(untimed, r#"{"counters":[]}"#);
    }

    #[test]
    fn test_deserialize_metrics_snapshot() {
        let json = r#"{"counters":[{"name":"a","value":1}]}"#;
        let snapshot: MetricsSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.timestamp_ms, None);
        assert_eq!(snapshot.counters.len(), 1);
    }
}
