//! JSON observer for serializing counters.
//!
//! This module provides [`JsonObserver`], which serializes a collection of
//! [`Observable`] counters to JSON using the snapshot types from
//! [`crate::snapshot`].
//!
//! # Feature Flag
//!
//! This module requires the `json` feature:
//!
//! ```toml
//! [dependencies]
//! strisce = { version = "0.1", features = ["json"] }
//! ```
//!
//! # Examples
//!
//! ```rust
//! use strisce::counters::adder::{DoubleAdder, LongAdder};
//! use strisce::counters::Observable;
//! use strisce::observers::json::JsonObserver;
//!
//! let requests = LongAdder::named("http_requests");
//! let bytes = DoubleAdder::named("http_bytes");
//!
//! requests.add(1000);
//! bytes.add(1.5);
//!
//! let counters: Vec<&dyn Observable> = vec![&requests, &bytes];
//! let json = JsonObserver::new().to_json(counters.into_iter()).unwrap();
//!
//! assert_eq!(
//!     json,
//!     r#"[{"name":"http_requests","value":1000},{"name":"http_bytes","value":1.5}]"#
//! );
//! ```

use serde::Serialize;

use crate::counters::Observable;
use crate::observers::Result;
use crate::snapshot::{CounterSnapshot, MetricsSnapshot};

/// Configuration for the JSON observer.
#[derive(Debug, Clone, Default)]
pub struct JsonConfig {
    /// Whether to pretty-print the JSON output.
    pub pretty: bool,
    /// Whether to include a timestamp in the output.
    pub include_timestamp: bool,
    /// Whether to wrap counters in a [`MetricsSnapshot`] object.
    pub wrap_in_snapshot: bool,
}

/// An observer that serializes counters to JSON format.
///
/// By default the output is a bare array of `{"name", "value"}` objects.
/// With [`wrap_in_snapshot`](JsonObserver::wrap_in_snapshot) the array is
/// nested under `"counters"`, optionally next to a `"timestamp_ms"` field:
///
/// ```rust
/// use strisce::counters::adder::LongAdder;
/// use strisce::counters::Observable;
/// use strisce::observers::json::JsonObserver;
///
/// let counter = LongAdder::named("requests");
/// counter.add(42);
///
/// let counters: Vec<&dyn Observable> = vec![&counter];
/// let json = JsonObserver::new()
///     .wrap_in_snapshot(true)
///     .to_json(counters.into_iter())
///     .unwrap();
///
/// assert_eq!(json, r#"{"counters":[{"name":"requests","value":42}]}"#);
/// ```
#[derive(Debug, Clone, Default)]
pub struct JsonObserver {
    config: JsonConfig,
}

impl JsonObserver {
    /// Creates a new JSON observer with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new JSON observer with the specified configuration.
    pub fn with_config(config: JsonConfig) -> Self {
        Self { config }
    }

    /// Enables or disables pretty-printing.
    pub fn pretty(mut self, enabled: bool) -> Self {
        self.config.pretty = enabled;
        self
    }

    /// Enables or disables timestamp inclusion.
    ///
    /// Only has effect when `wrap_in_snapshot` is also enabled.
    pub fn include_timestamp(mut self, enabled: bool) -> Self {
        self.config.include_timestamp = enabled;
        self
    }

    /// Enables or disables wrapping the output in a [`MetricsSnapshot`].
    pub fn wrap_in_snapshot(mut self, enabled: bool) -> Self {
        self.config.wrap_in_snapshot = enabled;
        self
    }

    /// Collects counters into a vector of [`CounterSnapshot`].
    pub fn collect<'a>(
        &self,
        counters: impl Iterator<Item = &'a dyn Observable>,
    ) -> Vec<CounterSnapshot> {
        MetricsSnapshot::collect(counters).counters
    }

    /// Serializes counters to a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`ObserverError::Json`](crate::observers::ObserverError::Json)
    /// if serialization fails.
    pub fn to_json<'a>(&self, counters: impl Iterator<Item = &'a dyn Observable>) -> Result<String> {
        self.encode(MetricsSnapshot::collect(counters))
    }

    /// Serializes counters to JSON, resetting each one as it is read.
    pub fn to_json_and_reset<'a>(
        &self,
        counters: impl Iterator<Item = &'a dyn Observable>,
    ) -> Result<String> {
        self.encode(MetricsSnapshot::collect_and_reset(counters))
    }

    /// Serializes counters to a JSON byte vector.
    pub fn to_json_bytes<'a>(
        &self,
        counters: impl Iterator<Item = &'a dyn Observable>,
    ) -> Result<Vec<u8>> {
        let snapshot = self.stamp(MetricsSnapshot::collect(counters));
        let bytes = if self.config.wrap_in_snapshot {
            self.serialize_vec(&snapshot)?
        } else {
            self.serialize_vec(&snapshot.counters)?
        };
        Ok(bytes)
    }

    fn encode(&self, snapshot: MetricsSnapshot) -> Result<String> {
        let snapshot = self.stamp(snapshot);
        if self.config.wrap_in_snapshot {
            self.serialize(&snapshot)
        } else {
            self.serialize(&snapshot.counters)
        }
    }

    fn stamp(&self, mut snapshot: MetricsSnapshot) -> MetricsSnapshot {
        if self.config.wrap_in_snapshot && self.config.include_timestamp {
            snapshot.timestamp_ms = Some(current_timestamp_ms());
        }
        snapshot
    }

    fn serialize<S: Serialize + ?Sized>(&self, value: &S) -> Result<String> {
        let json = if self.config.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        Ok(json)
    }

    fn serialize_vec<S: Serialize + ?Sized>(&self, value: &S) -> Result<Vec<u8>> {
        let json = if self.config.pretty {
            serde_json::to_vec_pretty(value)?
        } else {
            serde_json::to_vec(value)?
        };
        Ok(json)
    }
}

/// Returns the current timestamp in milliseconds since Unix epoch.
fn current_timestamp_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counters::accumulator::LongAccumulator;
    use crate::counters::adder::{DoubleAdder, LongAdder};
    use crate::counters::average::Average;
    use crate::counters::maximum::Maximum;
    use crate::counters::minimum::Minimum;
    use crate::counters::CounterValue;

    #[test]
    fn test_to_json_empty() {
        let observer = JsonObserver::new();
        let counters: Vec<&dyn Observable> = vec![];
        let json = observer.to_json(counters.into_iter()).unwrap();
        assert_eq!(json, "[]");
    }

    #[test]
    fn test_to_json_single_counter() {
        let counter = LongAdder::named("test_counter");
        counter.add(42);

        let counters: Vec<&dyn Observable> = vec![&counter];
        let json = JsonObserver::new().to_json(counters.into_iter()).unwrap();

        assert_eq!(json, r#"[{"name":"test_counter","value":42}]"#);
    }

    #[test]
    fn test_to_json_unnamed() {
        let counter = LongAdder::new();
        counter.add(-3);

        let counters: Vec<&dyn Observable> = vec![&counter];
        let json = JsonObserver::new().to_json(counters.into_iter()).unwrap();

        assert_eq!(json, r#"[{"name":"(unnamed)","value":-3}]"#);
    }

    #[test]
    fn test_to_json_mixed_counters() {
        let requests = LongAdder::named("requests");
        let bytes = DoubleAdder::named("bytes");
        let peak = Maximum::<i64>::new().with_name("peak");
        let floor = Minimum::<i64>::new().with_name("floor");
        let latency = Average::named("latency");
        let flags = LongAccumulator::new(0, |a: i64, b: i64| a | b).with_name("flags");

        requests.add(1000);
        bytes.add(2.5);
        peak.observe(250);
        floor.observe(3);
        latency.observe(10.0);
        latency.observe(20.0);
        flags.accumulate(0b101);

        let counters: Vec<&dyn Observable> =
            vec![&requests, &bytes, &peak, &floor, &latency, &flags];
        let json = JsonObserver::new().to_json(counters.into_iter()).unwrap();

        let parsed: Vec<CounterSnapshot> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.len(), 6);
        assert_eq!(parsed[0].value, CounterValue::Signed(1000));
        assert_eq!(parsed[1].value, CounterValue::Float(2.5));
        assert_eq!(parsed[2].value, CounterValue::Signed(250));
        assert_eq!(parsed[3].value, CounterValue::Signed(3));
        assert_eq!(parsed[4].value, CounterValue::Float(15.0));
        assert_eq!(parsed[5].value, CounterValue::Signed(5));
    }

    #[test]
    fn test_to_json_pretty() {
        let counter = LongAdder::named("pretty");
        counter.add(1);

        let counters: Vec<&dyn Observable> = vec![&counter];
        let json = JsonObserver::new()
            .pretty(true)
            .to_json(counters.into_iter())
            .unwrap();

        assert!(json.contains('\n'));
        assert!(json.contains("  \"name\": \"pretty\""));
    }

    #[test]
    fn test_to_json_wrapped_with_timestamp() {
        let counter = LongAdder::named("ts");
        counter.add(7);

        let counters: Vec<&dyn Observable> = vec![&counter];
        let json = JsonObserver::new()
            .wrap_in_snapshot(true)
            .include_timestamp(true)
            .to_json(counters.into_iter())
            .unwrap();

        let snapshot: MetricsSnapshot = serde_json::from_str(&json).unwrap();
        assert!(snapshot.timestamp_ms.unwrap_or(0) > 0);
        assert_eq!(snapshot.get("ts").unwrap().value, CounterValue::Signed(7));
    }

    #[test]
    fn test_timestamp_ignored_without_wrapper() {
        let counter = LongAdder::named("c");
        let counters: Vec<&dyn Observable> = vec![&counter];
        let json = JsonObserver::new()
            .include_timestamp(true)
            .to_json(counters.into_iter())
            .unwrap();
        assert!(!json.contains("timestamp_ms"));
    }

    #[test]
    fn test_to_json_and_reset() {
        let counter = LongAdder::named("period");
        counter.add(100);

        let counters: Vec<&dyn Observable> = vec![&counter];
        let json = JsonObserver::new()
            .to_json_and_reset(counters.into_iter())
            .unwrap();

        assert!(json.contains("100"));
        assert_eq!(counter.sum(), 0);
    }

    #[test]
    fn test_to_json_bytes() {
        let counter = LongAdder::named("b");
        counter.add(2);

        let counters: Vec<&dyn Observable> = vec![&counter];
        let bytes = JsonObserver::new()
            .to_json_bytes(counters.into_iter())
            .unwrap();

        assert_eq!(bytes, br#"[{"name":"b","value":2}]"#.to_vec());
    }

    #[test]
    fn test_with_config() {
        let observer = JsonObserver::with_config(JsonConfig {
            pretty: false,
            include_timestamp: false,
            wrap_in_snapshot: true,
        });
        let counters: Vec<&dyn Observable> = vec![];
        let json = observer.to_json(counters.into_iter()).unwrap();
        assert_eq!(json, r#"{"counters":[]}"#);
    }

    #[test]
    fn test_collect() {
        let counter = DoubleAdder::named("d");
        counter.add(0.25);
        let counters: Vec<&dyn Observable> = vec![&counter];
        let snapshots = JsonObserver::new().collect(counters.into_iter());
        assert_eq!(snapshots, vec![CounterSnapshot::new("d", CounterValue::Float(0.25))]);
    }
}
