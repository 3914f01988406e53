//! Running average with striped atomic storage.
//!
//! This module provides [`Average`], which tracks the mean of observed values
//! with two striped sums: one for the values and one for the count.

use std::fmt::Debug;

use crate::counters::adder::{DoubleAdder, LongAdder};
use crate::counters::{CounterValue, Observable};
use crate::striped::Probe;

/// A running mean backed by two striped sums.
///
/// The sum and the count are updated independently, so a read racing with
/// `observe` may pair a sum with a count that is off by the in-flight
/// observations. Once writers are quiescent the mean is exact up to
/// floating-point rounding.
///
/// # Examples
///
/// ```rust
/// use strisce::counters::average::Average;
///
/// let latency = Average::named("latency_ms");
/// latency.observe(10.0);
/// latency.observe(20.0);
/// latency.observe(30.0);
///
/// assert_eq!(latency.count(), 3);
/// assert_eq!(latency.mean(), Some(20.0));
/// ```
pub struct Average {
    name: &'static str,
    sum: DoubleAdder,
    count: LongAdder,
}

impl Average {
    /// Creates an empty average with no name.
    pub const fn new() -> Self {
        Self::named("")
    }

    /// Creates an empty named average.
    pub const fn named(name: &'static str) -> Self {
        Average {
            name,
            sum: DoubleAdder::new(),
            count: LongAdder::new(),
        }
    }

    /// Sets the name of this counter, returning `self` for method chaining.
    pub const fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Records one observation.
    #[inline]
    pub fn observe(&self, value: f64) {
        Probe::with_current(|probe| {
            self.sum.add_with(probe, value);
            self.count.add_with(probe, 1);
        });
    }

    /// Records `count` observations whose values add up to `sum`.
    #[inline]
    pub fn observe_many(&self, sum: f64, count: i64) {
        Probe::with_current(|probe| {
            self.sum.add_with(probe, sum);
            self.count.add_with(probe, count);
        });
    }

    /// Returns the sum of all observations.
    pub fn sum(&self) -> f64 {
        self.sum.sum()
    }

    /// Returns the number of observations.
    pub fn count(&self) -> i64 {
        self.count.sum()
    }

    /// Returns the mean, or `None` before the first observation.
    pub fn mean(&self) -> Option<f64> {
        mean_of(self.sum(), self.count())
    }

    /// Returns the sum and count and resets both.
    pub fn sum_count_and_reset(&self) -> (f64, i64) {
        (self.sum.sum_then_reset(), self.count.sum_then_reset())
    }

    /// Returns the mean and resets the average.
    pub fn mean_and_reset(&self) -> Option<f64> {
        let (sum, count) = self.sum_count_and_reset();
        mean_of(sum, count)
    }
}

fn mean_of(sum: f64, count: i64) -> Option<f64> {
    if count > 0 {
        Some(sum / count as f64)
    } else {
        None
    }
}

impl Observable for Average {
    /// Returns the mean, or `0.0` when empty.
    fn value(&self) -> CounterValue {
        CounterValue::Float(self.mean().unwrap_or(0.0))
    }

    fn name(&self) -> &str {
        self.name
    }

    fn value_and_reset(&self) -> CounterValue {
        CounterValue::Float(self.mean_and_reset().unwrap_or(0.0))
    }

    fn stripes(&self) -> usize {
        self.sum.stripes().max(self.count.stripes())
    }
}

impl Default for Average {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for Average {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{{ sum:{} count:{} }}", self.name, self.sum(), self.count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let avg = Average::new();
        assert_eq!(avg.count(), 0);
        assert_eq!(avg.mean(), None);
        assert_eq!(avg.value(), CounterValue::Float(0.0));
    }

    #[test]
    fn test_observe_multiple() {
        let avg = Average::new();
        avg.observe(1.0);
        avg.observe(2.0);
        avg.observe(6.0);
        assert_eq!(avg.sum(), 9.0);
        assert_eq!(avg.mean(), Some(3.0));
    }

    #[test]
    fn test_observe_many() {
        let avg = Average::new();
        avg.observe_many(100.0, 4);
        assert_eq!(avg.mean(), Some(25.0));
    }

    #[test]
    fn test_sum_count_and_reset() {
        let avg = Average::new();
        avg.observe(4.0);
        avg.observe(8.0);
        assert_eq!(avg.sum_count_and_reset(), (12.0, 2));
        assert_eq!(avg.count(), 0);
        assert_eq!(avg.mean(), None);
    }

    #[test]
    fn test_value_and_reset() {
        let avg = Average::named("avg");
        avg.observe(5.0);
        assert_eq!(avg.value_and_reset(), CounterValue::Float(5.0));
        assert_eq!(avg.value(), CounterValue::Float(0.0));
    }

    #[test]
    fn test_debug() {
        let avg = Average::named("lat");
        avg.observe(1.5);
        assert_eq!(format!("{:?}", avg), "lat{ sum:1.5 count:1 }");
    }

    #[test]
    fn test_static_with_name() {
        static RTT: Average = Average::new().with_name("rtt");
        RTT.observe(4.0);
        assert_eq!(RTT.name(), "rtt");
        assert_eq!(RTT.mean(), Some(4.0));
    }

    #[test]
    fn test_dyn_format() {
        let avg = Average::new().with_name("latency");
        avg.observe(2.0);
        assert_eq!(format!("{}", &avg as &dyn Observable), "latency:2");
    }

    #[test]
    fn test_multiple_threads() {
        use std::sync::Arc;
        use std::thread;

        let avg = Arc::new(Average::new());
        let mut handles = vec![];

        for _ in 0..4 {
            let avg = Arc::clone(&avg);
            handles.push(thread::spawn(move || {
                for i in 0..1000 {
                    avg.observe((i % 10) as f64);
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(avg.count(), 4000);
        assert_eq!(avg.mean(), Some(4.5));
    }
}
