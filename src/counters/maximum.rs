//! Maximum value tracker with striped atomic storage.
//!
//! This module provides [`Maximum`], a tracker that records the largest value
//! observed across all threads. It is an
//! [`Accumulator`](super::accumulator::Accumulator) with the [`Max`]
//! combiner, starting from the type's lower bound.

use std::fmt::Debug;

use num_traits::{Bounded, Zero};

use crate::counters::accumulator::Accumulator;
use crate::counters::{CounterValue, Observable};
use crate::error::Result;
use crate::striped::{CellValue, Max};

/// A maximum value tracker using striped atomic storage.
///
/// Each word starts at `T::min_value()`, so the first observed value becomes
/// the maximum. A value that cannot raise the current maximum of its word
/// is dropped without any write.
///
/// # Use Cases
///
/// - Tracking maximum latency (worst case response time)
/// - Recording peak memory usage
/// - Finding maximum queue depth over time
///
/// # Examples
///
/// ```rust
/// use strisce::counters::maximum::Maximum;
/// use strisce::counters::{CounterValue, Observable};
///
/// let max_latency = Maximum::<i64>::new().with_name("request_latency_max");
///
/// max_latency.observe(150);
/// max_latency.observe(85);
/// max_latency.observe(200);
///
/// assert_eq!(max_latency.get(), Some(200));
/// assert_eq!(max_latency.value(), CounterValue::Signed(200));
/// ```
pub struct Maximum<T: CellValue> {
    inner: Accumulator<T, Max>,
}

impl Maximum<i64> {
    /// Creates a new `i64` maximum tracker, usable in `static`s.
    pub const fn new() -> Self {
        Maximum {
            inner: Accumulator::<i64, Max>::new(i64::MIN, Max),
        }
    }
}

impl Maximum<f64> {
    /// Creates a new `f64` maximum tracker, usable in `static`s.
    pub const fn new() -> Self {
        Maximum {
            inner: Accumulator::<f64, Max>::new(f64::MIN, Max),
        }
    }
}

impl<T: CellValue + PartialOrd + Bounded> Maximum<T> {
    /// Creates a new maximum tracker for any bounded payload type.
    pub fn with_bounds() -> Self {
        Maximum {
            inner: Accumulator::with_identity(T::min_value(), Max),
        }
    }

    /// Sets the name of this tracker, returning `self` for method chaining.
    pub const fn with_name(mut self, name: &'static str) -> Self {
        self.inner.name = name;
        self
    }

    /// Caps the cell table for `parallelism` execution units.
    ///
    /// # Errors
    ///
    /// Fails when `parallelism` is zero or unreasonably large.
    pub fn with_parallelism(self, parallelism: usize) -> Result<Self> {
        Ok(Maximum {
            inner: self.inner.with_parallelism(parallelism)?,
        })
    }

    /// Observes a value, raising the maximum if necessary.
    #[inline]
    pub fn observe(&self, value: T) {
        self.inner.accumulate(value);
    }

    /// Returns the maximum observed so far.
    ///
    /// Returns `None` if nothing above `T::min_value()` was observed.
    #[inline]
    pub fn get(&self) -> Option<T> {
        observed(self.inner.get())
    }

    /// Returns the maximum observed so far and starts over.
    #[inline]
    pub fn get_then_reset(&self) -> Option<T> {
        observed(self.inner.get_then_reset())
    }
}

fn observed<T: PartialOrd + Bounded>(value: T) -> Option<T> {
    if value > T::min_value() {
        Some(value)
    } else {
        None
    }
}

impl<T> Observable for Maximum<T>
where
    T: CellValue + PartialOrd + Bounded + Zero + Into<CounterValue>,
{
    /// Returns the global maximum, or zero if nothing was observed.
    #[inline]
    fn value(&self) -> CounterValue {
        self.get().unwrap_or_else(T::zero).into()
    }

    /// Returns the name of this tracker.
    #[inline]
    fn name(&self) -> &str {
        self.inner.name()
    }

    /// Returns the global maximum and resets the tracker.
    #[inline]
    fn value_and_reset(&self) -> CounterValue {
        self.get_then_reset().unwrap_or_else(T::zero).into()
    }

    #[inline]
    fn stripes(&self) -> usize {
        self.inner.stripes()
    }
}

impl<T: CellValue + PartialOrd + Bounded> Default for Maximum<T> {
    fn default() -> Self {
        Self::with_bounds()
    }
}

impl<T: CellValue> Debug for Maximum<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.inner.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_tracker() {
        static PEAK_LATENCY: Maximum<i64> = Maximum::<i64>::new().with_name("peak_latency");
        for v in [120, 340, 90] {
            PEAK_LATENCY.observe(v);
        }
        assert_eq!(PEAK_LATENCY.get(), Some(340));
        assert_eq!(PEAK_LATENCY.name(), "peak_latency");
    }

    #[test]
    fn test_generic_and_typed_constructors_agree() {
        let generic = Maximum::<f64>::with_bounds();
        let typed = Maximum::<f64>::new();
        generic.observe(2.5);
        typed.observe(2.5);
        assert_eq!(generic.get(), typed.get());
        assert_eq!(Maximum::<f64>::default().get(), None);
    }

    #[test]
    fn test_new() {
        let counter = Maximum::<i64>::new();
        assert_eq!(counter.get(), None);
        assert_eq!(counter.value(), CounterValue::Signed(0));
    }

    #[test]
    fn test_observe_single() {
        let counter = Maximum::<i64>::new();
        counter.observe(42);
        assert_eq!(counter.get(), Some(42));
    }

    #[test]
    fn test_observe_increasing() {
        let counter = Maximum::<i64>::new();
        counter.observe(10);
        counter.observe(20);
        counter.observe(30);
        assert_eq!(counter.get(), Some(30));
    }

    #[test]
    fn test_observe_decreasing() {
        let counter = Maximum::<i64>::new();
        counter.observe(30);
        counter.observe(20);
        counter.observe(10);
        assert_eq!(counter.get(), Some(30));
    }

    #[test]
    fn test_observe_negative() {
        let counter = Maximum::<i64>::new();
        counter.observe(-30);
        counter.observe(-20);
        assert_eq!(counter.get(), Some(-20));
        assert_eq!(counter.value(), CounterValue::Signed(-20));
    }

    #[test]
    fn test_float() {
        let counter = Maximum::<f64>::new().with_name("temp_max");
        counter.observe(21.5);
        counter.observe(19.0);
        assert_eq!(counter.get(), Some(21.5));
        assert_eq!(counter.value(), CounterValue::Float(21.5));
        assert_eq!(counter.name(), "temp_max");
    }

    #[test]
    fn test_value_and_reset() {
        let counter = Maximum::<i64>::new();
        counter.observe(100);
        assert_eq!(counter.value_and_reset(), CounterValue::Signed(100));
        assert_eq!(counter.get(), None);
        counter.observe(50);
        assert_eq!(counter.get(), Some(50));
    }

    #[test]
    fn test_multiple_threads() {
        use std::sync::Arc;
        use std::thread;

        let counter = Arc::new(Maximum::<i64>::new());
        let mut handles = vec![];

        for i in 0..4i64 {
            let counter_clone = Arc::clone(&counter);
            let handle = thread::spawn(move || {
                for j in 0..1000i64 {
                    counter_clone.observe(i * 1000 + j);
                }
            });
            handles.push(handle);
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(counter.get(), Some(3999));
    }

    #[test]
    fn test_debug() {
        let counter = Maximum::<i64>::new().with_name("max");
        counter.observe(7);
        assert_eq!(format!("{:?}", counter), "max{ base:7 }");
    }
}
