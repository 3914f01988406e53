//! Counters built on the striped accumulation engine.
//!
//! Every type in this module is a thin front-end over
//! [`Striped`](crate::striped::Striped): it picks a combiner, routes updates
//! through the calling thread's [`Probe`](crate::striped::Probe) and folds
//! the base with all cells on read.
//!
//! # Thread Probe Assignment
//!
//! Each thread keeps one probe hash in thread-local storage. It is seeded
//! lazily from a global generator the first time the thread updates any
//! counter and advanced whenever the thread runs into contention, so a thread
//! that keeps colliding drifts to another cell while well-placed threads stay
//! put. Callers that manage their own workers can pass an explicit probe
//! through the `*_with` methods instead.
//!
//! | Type | Description | Use Case |
//! |------|-------------|----------|
//! | [`LongAdder`](adder::LongAdder) | Signed integer sum | Event counts, gauges |
//! | [`DoubleAdder`](adder::DoubleAdder) | Floating-point sum | Byte volumes, costs |
//! | [`Accumulator`](accumulator::Accumulator) | Any commutative fold | Bitmasks, products |
//! | [`Maximum`](maximum::Maximum) | Largest observed value | Latency peaks |
//! | [`Minimum`](minimum::Minimum) | Smallest observed value | Latency floors |
//! | [`Average`](average::Average) | Running mean | Mean latency |

pub mod accumulator;
pub mod adder;
pub mod average;
pub mod maximum;
pub mod minimum;

use std::fmt::{Debug, Display};

/// Represents the value of a counter, either integral or floating-point.
///
/// # Examples
///
/// ```rust
/// use strisce::counters::CounterValue;
///
/// let signed = CounterValue::Signed(-10);
/// let float = CounterValue::Float(0.5);
///
/// assert!(!signed.is_zero());
/// assert!(!float.is_zero());
/// assert!(CounterValue::Signed(0).is_zero());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(untagged)
)]
pub enum CounterValue {
    /// A signed 64-bit counter value.
    Signed(i64),
    /// A 64-bit floating-point counter value.
    Float(f64),
}

impl Display for CounterValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CounterValue::Signed(v) => write!(f, "{}", v),
            CounterValue::Float(v) => write!(f, "{}", v),
        }
    }
}

impl CounterValue {
    /// Returns `true` if the counter value is zero.
    pub fn is_zero(&self) -> bool {
        match self {
            CounterValue::Signed(v) => *v == 0,
            CounterValue::Float(v) => *v == 0.0,
        }
    }

    /// Returns the value as an `i64`, truncating floats.
    pub fn as_i64(&self) -> i64 {
        match self {
            CounterValue::Signed(v) => *v,
            CounterValue::Float(v) => *v as i64,
        }
    }

    /// Returns the value as an `f64`.
    pub fn as_f64(&self) -> f64 {
        match self {
            CounterValue::Signed(v) => *v as f64,
            CounterValue::Float(v) => *v,
        }
    }
}

impl From<i64> for CounterValue {
    fn from(value: i64) -> Self {
        CounterValue::Signed(value)
    }
}

impl From<f64> for CounterValue {
    fn from(value: f64) -> Self {
        CounterValue::Float(value)
    }
}

/// A trait for counters that can be read by name.
///
/// # Examples
///
/// ```rust
/// use strisce::counters::adder::LongAdder;
/// use strisce::counters::{CounterValue, Observable};
///
/// let counter = LongAdder::named("requests");
/// counter.add(5);
///
/// assert_eq!(counter.name(), "requests");
/// assert_eq!(counter.value(), CounterValue::Signed(5));
/// assert_eq!(counter.value_and_reset(), CounterValue::Signed(5));
/// assert_eq!(counter.value(), CounterValue::Signed(0));
/// ```
pub trait Observable: Debug + Send + Sync {
    /// Returns the name of this counter, or an empty string.
    fn name(&self) -> &str;

    /// Returns the current aggregated value of the counter.
    ///
    /// The base and every cell are read one after the other, so updates
    /// racing with the read may or may not be included.
    fn value(&self) -> CounterValue;

    /// Returns the current value and resets the counter.
    ///
    /// Each word is exchanged individually: a concurrent update is counted
    /// either in the returned value or in the next one, never in both.
    fn value_and_reset(&self) -> CounterValue;

    /// Returns the current length of the counter's cell table.
    ///
    /// `0` means the counter has never seen contention and all updates so
    /// far landed on its base word.
    fn stripes(&self) -> usize {
        0
    }
}

impl Display for dyn Observable + '_ {
    /// Formats the counter as `name:value` if named, or just `value` otherwise.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.name().is_empty() {
            write!(f, "{}:{}", self.name(), self.value())
        } else {
            write!(f, "{}", self.value())
        }
    }
}
