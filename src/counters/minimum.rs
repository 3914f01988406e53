//! Minimum value tracker with striped atomic storage.
//!
//! This module provides [`Minimum`], the mirror image of
//! [`Maximum`](super::maximum::Maximum): an accumulator with the [`Min`]
//! combiner, starting from the type's upper bound.

use std::fmt::Debug;

use num_traits::{Bounded, Zero};

use crate::counters::accumulator::Accumulator;
use crate::counters::{CounterValue, Observable};
use crate::error::Result;
use crate::striped::{CellValue, Min};

/// A minimum value tracker using striped atomic storage.
///
/// Each word starts at `T::max_value()`, so the first observed value becomes
/// the minimum.
///
/// # Examples
///
/// ```rust
/// use strisce::counters::minimum::Minimum;
///
/// let min_latency = Minimum::<i64>::new();
/// min_latency.observe(150);
/// min_latency.observe(85);
/// min_latency.observe(200);
///
/// assert_eq!(min_latency.get(), Some(85));
/// ```
pub struct Minimum<T: CellValue> {
    inner: Accumulator<T, Min>,
}

impl Minimum<i64> {
    /// Creates a new `i64` minimum tracker, usable in `static`s.
    pub const fn new() -> Self {
        Minimum {
            inner: Accumulator::<i64, Min>::new(i64::MAX, Min),
        }
    }
}

impl Minimum<f64> {
    /// Creates a new `f64` minimum tracker, usable in `static`s.
    pub const fn new() -> Self {
        Minimum {
            inner: Accumulator::<f64, Min>::new(f64::MAX, Min),
        }
    }
}

impl<T: CellValue + PartialOrd + Bounded> Minimum<T> {
    /// Creates a new minimum tracker for any bounded payload type.
    pub fn with_bounds() -> Self {
        Minimum {
            inner: Accumulator::with_identity(T::max_value(), Min),
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
        Ok(Minimum {
            inner: self.inner.with_parallelism(parallelism)?,
        })
    }

    /// Observes a value, lowering the minimum if necessary.
    #[inline]
    pub fn observe(&self, value: T) {
        self.inner.accumulate(value);
    }

    /// Returns the minimum observed so far, or `None` if nothing below
    /// `T::max_value()` was observed.
    #[inline]
    pub fn get(&self) -> Option<T> {
        observed(self.inner.get())
    }

    /// Returns the minimum observed so far and starts over.
    #[inline]
    pub fn get_then_reset(&self) -> Option<T> {
        observed(self.inner.get_then_reset())
    }
}

fn observed<T: PartialOrd + Bounded>(value: T) -> Option<T> {
    if value < T::max_value() {
        Some(value)
    } else {
        None
    }
}

impl<T> Observable for Minimum<T>
where
    T: CellValue + PartialOrd + Bounded + Zero + Into<CounterValue>,
{
    /// Returns the global minimum, or zero if nothing was observed.
    #[inline]
    fn value(&self) -> CounterValue {
        self.get().unwrap_or_else(T::zero).into()
    }

    #[inline]
    fn name(&self) -> &str {
        self.inner.name()
    }

    #[inline]
    fn value_and_reset(&self) -> CounterValue {
        self.get_then_reset().unwrap_or_else(T::zero).into()
    }

    #[inline]
    fn stripes(&self) -> usize {
        self.inner.stripes()
    }
}

impl<T: CellValue + PartialOrd + Bounded> Default for Minimum<T> {
    fn default() -> Self {
        Self::with_bounds()
    }
}

impl<T: CellValue> Debug for Minimum<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.inner.fmt(f)
    }
}
