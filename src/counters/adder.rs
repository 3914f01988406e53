//! Striped sum counters.
//!
//! This module provides [`Adder`], a counter that keeps a running sum with
//! throughput that holds up under heavy write contention. [`LongAdder`] and
//! [`DoubleAdder`] are its `i64` and `f64` instantiations.

use std::fmt::Debug;
use std::ops::Neg;

use num_traits::{One, Zero};

use crate::counters::{CounterValue, Observable};
use crate::error::Result;
use crate::striped::{CellValue, Probe, Striped, Sum};

/// A striped `i64` sum. Additions wrap on overflow.
pub type LongAdder = Adder<i64>;

/// A striped `f64` sum.
///
/// The order in which partial sums are combined is not fixed, so results
/// may differ in the last bits between runs.
pub type DoubleAdder = Adder<f64>;

/// A running sum that scales with the number of writers.
///
/// While writes do not collide, every addition is a single compare-and-swap
/// on one word. Once they do, the sum is split over a table of cache-padded
/// cells that grows with contention up to the number of CPUs. Reading folds
/// every cell back together, which makes [`sum`](Adder::sum) more expensive
/// than a plain atomic load: the right trade-off for counters that are
/// written far more often than read.
///
/// # Examples
///
/// ```rust
/// use strisce::counters::adder::LongAdder;
///
/// let requests = LongAdder::named("requests");
/// requests.increment();
/// requests.add(41);
/// assert_eq!(requests.sum(), 42);
/// ```
///
/// Shared between threads:
///
/// ```rust
/// use std::sync::Arc;
/// use std::thread;
/// use strisce::counters::adder::DoubleAdder;
///
/// let bytes = Arc::new(DoubleAdder::new());
/// let handles: Vec<_> = (0..4)
///     .map(|_| {
///         let bytes = Arc::clone(&bytes);
///         thread::spawn(move || {
///             for _ in 0..1000 {
///                 bytes.add(0.5);
///             }
///         })
///     })
///     .collect();
///
/// for handle in handles {
///     handle.join().unwrap();
/// }
/// assert_eq!(bytes.sum(), 2000.0);
/// ```
pub struct Adder<T: CellValue> {
    name: &'static str,
    inner: Striped<T>,
}

impl<T: CellValue> Adder<T> {
    /// Creates a sum initialized to zero, with no name.
    ///
    /// Usable in `static`s:
    ///
    /// ```rust
    /// use strisce::counters::adder::LongAdder;
    ///
    /// static EVENTS: LongAdder = LongAdder::new();
    /// EVENTS.increment();
    /// ```
    pub const fn new() -> Self {
        Self::named("")
    }

    /// Creates a named sum initialized to zero.
    pub const fn named(name: &'static str) -> Self {
        Adder {
            name,
            inner: Striped::new(),
        }
    }

    /// Sets the name of this counter, returning `self` for method chaining.
    pub const fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Caps the cell table for `parallelism` execution units.
    ///
    /// # Errors
    ///
    /// Fails when `parallelism` is zero or unreasonably large.
    pub fn with_parallelism(self, parallelism: usize) -> Result<Self> {
        Ok(Adder {
            name: self.name,
            inner: self.inner.with_parallelism(parallelism)?,
        })
    }

    /// Adds `x` using the calling thread's probe.
    #[inline]
    pub fn add(&self, x: T) {
        Probe::with_current(|probe| self.inner.update(x, &Sum, probe));
    }

    /// Adds `x` using an explicit probe.
    #[inline]
    pub fn add_with(&self, probe: &mut Probe, x: T) {
        self.inner.update(x, &Sum, probe);
    }

    /// Returns the current sum.
    ///
    /// Not an atomic snapshot: additions concurrent with the read may or may
    /// not be reflected.
    #[inline]
    pub fn sum(&self) -> T {
        self.inner.fold(&Sum)
    }

    /// Returns the underlying accumulator.
    pub fn striped(&self) -> &Striped<T> {
        &self.inner
    }
}

impl<T: CellValue + Zero> Adder<T> {
    /// Resets the sum to zero.
    ///
    /// Only meaningful when no thread is adding concurrently.
    pub fn reset(&self) {
        self.inner.reset(T::zero());
    }

    /// Returns the current sum and resets it to zero.
    #[inline]
    pub fn sum_then_reset(&self) -> T {
        self.inner.fold_then_reset(T::zero(), &Sum)
    }
}

impl<T: CellValue + One + Neg<Output = T>> Adder<T> {
    /// Adds one.
    #[inline]
    pub fn increment(&self) {
        self.add(T::one());
    }

    /// Subtracts one.
    #[inline]
    pub fn decrement(&self) {
        self.add(-T::one());
    }
}

impl<T> Observable for Adder<T>
where
    T: CellValue + Zero + Into<CounterValue>,
{
    /// Returns the current sum.
    #[inline]
    fn value(&self) -> CounterValue {
        self.sum().into()
    }

    /// Returns the name of this counter.
    #[inline]
    fn name(&self) -> &str {
        self.name
    }

    /// Returns the current sum and resets it to zero.
    #[inline]
    fn value_and_reset(&self) -> CounterValue {
        self.sum_then_reset().into()
    }

    #[inline]
    fn stripes(&self) -> usize {
        self.inner.table_len()
    }
}

impl<T: CellValue> Default for Adder<T> {
    /// Creates a sum initialized to zero with no name.
    fn default() -> Self {
        Self::new()
    }
}

impl<T: CellValue> Debug for Adder<T> {
    /// Formats the counter showing its base and planted cells.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{:?}", self.name, self.inner)
    }
}
