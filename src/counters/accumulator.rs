//! Striped accumulators over arbitrary combining functions.
//!
//! This module provides [`Accumulator`], the general form of
//! [`Adder`](super::adder::Adder): it folds updates with any commutative,
//! associative function instead of addition.

use std::fmt::Debug;

use crate::counters::{CounterValue, Observable};
use crate::error::Result;
use crate::striped::{CellValue, Combine, Probe, Striped};

/// A striped `i64` accumulator.
pub type LongAccumulator<F> = Accumulator<i64, F>;

/// A striped `f64` accumulator.
pub type DoubleAccumulator<F> = Accumulator<f64, F>;

/// A running fold of `T` values under a caller-supplied combiner.
///
/// The combiner must be commutative and associative, and `identity` must be
/// its identity element: new cells start from the first operand routed to
/// them, and on read the base and all cells are folded in table order.
///
/// # Examples
///
/// Tracking which feature flags were ever hit, across threads:
///
/// ```rust
/// use strisce::counters::accumulator::LongAccumulator;
///
/// let seen = LongAccumulator::new(0, |a: i64, b: i64| a | b);
/// seen.accumulate(0b0001);
/// seen.accumulate(0b0100);
/// assert_eq!(seen.get(), 0b0101);
/// ```
pub struct Accumulator<T: CellValue, F> {
    pub(super) name: &'static str,
    identity: T,
    combine: F,
    inner: Striped<T>,
}

impl<F: Combine<i64>> Accumulator<i64, F> {
    /// Creates an `i64` accumulator holding `identity`.
    ///
    /// Usable in `static`s:
    ///
    /// ```rust
    /// use strisce::counters::accumulator::LongAccumulator;
    /// use strisce::striped::Max;
    ///
    /// static HIGH_WATER: LongAccumulator<Max> =
    ///     LongAccumulator::new(i64::MIN, Max).with_name("high_water");
    ///
    /// HIGH_WATER.accumulate(12);
    /// assert_eq!(HIGH_WATER.get(), 12);
    /// ```
    pub const fn new(identity: i64, combine: F) -> Self {
        Accumulator {
            name: "",
            identity,
            combine,
            inner: Striped::from_bits(identity),
        }
    }
}

impl<F: Combine<f64>> Accumulator<f64, F> {
    /// Creates an `f64` accumulator holding `identity`.
    pub const fn new(identity: f64, combine: F) -> Self {
        Accumulator {
            name: "",
            identity,
            combine,
            inner: Striped::from_bits(f64::to_bits(identity) as i64),
        }
    }
}

impl<T: CellValue, F: Combine<T>> Accumulator<T, F> {
    /// Creates an accumulator holding `identity`, for any payload type.
    pub fn with_identity(identity: T, combine: F) -> Self {
        Accumulator {
            name: "",
            identity,
            combine,
            inner: Striped::with_initial(identity),
        }
    }

    /// Sets the name of this accumulator, returning `self` for method chaining.
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
        Ok(Accumulator {
            name: self.name,
            identity: self.identity,
            combine: self.combine,
            inner: self.inner.with_parallelism(parallelism)?,
        })
    }

    /// Folds `x` in using the calling thread's probe.
    #[inline]
    pub fn accumulate(&self, x: T) {
        Probe::with_current(|probe| self.inner.update(x, &self.combine, probe));
    }

    /// Folds `x` in using an explicit probe.
    #[inline]
    pub fn accumulate_with(&self, probe: &mut Probe, x: T) {
        self.inner.update(x, &self.combine, probe);
    }

    /// Returns the current fold.
    #[inline]
    pub fn get(&self) -> T {
        self.inner.fold(&self.combine)
    }

    /// Resets the fold to the identity.
    ///
    /// Only meaningful when no thread is accumulating concurrently.
    pub fn reset(&self) {
        self.inner.reset(self.identity);
    }

    /// Returns the current fold and resets it to the identity.
    pub fn get_then_reset(&self) -> T {
        self.inner.fold_then_reset(self.identity, &self.combine)
    }

    /// The identity the accumulator starts from and resets to.
    pub fn identity(&self) -> T {
        self.identity
    }

    /// Returns the underlying accumulator.
    pub fn striped(&self) -> &Striped<T> {
        &self.inner
    }
}

impl<T, F> Observable for Accumulator<T, F>
where
    T: CellValue + Into<CounterValue>,
    F: Combine<T> + Send + Sync,
{
    #[inline]
    fn value(&self) -> CounterValue {
        self.get().into()
    }

    #[inline]
    fn name(&self) -> &str {
        self.name
    }

    #[inline]
    fn value_and_reset(&self) -> CounterValue {
        self.get_then_reset().into()
    }

    #[inline]
    fn stripes(&self) -> usize {
        self.inner.table_len()
    }
}

impl<T: CellValue, F> Debug for Accumulator<T, F> {
    /// Formats the accumulator showing its base and planted cells.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{:?}", self.name, self.inner)
    }
}
