//! Combining functions applied by the accumulator.

use super::CellValue;

/// A commutative, associative binary operation over a payload type.
///
/// `combine(current, x)` returns the new partial value after folding the
/// operand `x` into `current`. Correct results across cells require the
/// operation to be commutative and associative: cells are folded in table
/// order, not in update order.
///
/// Any `Fn(T, T) -> T` closure is a combiner:
///
/// ```rust
/// use strisce::striped::{Combine, Sum};
///
/// let product = |a: i64, b: i64| a * b;
/// assert_eq!(product.combine(6, 7), 42);
/// assert_eq!(Sum.combine(6i64, 7), 13);
/// ```
pub trait Combine<T> {
    /// Folds `x` into `current`.
    fn combine(&self, current: T, x: T) -> T;
}

impl<T, F> Combine<T> for F
where
    F: Fn(T, T) -> T,
{
    #[inline]
    fn combine(&self, current: T, x: T) -> T {
        self(current, x)
    }
}

/// Plain addition, the combiner used by adders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sum;

impl<T: CellValue> Combine<T> for Sum {
    #[inline]
    fn combine(&self, current: T, x: T) -> T {
        current.plus(x)
    }
}

/// Keeps the larger operand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Max;

impl<T: CellValue + PartialOrd> Combine<T> for Max {
    #[inline]
    fn combine(&self, current: T, x: T) -> T {
        if x > current {
            x
        } else {
            current
        }
    }
}

/// Keeps the smaller operand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Min;

impl<T: CellValue + PartialOrd> Combine<T> for Min {
    #[inline]
    fn combine(&self, current: T, x: T) -> T {
        if x < current {
            x
        } else {
            current
        }
    }
}
