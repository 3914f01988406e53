//! The padded atomic slot that holds one partial accumulation.

use std::fmt::{self, Debug};
use std::sync::atomic::{AtomicI64, Ordering};

use crossbeam_utils::CachePadded;

/// A single cache-padded 64-bit atomic word.
///
/// Cells are the unit of striping: every cell lives on its own cache line
/// (via [`CachePadded`]), so two threads hammering neighbouring slots of the
/// same table never invalidate each other's line.
///
/// The payload is always a raw bit pattern; the numeric meaning (`i64` or
/// `f64`) is applied by the owning [`Striped`](super::Striped) at the
/// combiner boundary.
///
/// A cell only supports [`load`](Cell::load) and [`cas`](Cell::cas). Every
/// mutation, resets included, goes through compare-and-swap.
pub struct Cell {
    value: CachePadded<AtomicI64>,
}

impl Cell {
    /// Creates a cell holding `bits`.
    pub const fn new(bits: i64) -> Self {
        Cell {
            value: CachePadded::new(AtomicI64::new(bits)),
        }
    }

    /// Reads the current bit pattern.
    #[inline]
    pub fn load(&self) -> i64 {
        self.value.load(Ordering::Relaxed)
    }

    /// Replaces the content with `new` iff it currently equals `expected`.
    ///
    /// This is a strong compare-and-swap: it never fails spuriously.
    #[inline]
    pub fn cas(&self, expected: i64, new: i64) -> bool {
        self.value
            .compare_exchange(expected, new, Ordering::Relaxed, Ordering::Relaxed)
            .is_ok()
    }

    /// Swaps in `new` through a `load`/`cas` loop and returns the old bits.
    #[inline]
    pub(crate) fn exchange(&self, new: i64) -> i64 {
        loop {
            let current = self.load();
            if self.cas(current, new) {
                return current;
            }
        }
    }
}

impl Debug for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Cell").field(&self.load()).finish()
    }
}
