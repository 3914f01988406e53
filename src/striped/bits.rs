//! Bit reinterpretation between payload values and cell words.
//!
//! Cells only understand 64-bit integer words. Floating-point payloads ride
//! through the same cells by their raw IEEE-754 bit pattern and are decoded
//! only when a combiner needs to look at them.

use std::fmt::Debug;

/// A payload type that can be carried by a [`Cell`](super::Cell).
///
/// Implemented for `i64` (identity encoding) and `f64` (raw bit pattern).
/// The encoding must be lossless: `from_bits(to_bits(x))` is bit-identical
/// to `x`.
pub trait CellValue: Copy + Debug + Send + Sync + 'static {
    /// Encodes the value as a cell word.
    fn to_bits(self) -> i64;

    /// Decodes a cell word.
    fn from_bits(bits: i64) -> Self;

    /// The payload's plain addition, used by [`Sum`](super::Sum).
    ///
    /// Integer addition wraps on overflow.
    fn plus(self, other: Self) -> Self;
}

impl CellValue for i64 {
    #[inline]
    fn to_bits(self) -> i64 {
        self
    }

    #[inline]
    fn from_bits(bits: i64) -> Self {
        bits
    }

    #[inline]
    fn plus(self, other: Self) -> Self {
        self.wrapping_add(other)
    }
}

impl CellValue for f64 {
    #[inline]
    fn to_bits(self) -> i64 {
        bytemuck::cast(self)
    }

    #[inline]
    fn from_bits(bits: i64) -> Self {
        bytemuck::cast(bits)
    }

    #[inline]
    fn plus(self, other: Self) -> Self {
        self + other
    }
}
