//! Error type for accumulator configuration.
//!
//! Updates and reads never fail; only building an accumulator with an
//! unusable configuration does.

use thiserror::Error;

/// Errors returned while configuring an accumulator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The execution-unit count was zero.
    #[error("parallelism must be at least 1")]
    ZeroParallelism,

    /// The execution-unit count exceeded the supported maximum.
    #[error("parallelism {requested} exceeds the maximum of {max}")]
    ParallelismTooLarge {
        /// The rejected count.
        requested: usize,
        /// The largest accepted count.
        max: usize,
    },
}

/// Result type for accumulator configuration.
pub type Result<T> = std::result::Result<T, Error>;
