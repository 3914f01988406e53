//! # Strisce - Contention-Adaptive Striped Accumulators
//!
//! A Rust library for accumulating values from many threads at once: sums,
//! extrema, or any commutative fold. Updates stay on a single atomic word
//! while nobody competes for it, and spread over a growing table of
//! cache-padded cells as soon as they do.
//!
//! ## The Problem
//!
//! A single shared atomic is correct but does not scale: every update needs
//! exclusive ownership of the cache line holding it, so under contention the
//! line bounces between cores and compare-and-swap loops keep failing.
//!
//! Sharding with one slot per thread fixes that, at the price of a full
//! table per counter even in programs that never contend.
//!
//! ## The Solution: Adaptive Striping
//!
//! [`Striped`](striped::Striped) starts with a single `base` word. Only when
//! a compare-and-swap on it fails does it allocate a table of two cells, and
//! it doubles that table each time threads keep colliding, up to the number
//! of CPUs. Each thread carries a probe hash that picks its cell and is
//! rehashed on collision, so active threads drift onto cells of their own.
//!
//! ### Design Principles
//!
//! 1. **Pay for contention only when it happens**: an uncontended counter is
//!    one word plus a null table pointer.
//!
//! 2. **Never wait**: the only lock is a busy flag guarding structural table
//!    changes. It is taken with one compare-and-swap and never waited on;
//!    a thread that misses it tries another cell or the base.
//!
//! 3. **Cache Line Padding**: every cell is wrapped in
//!    [`crossbeam_utils::CachePadded`] to rule out false sharing.
//!
//! 4. **Aggregation on Read**: the value is the base folded with every cell.
//!    Reads are not atomic snapshots, which is the right trade-off for
//!    counters (many writes, few reads).
//!
//! ## Available Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Striped`](striped::Striped) | The engine: any payload, any combiner |
//! | [`LongAdder`](counters::adder::LongAdder) | `i64` sum |
//! | [`DoubleAdder`](counters::adder::DoubleAdder) | `f64` sum |
//! | [`Accumulator`](counters::accumulator::Accumulator) | Custom fold |
//! | [`Maximum`](counters::maximum::Maximum) | Largest observed value |
//! | [`Minimum`](counters::minimum::Minimum) | Smallest observed value |
//! | [`Average`](counters::average::Average) | Running mean |
//!
//! ## Quick Start
//!
//! ```rust
//! use strisce::counters::adder::LongAdder;
//! use strisce::counters::Observable;
//!
//! static REQUESTS: LongAdder = LongAdder::named("requests");
//!
//! REQUESTS.increment();
//! REQUESTS.add(5);
//!
//! println!("Total requests: {}", REQUESTS.value());
//! ```
//!
//! ## Driving the Engine Directly
//!
//! ```rust
//! use strisce::striped::{Probe, Striped, Sum};
//!
//! let acc: Striped<i64> = Striped::new();
//! let mut probe = Probe::new();
//!
//! // fast path: one compare-and-swap on base, or on the probe's cell
//! acc.update(3, &Sum, &mut probe);
//! // slow path, as after a failed compare-and-swap
//! acc.accumulate(4, &Sum, false, &mut probe);
//!
//! assert_eq!(acc.fold(&Sum), 7);
//! ```
//!
//! ## Observers
//!
//! | Feature | Module | Description |
//! |---------|--------|-------------|
//! | `table` | [`observers::table`] | Pretty-print counters as ASCII tables |
//! | `json` | [`observers::json`] | Serialize counters to JSON |
//! | `serde` | [`snapshot`] | Serializable counter snapshots |
//! | `full` | All of the above | |
//!
//! ## Logging
//!
//! Table creation and growth are reported through the [`log`] facade at
//! `debug` level, cell planting at `trace`. Nothing is logged per update.

#[cfg(not(all(target_has_atomic = "64", target_has_atomic = "ptr")))]
compile_error!("strisce requires 64-bit and pointer-sized atomic compare-and-swap");

pub mod counters;
pub mod error;
pub mod observers;
pub mod striped;

#[cfg(feature = "serde")]
pub mod snapshot;

pub use error::{Error, Result};
