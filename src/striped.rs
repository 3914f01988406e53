//! The striped accumulation engine.
//!
//! This module provides [`Striped`], a lock-free accumulator that spreads
//! concurrent updates over a table of cache-padded cells once it observes
//! contention, and the pieces it is built from.
//!
//! # Architecture
//!
//! ```text
//!                 update(x)
//!                     │
//!        no table? ───┼─── table exists?
//!            │                  │
//!            ▼                  ▼
//!     CAS on base        CAS on cells[probe & (n-1)]
//!            │                  │
//!       failed ──────┬──────── failed / empty slot
//!                    ▼
//!               accumulate(x)
//!     ┌──────────────────────────────────────────┐
//!     │ empty slot     → plant a new cell        │
//!     │ cell collision → rehash probe, retry     │
//!     │ 2nd collision  → double the table (≤ cap)│
//!     │ no table       → create it (2 cells)     │
//!     │ busy flag held → fall back on base       │
//!     └──────────────────────────────────────────┘
//! ```
//!
//! A single busy flag guards every structural change: creating the table,
//! growing it and planting a cell into an empty slot. It is acquired with one
//! compare-and-swap and never waited on; a thread that misses it rehashes and
//! tries elsewhere. Ordinary cell updates never touch it.
//!
//! # Table Cap
//!
//! The table stops growing at the smallest power of two not below the number
//! of execution units (see [`default_max_cells`] and
//! [`Striped::with_parallelism`]). Past that point contending threads only
//! rehash, which converges towards one cell per active thread without
//! pre-allocating a cell per thread.
//!
//! # Payloads
//!
//! Cells hold 64-bit integer words. [`CellValue`] maps `i64` and `f64` onto
//! them, so both payloads share one state machine: `f64` values travel as raw
//! bit patterns and are decoded only inside the [`Combine`]r.

mod bits;
mod cell;
mod combine;
mod engine;
mod probe;
mod table;

pub use bits::CellValue;
pub use cell::Cell;
pub use combine::{Combine, Max, Min, Sum};
pub use engine::{cells_for, default_max_cells, Striped, MAX_PARALLELISM};
pub use probe::{xorshift, Probe};
