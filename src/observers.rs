//! Observer implementations for reading out and exporting counters.
//!
//! Observers take any iterator of [`Observable`](crate::counters::Observable)
//! trait objects, so a single call can report adders, accumulators and
//! averages side by side:
//!
//! - [`table`] - Pretty-print counters as tables using the `tabled` crate
//! - [`json`] - Serialize counters to JSON format
//!
//! # Error Handling
//!
//! Rendering a table cannot fail. Serializing can, and reports an
//! `ObserverError` through the `Result` alias exported here when the `json`
//! feature is enabled.
//!
//! # Feature Flags
//!
//! Each observer is gated behind a feature flag to minimize dependencies:
//!
//! - `table` - Enables the [`table`] module
//! - `json` - Enables the [`json`] module (implies `serde`)
//! - `full` - Enables all observer modules
//!
//! # Example
//!
//! ```rust,ignore
//! use strisce::counters::adder::LongAdder;
//! use strisce::counters::Observable;
//! use strisce::observers::json::JsonObserver;
//! use strisce::observers::Result;
//!
//! static REQUESTS: LongAdder = LongAdder::named("requests");
//! static ERRORS: LongAdder = LongAdder::named("errors");
//!
//! fn export_metrics() -> Result<String> {
//!     let counters: &[&'static dyn Observable] = &[&REQUESTS, &ERRORS];
//!     JsonObserver::new().to_json_and_reset(counters.iter().copied())
//! }
//! ```

#[cfg(feature = "json")]
mod error;

#[cfg(feature = "json")]
pub use error::{ObserverError, Result};

#[cfg(feature = "table")]
pub mod table;

#[cfg(feature = "json")]
pub mod json;
