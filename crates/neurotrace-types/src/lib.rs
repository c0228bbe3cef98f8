//! Shared types for neurotrace voltage recordings.
//!
//! This crate holds the data model used by the reader (`neurotrace-core`),
//! the persistence layer (`neurotrace-store`) and the CLI.
//!
//! # Features
//!
//! - [`Trace`]: one channel of samples with optional timestamps
//! - [`LabeledSeries`] and [`SeriesSet`]: multi-trace files, in file order
//! - [`Layout`] and [`ColumnMap`]: outcomes of CSV shape detection
//! - [`Provenance`]: free-form metadata attached to archives
//!
//! # Example
//!
//! ```
//! use neurotrace_types::Trace;
//!
//! let trace = Trace::from_interval(vec![-65.0, -64.0, 30.0], 0.001).unwrap();
//! assert_eq!(trace.times_ms().unwrap(), vec![0.0, 1.0, 2.0]);
//! ```

pub mod error;
pub mod types;

pub use error::{TraceError, TraceResult};
pub use types::{
    ColumnMap, LabeledSeries, Layout, Provenance, SeriesSet, Trace, interval_times,
};
