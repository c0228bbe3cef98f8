//! Reading and downsampling of voltage traces.
//!
//! This crate turns CSV recordings into [`Trace`](neurotrace_types::Trace)s
//! and reduces them for display.
//!
//! # Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`columns`] | Pure header heuristics (`header -> ColumnMap`) |
//! | [`reader`] | Single-trace CSV reader |
//! | [`layout`] | Row- vs column-oriented sniffing |
//! | [`series`] | Multi-trace CSV reader |
//! | [`downsample`] | Min/max interleaved downsampling |
//! | [`synth`] | Synthetic spike trains |
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use neurotrace_core::{ReadOptions, downsample_trace, read_trace, DEFAULT_MAX_POINTS};
//!
//! let reading = read_trace(Path::new("trace.csv"), &ReadOptions::default().with_dt(Some(0.0005)))?;
//! let preview = downsample_trace(&reading.trace, DEFAULT_MAX_POINTS);
//! println!("{} -> {} points", reading.trace.len(), preview.len());
//! # Ok::<(), neurotrace_core::Error>(())
//! ```

pub mod columns;
pub mod downsample;
mod error;
pub mod layout;
pub mod reader;
pub mod series;
pub mod synth;

pub use columns::detect_columns;
pub use downsample::{
    DEFAULT_MAX_POINTS, bucket_size, downsample_trace, minmax_downsample, stride_decimate,
};
pub use error::{Error, Result};
pub use layout::sniff_layout;
pub use reader::{ReadOptions, TraceReading, read_trace, read_trace_from};
pub use series::{parse_series, read_series};
pub use synth::{MAX_GENERATED_SAMPLES, SpikeTrainParams, generate_spike_train};
