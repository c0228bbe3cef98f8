//! Error types for trace construction in neurotrace-types.

use thiserror::Error;

/// Errors that can occur when building a trace.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum TraceError {
    /// Times and values do not pair up.
    #[error("Trace length mismatch: {times} timestamps for {values} samples")]
    LengthMismatch { times: usize, values: usize },

    /// Sample interval must be a positive, finite number of seconds.
    #[error("Invalid sample interval: {0} (must be positive and finite)")]
    InvalidInterval(f64),
}

/// Result type alias using neurotrace-types' TraceError type.
pub type TraceResult<T> = std::result::Result<T, TraceError>;
