//! Error types for neurotrace-core.

use std::path::PathBuf;

use neurotrace_types::TraceError;

/// Result type for neurotrace-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading traces.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The input file does not exist.
    #[error("Input CSV not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// No time column was detected and no sample interval was supplied.
    #[error(
        "No time column detected; re-run with a sample interval in seconds (e.g. --dt 0.0005)"
    )]
    MissingTimeInfo,

    /// A row could not be parsed. The reader recovers from this by dropping the row.
    #[error("Unparseable row at line {line}: {reason}")]
    UnparseableRow { line: u64, reason: String },

    /// The file contained no usable samples.
    #[error("No numeric samples found in {}", .0.display())]
    EmptyInput(PathBuf),

    /// A time axis is not numeric or cannot be generated.
    #[error("Invalid time axis: {0}")]
    InvalidTimeAxis(String),

    /// Timestamps and values could not be paired.
    #[error("Invalid trace: {0}")]
    Trace(#[from] TraceError),

    /// CSV decoding error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether the run can continue after this error.
    ///
    /// Only per-row parse failures are recoverable; everything else ends the run.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::UnparseableRow { .. })
    }
}
