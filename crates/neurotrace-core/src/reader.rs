//! Single-trace CSV reader.

use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, info, warn};

use neurotrace_types::{ColumnMap, Trace};

use crate::columns::{detect_columns, parse_number};
use crate::error::{Error, Result};

/// Options controlling how a CSV is read.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReadOptions {
    /// Field delimiter (default `,`).
    pub delimiter: u8,
    /// Sample interval in seconds, used when the file has no time column.
    pub dt: Option<f64>,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            dt: None,
        }
    }
}

impl ReadOptions {
    /// Set the sample interval used to synthesize timestamps.
    #[must_use]
    pub fn with_dt(mut self, dt: Option<f64>) -> Self {
        self.dt = dt;
        self
    }

    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }
}

/// How rows are turned into samples, decided once from the first row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowMode {
    /// Named columns, picked from the header.
    Columns(ColumnMap),
    /// No usable header: only fully numeric rows count.
    Headerless { single_column: bool },
}

/// Result of reading a single-trace CSV.
#[derive(Debug, Clone)]
pub struct TraceReading {
    pub trace: Trace,
    /// Columns used, or `None` when the file was read without a header.
    pub columns: Option<ColumnMap>,
    /// Rows dropped because a required field did not parse (the header included).
    pub skipped_rows: usize,
    /// Whether the first row was dropped as a header.
    pub header_skipped: bool,
    /// Whether timestamps came from the sample interval rather than the file.
    pub synthesized_times: bool,
}

/// Read a trace from a CSV file.
///
/// # Errors
///
/// - [`Error::InputNotFound`] if `path` does not exist
/// - [`Error::MissingTimeInfo`] if no time column exists and `opts.dt` is `None`
/// - [`Error::EmptyInput`] if no row yields a sample
pub fn read_trace(path: &Path, opts: &ReadOptions) -> Result<TraceReading> {
    if !path.exists() {
        return Err(Error::InputNotFound(path.to_path_buf()));
    }

    info!("Reading {}", path.display());
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(opts.delimiter)
        .from_path(path)?;

    let mut mode: Option<RowMode> = None;
    let mut times: Vec<f64> = Vec::new();
    let mut values: Vec<f64> = Vec::new();
    let mut skipped_rows = 0usize;
    let mut header_skipped = false;

    for record in reader.records() {
        let record = record?;
        if record.is_empty() {
            continue;
        }

        let first_row = mode.is_none();
        let mode = *mode.get_or_insert_with(|| row_mode(&record));
        match parse_row(&record, mode) {
            Ok((time, value)) => {
                if let Some(t) = time {
                    times.push(t);
                }
                values.push(value);
            }
            Err(e) => {
                if first_row {
                    header_skipped = true;
                } else {
                    debug!("Skipping row: {}", e);
                }
                skipped_rows += 1;
            }
        }
    }

    if values.is_empty() {
        return Err(Error::EmptyInput(path.to_path_buf()));
    }
    if skipped_rows > 0 {
        debug!("Skipped {} unparseable row(s)", skipped_rows);
    }

    let columns = match mode {
        Some(RowMode::Columns(map)) => Some(map),
        _ => None,
    };
    let file_has_times = !times.is_empty();

    let trace = if file_has_times {
        if opts.dt.is_some() {
            debug!("Time column present; ignoring sample interval");
        }
        Trace::with_times(times, values)?
    } else {
        let dt = opts.dt.ok_or(Error::MissingTimeInfo)?;
        Trace::from_interval(values, dt)?
    };

    info!(
        "Read {} samples ({} skipped row(s))",
        trace.len(),
        skipped_rows
    );

    Ok(TraceReading {
        trace,
        columns,
        skipped_rows,
        header_skipped,
        synthesized_times: !file_has_times,
    })
}

/// Convenience wrapper returning only the trace.
pub fn read_trace_from(path: impl AsRef<Path>, opts: &ReadOptions) -> Result<Trace> {
    read_trace(path.as_ref(), opts).map(|r| r.trace)
}

fn row_mode(first: &StringRecord) -> RowMode {
    let header: Vec<&str> = first.iter().collect();
    let map = detect_columns(&header);
    if map.value.is_some() {
        debug!("Detected columns: time={:?}, value={:?}", map.time, map.value);
        RowMode::Columns(map)
    } else {
        warn!("No voltage column recognized; reading numeric rows without a header");
        RowMode::Headerless {
            single_column: header.len() == 1,
        }
    }
}

fn line_of(record: &StringRecord) -> u64 {
    record.position().map_or(0, |p| p.line())
}

fn field(record: &StringRecord, index: usize) -> Result<f64> {
    let cell = record.get(index).ok_or_else(|| Error::UnparseableRow {
        line: line_of(record),
        reason: format!("missing column {}", index),
    })?;
    parse_number(cell).ok_or_else(|| Error::UnparseableRow {
        line: line_of(record),
        reason: format!("'{}' is not a number", cell.trim()),
    })
}

/// Turn one record into `(time, value)`. Both fields parse or the row is rejected.
fn parse_row(record: &StringRecord, mode: RowMode) -> Result<(Option<f64>, f64)> {
    match mode {
        RowMode::Columns(map) => {
            let time = map.time.map(|i| field(record, i)).transpose()?;
            let value_idx = map.value.unwrap_or(0);
            let value = field(record, value_idx)?;
            Ok((time, value))
        }
        RowMode::Headerless { single_column } => {
            let numbers = (0..record.len())
                .map(|i| field(record, i))
                .collect::<Result<Vec<_>>>()?;
            match (single_column, numbers.as_slice()) {
                (true, [value, ..]) => Ok((None, *value)),
                (false, [time, value, ..]) => Ok((Some(*time), *value)),
                _ => Err(Error::UnparseableRow {
                    line: line_of(record),
                    reason: "too few columns".to_string(),
                }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_read_time_voltage_columns() {
        let file = write_csv("time,voltage\n0,-65\n0.001,-64\n0.002,30\n");
        let reading = read_trace(file.path(), &ReadOptions::default()).unwrap();

        assert_eq!(reading.trace.values(), &[-65.0, -64.0, 30.0]);
        assert_eq!(reading.trace.times().unwrap(), &[0.0, 0.001, 0.002]);
        assert_eq!(reading.columns, Some(ColumnMap::new(Some(0), Some(1))));
        // header row is dropped as unparseable
        assert_eq!(reading.skipped_rows, 1);
        assert!(reading.header_skipped);
        assert!(!reading.synthesized_times);
    }

    #[test]
    fn test_bad_rows_drop_both_fields() {
        let file = write_csv("time,voltage\n0,-65\n0.001,oops\nbad,-10\n0.003,30\n");
        let reading = read_trace(file.path(), &ReadOptions::default()).unwrap();

        assert_eq!(reading.trace.values(), &[-65.0, 30.0]);
        assert_eq!(reading.trace.times().unwrap(), &[0.0, 0.003]);
        assert_eq!(reading.skipped_rows, 3);
    }

    #[test]
    fn test_non_finite_values_are_skipped() {
        let file = write_csv("time,voltage\n0,-65\n0.001,NaN\n0.002,inf\n0.003,-60\n");
        let trace = read_trace_from(file.path(), &ReadOptions::default()).unwrap();
        assert_eq!(trace.values(), &[-65.0, -60.0]);
    }

    #[test]
    fn test_missing_input_file() {
        let err = read_trace(Path::new("/no/such/trace.csv"), &ReadOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::InputNotFound(_)));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_missing_time_info_without_dt() {
        let file = write_csv("voltage\n-65\n-64\n30\n");
        let err = read_trace(file.path(), &ReadOptions::default()).unwrap_err();
        assert!(matches!(err, Error::MissingTimeInfo));
        assert!(err.to_string().contains("--dt"));
    }

    #[test]
    fn test_dt_synthesizes_times() {
        let file = write_csv("voltage\n-65\n-64\n30\n");
        let opts = ReadOptions::default().with_dt(Some(0.5));
        let reading = read_trace(file.path(), &opts).unwrap();

        assert_eq!(reading.trace.times().unwrap(), &[0.0, 0.5, 1.0]);
        assert!(reading.synthesized_times);
    }

    #[test]
    fn test_time_column_wins_over_dt() {
        let file = write_csv("time,voltage\n1,-65\n2,-64\n");
        let opts = ReadOptions::default().with_dt(Some(0.5));
        let trace = read_trace_from(file.path(), &opts).unwrap();
        assert_eq!(trace.times().unwrap(), &[1.0, 2.0]);
    }

    #[test]
    fn test_headerless_two_columns() {
        let file = write_csv("0,-65\n0.001,-64\n0.002,30\n");
        let reading = read_trace(file.path(), &ReadOptions::default()).unwrap();
        assert_eq!(reading.trace.values(), &[-65.0, -64.0, 30.0]);
        assert_eq!(reading.trace.times().unwrap(), &[0.0, 0.001, 0.002]);
        assert_eq!(reading.columns, Some(ColumnMap::new(Some(0), Some(1))));
        assert_eq!(reading.skipped_rows, 0);
        assert!(!reading.header_skipped);
    }

    #[test]
    fn test_headerless_bad_row_is_not_a_header() {
        let file = write_csv("0,-65
0.001,oops
0.002,30
");
        let reading = read_trace(file.path(), &ReadOptions::default()).unwrap();
        assert_eq!(reading.trace.values(), &[-65.0, 30.0]);
        assert_eq!(reading.skipped_rows, 1);
        assert!(!reading.header_skipped);
    }

    #[test]
    fn test_headerless_single_column_needs_dt() {
        let file = write_csv("-65\n-64\n30\n");
        let err = read_trace(file.path(), &ReadOptions::default()).unwrap_err();
        assert!(matches!(err, Error::MissingTimeInfo));

        let opts = ReadOptions::default().with_dt(Some(0.001));
        let trace = read_trace_from(file.path(), &opts).unwrap();
        assert_eq!(trace.values(), &[-65.0, -64.0, 30.0]);
    }

    #[test]
    fn test_unnamed_wide_file_falls_back_to_numeric_rows() {
        // three columns, none named like a voltage: read numeric rows as time, value
        let file = write_csv("time,a,b\n0,1,2\n1,3,x\n2,5,6\n");
        let reading = read_trace(file.path(), &ReadOptions::default()).unwrap();
        assert_eq!(reading.trace.times().unwrap(), &[0.0, 2.0]);
        assert_eq!(reading.trace.values(), &[1.0, 5.0]);
        assert!(reading.header_skipped);
        assert_eq!(reading.skipped_rows, 2);
    }

    #[test]
    fn test_semicolon_delimiter() {
        let file = write_csv("time;voltage\n0;-65\n1;-64\n");
        let opts = ReadOptions::default().with_delimiter(b';');
        let trace = read_trace_from(file.path(), &opts).unwrap();
        assert_eq!(trace.values(), &[-65.0, -64.0]);
    }

    #[test]
    fn test_no_samples_is_empty_input() {
        let file = write_csv("time,voltage\nx,y\n");
        let err = read_trace(file.path(), &ReadOptions::default()).unwrap_err();
        assert!(matches!(err, Error::EmptyInput(_)));
    }

    #[test]
    fn test_unparseable_row_is_recoverable() {
        let err = Error::UnparseableRow {
            line: 3,
            reason: "'x' is not a number".to_string(),
        };
        assert!(err.is_recoverable());
        assert!(err.to_string().contains("line 3"));
    }
}
