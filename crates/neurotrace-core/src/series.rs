//! Multi-trace CSV reader.
//!
//! A multi-trace file holds one shared time axis and several labeled voltage
//! series, either one series per row or one series per column. The layout is
//! sniffed once per file (see [`sniff_layout`]) and the file is then parsed
//! by the matching strategy.

use std::path::Path;

use csv::ReaderBuilder;
use tracing::{debug, info, warn};

use neurotrace_types::{LabeledSeries, Layout, SeriesSet, Trace};

use crate::columns::{is_numeric, parse_number, series_time_column};
use crate::error::{Error, Result};
use crate::layout::{is_blank_row, sniff_layout};

/// Label used for a row-oriented series whose label cell is empty.
pub const DEFAULT_SERIES_LABEL: &str = "series";

/// Read every labeled series from a CSV file.
///
/// # Errors
///
/// - [`Error::InputNotFound`] if `path` does not exist
/// - [`Error::EmptyInput`] if the file has no non-blank rows or no usable series
/// - [`Error::InvalidTimeAxis`] if the time axis does not parse
pub fn read_series(path: &Path, delimiter: u8) -> Result<SeriesSet> {
    if !path.exists() {
        return Err(Error::InputNotFound(path.to_path_buf()));
    }

    info!("Reading series from {}", path.display());
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_path(path)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect::<Vec<_>>());
    }

    let set = parse_series(rows)?;
    if set.is_empty() {
        return Err(Error::EmptyInput(path.to_path_buf()));
    }
    Ok(set)
}

/// Parse already-split rows into labeled series.
///
/// Blank rows are dropped before the layout is sniffed.
pub fn parse_series(rows: Vec<Vec<String>>) -> Result<SeriesSet> {
    let rows: Vec<Vec<String>> = rows.into_iter().filter(|r| !is_blank_row(r)).collect();
    if rows.is_empty() {
        return Ok(SeriesSet::default());
    }

    let layout = sniff_layout(&rows);
    debug!("Detected {} layout", layout);

    match layout {
        Layout::RowOriented => parse_row_oriented(&rows),
        Layout::ColumnOriented => parse_column_oriented(&rows),
    }
}

fn parse_all(cells: &[String]) -> Option<Vec<f64>> {
    cells.iter().map(|c| parse_number(c)).collect()
}

fn parse_row_oriented(rows: &[Vec<String>]) -> Result<SeriesSet> {
    let mut set = SeriesSet::new(Layout::RowOriented);

    let time_cells = rows[0].get(1..).unwrap_or(&[]);
    let times = parse_all(time_cells)
        .ok_or_else(|| Error::InvalidTimeAxis(format!("row 1: {}", rows[0].join(","))))?;

    for row in &rows[1..] {
        let label = row.first().map_or("", |c| c.trim());
        let label = if label.is_empty() {
            DEFAULT_SERIES_LABEL
        } else {
            label
        };

        let Some(values) = parse_all(row.get(1..).unwrap_or(&[])) else {
            warn!("Skipping non-numeric series {}", label);
            continue;
        };
        match Trace::with_times(times.clone(), values) {
            Ok(trace) => set.push(LabeledSeries::new(label, trace)),
            Err(e) => warn!("Skipping series {}: {}", label, e),
        }
    }

    Ok(set)
}

fn parse_column_oriented(rows: &[Vec<String>]) -> Result<SeriesSet> {
    let mut set = SeriesSet::new(Layout::ColumnOriented);

    let mut header: Vec<String> = rows[0].iter().map(|c| c.trim().to_lowercase()).collect();
    let has_header = header.iter().any(|h| !h.is_empty() && !is_numeric(h));
    let data_rows = if has_header {
        &rows[1..]
    } else {
        header = (0..rows[0].len()).map(|i| format!("col{}", i)).collect();
        rows
    };

    // Transpose, truncating to the shortest row
    let width = data_rows.iter().map(Vec::len).min().unwrap_or(0);
    let columns: Vec<Vec<String>> = (0..width)
        .map(|i| data_rows.iter().map(|r| r[i].clone()).collect())
        .collect();
    if columns.is_empty() {
        return Ok(set);
    }

    let time_idx = series_time_column(&header);
    let time_col = columns
        .get(time_idx)
        .ok_or_else(|| Error::InvalidTimeAxis(format!("no column {}", time_idx)))?;
    let times = parse_all(time_col).ok_or_else(|| {
        let name = header.get(time_idx).cloned().unwrap_or_default();
        Error::InvalidTimeAxis(format!("column '{}' is not numeric", name))
    })?;

    for (i, column) in columns.iter().enumerate() {
        if i == time_idx {
            continue;
        }
        let label = header.get(i).cloned().unwrap_or_else(|| format!("col{}", i));
        let Some(values) = parse_all(column) else {
            warn!("Skipping non-numeric column {}", label);
            continue;
        };
        set.push(LabeledSeries::new(label, Trace::with_times(times.clone(), values)?));
    }

    Ok(set)
}
