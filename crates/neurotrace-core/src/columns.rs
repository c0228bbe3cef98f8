//! Header heuristics for locating the time and voltage columns.
//!
//! Everything here is pure so it can be tested without touching the filesystem.

use neurotrace_types::ColumnMap;

/// Substrings that mark a time-bearing column in the single-trace converter.
pub const TIME_CANDIDATES: &[&str] = &["time", "t(s)", "t", "ms", "s"];

/// Substrings that mark a voltage column.
pub const VALUE_CANDIDATES: &[&str] = &["voltage", "v(mv)", "v", "vm", "vm(mv)", "membrane"];

/// Exact names accepted as the time column of a column-oriented multi-trace file,
/// in priority order.
pub const SERIES_TIME_NAMES: &[&str] = &["time", "t", "ms"];

/// Parse one CSV cell as a sample.
///
/// Surrounding whitespace is ignored. Non-finite values (`NaN`, `inf`) are
/// rejected the same way as text.
///
/// ```
/// use neurotrace_core::columns::parse_number;
///
/// assert_eq!(parse_number(" -65.5 "), Some(-65.5));
/// assert_eq!(parse_number("1e-3"), Some(0.001));
/// assert_eq!(parse_number("voltage"), None);
/// assert_eq!(parse_number("NaN"), None);
/// ```
#[must_use]
pub fn parse_number(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Whether a cell holds a sample value.
#[must_use]
pub fn is_numeric(cell: &str) -> bool {
    parse_number(cell).is_some()
}

fn matches_any(name: &str, candidates: &[&str]) -> bool {
    candidates.iter().any(|c| name.contains(c))
}

/// Map a header row to the indices of its time and voltage columns.
///
/// The time column is the first header whose lower-cased name contains one of
/// [`TIME_CANDIDATES`]. The voltage column is the first other header containing
/// one of [`VALUE_CANDIDATES`]. When nothing matches at all and there are at
/// least two columns, `time = 0, value = 1` is assumed. When only the time
/// column is named and there are exactly two columns, the other one is used.
///
/// ```
/// use neurotrace_core::columns::detect_columns;
///
/// let map = detect_columns(&["Time (s)", "Vm (mV)"]);
/// assert_eq!((map.time, map.value), (Some(0), Some(1)));
/// ```
#[must_use]
pub fn detect_columns<S: AsRef<str>>(header: &[S]) -> ColumnMap {
    let names: Vec<String> = header
        .iter()
        .map(|h| h.as_ref().trim().to_lowercase())
        .collect();

    let time = names.iter().position(|n| matches_any(n, TIME_CANDIDATES));
    let mut value = names
        .iter()
        .enumerate()
        .find(|(i, n)| Some(*i) != time && matches_any(n, VALUE_CANDIDATES))
        .map(|(i, _)| i);

    if time.is_none() && value.is_none() && names.len() >= 2 {
        return ColumnMap::new(Some(0), Some(1));
    }

    // only reached with a time column when there are two columns
    if value.is_none() && names.len() == 2 {
        value = Some(if time == Some(0) { 1 } else { 0 });
    }

    ColumnMap::new(time, value)
}

/// Locate the time column of a column-oriented multi-trace header.
///
/// Names must already be trimmed and lower-cased. Falls back to column 0.
#[must_use]
pub fn series_time_column<S: AsRef<str>>(header: &[S]) -> usize {
    SERIES_TIME_NAMES
        .iter()
        .find_map(|name| header.iter().position(|h| h.as_ref() == *name))
        .unwrap_or(0)
}
