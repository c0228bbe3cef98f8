//! Core types for recorded voltage traces.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{TraceError, TraceResult};

/// A single channel of voltage samples with optional timestamps.
///
/// Values are assumed to be in millivolts and timestamps in seconds. When
/// timestamps are present there is exactly one per sample; the constructors
/// enforce this so every `Trace` in circulation is well-formed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Trace {
    times: Option<Vec<f64>>,
    values: Vec<f64>,
}

impl Trace {
    /// Create a trace with values only.
    #[must_use]
    pub fn from_values(values: Vec<f64>) -> Self {
        Self {
            times: None,
            values,
        }
    }

    /// Create a trace with paired timestamps.
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::LengthMismatch`] if `times` and `values` differ in length.
    ///
    /// # Examples
    ///
    /// ```
    /// use neurotrace_types::Trace;
    ///
    /// let trace = Trace::with_times(vec![0.0, 0.001], vec![-65.0, -64.0]).unwrap();
    /// assert_eq!(trace.len(), 2);
    /// assert!(Trace::with_times(vec![0.0], vec![-65.0, -64.0]).is_err());
    /// ```
    pub fn with_times(times: Vec<f64>, values: Vec<f64>) -> TraceResult<Self> {
        if times.len() != values.len() {
            return Err(TraceError::LengthMismatch {
                times: times.len(),
                values: values.len(),
            });
        }
        Ok(Self {
            times: Some(times),
            values,
        })
    }

    /// Create a trace whose timestamps are synthesized as `index * dt` seconds.
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::InvalidInterval`] unless `dt` is positive and finite.
    pub fn from_interval(values: Vec<f64>, dt: f64) -> TraceResult<Self> {
        let times = interval_times(values.len(), dt)?;
        Ok(Self {
            times: Some(times),
            values,
        })
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub fn has_times(&self) -> bool {
        self.times.is_some()
    }

    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    #[must_use]
    pub fn times(&self) -> Option<&[f64]> {
        self.times.as_deref()
    }

    /// Timestamps converted from seconds to milliseconds.
    #[must_use]
    pub fn times_ms(&self) -> Option<Vec<f64>> {
        self.times
            .as_ref()
            .map(|times| times.iter().map(|t| t * 1000.0).collect())
    }

    /// Split the trace into its timestamps and values.
    #[must_use]
    pub fn into_parts(self) -> (Option<Vec<f64>>, Vec<f64>) {
        (self.times, self.values)
    }
}

/// Build `[0, dt, 2*dt, ...]` with `n` entries.
pub fn interval_times(n: usize, dt: f64) -> TraceResult<Vec<f64>> {
    if !(dt.is_finite() && dt > 0.0) {
        return Err(TraceError::InvalidInterval(dt));
    }
    Ok((0..n).map(|i| i as f64 * dt).collect())
}

/// A trace carrying the label it was recorded under (e.g. `"WT"`).
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledSeries {
    pub label: String,
    pub trace: Trace,
}

impl LabeledSeries {
    pub fn new(label: impl Into<String>, trace: Trace) -> Self {
        Self {
            label: label.into(),
            trace,
        }
    }

    /// Label made safe for use in a file name: spaces become underscores.
    ///
    /// ```
    /// use neurotrace_types::{LabeledSeries, Trace};
    ///
    /// let series = LabeledSeries::new("wild type", Trace::default());
    /// assert_eq!(series.file_label(), "wild_type");
    /// ```
    #[must_use]
    pub fn file_label(&self) -> String {
        self.label.replace(' ', "_")
    }
}

/// Ordered collection of labeled series read from one multi-trace file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SeriesSet {
    /// Layout the file was recognized as.
    pub layout: Layout,
    series: Vec<LabeledSeries>,
}

impl SeriesSet {
    #[must_use]
    pub fn new(layout: Layout) -> Self {
        Self {
            layout,
            series: Vec::new(),
        }
    }

    /// Append a series, keeping file order.
    pub fn push(&mut self, series: LabeledSeries) {
        self.series.push(series);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.series.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Look up a series by its label.
    #[must_use]
    pub fn get(&self, label: &str) -> Option<&LabeledSeries> {
        self.series.iter().find(|s| s.label == label)
    }

    /// Labels in file order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.series.iter().map(|s| s.label.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LabeledSeries> {
        self.series.iter()
    }
}

impl<'a> IntoIterator for &'a SeriesSet {
    type Item = &'a LabeledSeries;
    type IntoIter = std::slice::Iter<'a, LabeledSeries>;

    fn into_iter(self) -> Self::IntoIter {
        self.series.iter()
    }
}

/// How a multi-trace CSV arranges its series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Layout {
    /// First row is the time axis, each later row is `label, values...`.
    RowOriented,
    /// Header row names the columns, each row is one sample instant.
    #[default]
    ColumnOriented,
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Layout::RowOriented => write!(f, "row-oriented"),
            Layout::ColumnOriented => write!(f, "column-oriented"),
        }
    }
}

/// Column indices detected from a CSV header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ColumnMap {
    pub time: Option<usize>,
    pub value: Option<usize>,
}

impl ColumnMap {
    #[must_use]
    pub fn new(time: Option<usize>, value: Option<usize>) -> Self {
        Self { time, value }
    }
}

/// Free-form descriptive tags attached to archived data.
///
/// Provenance has no schema; it only has to be valid JSON. Keys keep the
/// order `serde_json` gives them.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Provenance(Map<String, Value>);

impl Provenance {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    ///
    /// ```
    /// use neurotrace_types::Provenance;
    ///
    /// let p = Provenance::new().with("source", "converted_csv");
    /// assert_eq!(p.to_json_string(), r#"{"source":"converted_csv"}"#);
    /// ```
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Compact JSON encoding, as stored in archive attributes.
    #[must_use]
    pub fn to_json_string(&self) -> String {
        Value::Object(self.0.clone()).to_string()
    }
}

impl From<Map<String, Value>> for Provenance {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
