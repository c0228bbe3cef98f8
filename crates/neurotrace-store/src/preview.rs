//! JSON preview documents consumed by the web frontend.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use neurotrace_types::{LabeledSeries, Trace};

use crate::error::{Result, create_dir_all};

/// Preview written by `convert`: times in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvertPreview {
    pub times_ms: Vec<f64>,
    pub voltages_mv: Vec<f64>,
}

impl ConvertPreview {
    /// Build from a (downsampled) trace.
    ///
    /// A trace without timestamps gets positional indices `0, 1, 2, ...`.
    #[must_use]
    pub fn from_trace(trace: &Trace) -> Self {
        let times_ms = trace
            .times_ms()
            .unwrap_or_else(|| (0..trace.len()).map(|i| i as f64).collect());
        Self {
            times_ms,
            voltages_mv: trace.values().to_vec(),
        }
    }
}

/// Preview written by `generate`: times in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplePreview {
    pub times: Vec<f64>,
    pub voltages: Vec<f64>,
}

impl SamplePreview {
    #[must_use]
    pub fn from_trace(trace: &Trace) -> Self {
        Self {
            times: trace
                .times()
                .map_or_else(|| (0..trace.len()).map(|i| i as f64).collect(), <[f64]>::to_vec),
            voltages: trace.values().to_vec(),
        }
    }
}

/// `metadata` block of a split preview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesMetadata {
    pub name: String,
}

/// Preview written by `split`, one per labeled series.
///
/// Times are passed through as found in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPreview {
    pub metadata: SeriesMetadata,
    pub times: Vec<f64>,
    pub voltages: Vec<f64>,
}

impl SeriesPreview {
    #[must_use]
    pub fn from_series(series: &LabeledSeries) -> Self {
        Self::from_labeled_trace(&series.label, &series.trace)
    }

    /// Build from a label and a (possibly downsampled) trace.
    #[must_use]
    pub fn from_labeled_trace(label: &str, trace: &Trace) -> Self {
        let SamplePreview { times, voltages } = SamplePreview::from_trace(trace);
        Self {
            metadata: SeriesMetadata {
                name: label.to_string(),
            },
            times,
            voltages,
        }
    }
}

/// `<root>/<basename>.json`
#[must_use]
pub fn preview_path(root: &Path, basename: &str) -> PathBuf {
    root.join(format!("{}.json", basename))
}

/// `<dir>/<basename>_<label>.json`, with spaces in the label replaced by `_`.
#[must_use]
pub fn series_preview_path(dir: &Path, basename: &str, series: &LabeledSeries) -> PathBuf {
    dir.join(format!("{}_{}.json", basename, series.file_label()))
}

/// Write `preview` as compact JSON, creating the parent directory.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be written.
pub fn write_preview<T: Serialize>(path: &Path, preview: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        create_dir_all(parent)?;
    }
    let json = serde_json::to_string(preview)?;
    fs::write(path, json)?;
    debug!("Wrote preview {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    #[test]
    fn test_convert_preview_scales_to_ms() {
        let trace = Trace::with_times(vec![0.0, 0.001, 0.002], vec![-65.0, -64.0, 30.0]).unwrap();
        let preview = ConvertPreview::from_trace(&trace);

        assert_eq!(preview.times_ms, vec![0.0, 1.0, 2.0]);
        assert_eq!(preview.voltages_mv, vec![-65.0, -64.0, 30.0]);
    }

    #[test]
    fn test_convert_preview_without_times_uses_indices() {
        let trace = Trace::from_values(vec![1.0, 2.0, 3.0]);
        assert_eq!(ConvertPreview::from_trace(&trace).times_ms, vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_write_preview_creates_parent_and_is_compact() {
        let dir = tempfile::tempdir().unwrap();
        let path = preview_path(&dir.path().join("public").join("data"), "sim1");
        let preview = ConvertPreview {
            times_ms: vec![0.0, 1.0],
            voltages_mv: vec![-65.0, 30.0],
        };
        write_preview(&path, &preview).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(!text.contains('\n'));
        let json: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json, json!({"times_ms": [0.0, 1.0], "voltages_mv": [-65.0, 30.0]}));
    }

    #[test]
    fn test_series_preview_shape_and_path() {
        let trace = Trace::with_times(vec![0.0, 1.0], vec![-65.0, -64.0]).unwrap();
        let series = LabeledSeries::new("wild type", trace);
        let preview = SeriesPreview::from_series(&series);

        let json = serde_json::to_value(&preview).unwrap();
        assert_eq!(json["metadata"]["name"], "wild type");
        assert_eq!(json["times"], json!([0.0, 1.0]));

        let path = series_preview_path(Path::new("out"), "traces", &series);
        assert_eq!(path, Path::new("out").join("traces_wild_type.json"));
    }

    #[test]
    fn test_sample_preview_keeps_seconds() {
        let trace = Trace::with_times(vec![0.0, 0.5], vec![-65.0, 30.0]).unwrap();
        let preview = SamplePreview::from_trace(&trace);
        assert_eq!(preview.times, vec![0.0, 0.5]);
    }
}
