//! Archive reading, including partial reads of a sample range.

use std::fs;
use std::io::ErrorKind;
use std::ops::Range;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use neurotrace_types::Provenance;

use super::metadata::{ArrayMetadata, GroupMetadata, ZARRAY, ZATTRS, ZGROUP};
use super::{PROVENANCE_ATTR, TIMES_ARRAY, TRACES_ARRAY};
use crate::codec::{Codec, codec_from_metadata};
use crate::error::{Error, Result};

/// An opened archive.
///
/// Opening only reads the metadata documents; sample data is read on demand.
#[derive(Debug)]
pub struct ArchiveReader {
    path: PathBuf,
    attributes: Map<String, Value>,
    traces: ArrayMetadata,
    times: Option<ArrayMetadata>,
}

/// Overview of an archive, as printed by `inspect`.
#[derive(Debug, Clone, Serialize)]
pub struct ArchiveSummary {
    pub path: PathBuf,
    pub channels: usize,
    pub samples: usize,
    pub chunk_size: usize,
    pub dtype: String,
    pub compressor: Value,
    pub has_times: bool,
    /// First and last timestamp, if the archive has a time array.
    pub time_span: Option<(f64, f64)>,
    pub provenance: Option<Value>,
    pub attributes: Map<String, Value>,
}

impl ArchiveReader {
    /// Open the archive at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArchive`] if `path` is not a readable archive.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_dir() {
            return Err(Error::InvalidArchive(format!(
                "{} is not an archive directory",
                path.display()
            )));
        }

        let group: GroupMetadata = read_json(&path.join(ZGROUP))?;
        if group.zarr_format != super::metadata::ZARR_FORMAT {
            return Err(Error::InvalidArchive(format!(
                "unsupported zarr_format {}",
                group.zarr_format
            )));
        }

        let attributes = match fs::read_to_string(path.join(ZATTRS)) {
            Ok(text) => serde_json::from_str(&text)?,
            Err(e) if e.kind() == ErrorKind::NotFound => Map::new(),
            Err(e) => return Err(e.into()),
        };

        let traces: ArrayMetadata = read_json(&path.join(TRACES_ARRAY).join(ZARRAY))?;
        traces.validate()?;
        if traces.shape.len() != 2 {
            return Err(Error::InvalidArchive(format!(
                "'{}' must be 2-D, found {} dimension(s)",
                TRACES_ARRAY,
                traces.shape.len()
            )));
        }

        let times_meta = path.join(TIMES_ARRAY).join(ZARRAY);
        let times = if times_meta.exists() {
            let meta: ArrayMetadata = read_json(&times_meta)?;
            meta.validate()?;
            if meta.shape != [traces.shape[1]] {
                return Err(Error::InvalidArchive(format!(
                    "'{}' has shape {:?}, expected [{}]",
                    TIMES_ARRAY, meta.shape, traces.shape[1]
                )));
            }
            Some(meta)
        } else {
            None
        };

        debug!("Opened archive {}", path.display());
        Ok(Self {
            path: path.to_path_buf(),
            attributes,
            traces,
            times,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw group attributes, with values as stored.
    #[must_use]
    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    /// Decode a JSON-string attribute. Non-string values are returned as is.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<Value> {
        self.attributes.get(key).map(decode_attribute)
    }

    /// Provenance recorded at write time, if it decodes to a JSON object.
    #[must_use]
    pub fn provenance(&self) -> Option<Provenance> {
        match self.attribute(PROVENANCE_ATTR)? {
            Value::Object(map) => Some(Provenance::from(map)),
            _ => None,
        }
    }

    /// Metadata of the `traces` array.
    #[must_use]
    pub fn traces_metadata(&self) -> &ArrayMetadata {
        &self.traces
    }

    /// Metadata of the `times` array, if present.
    #[must_use]
    pub fn times_metadata(&self) -> Option<&ArrayMetadata> {
        self.times.as_ref()
    }

    #[must_use]
    pub fn channel_count(&self) -> usize {
        self.traces.shape[0]
    }

    #[must_use]
    pub fn sample_count(&self) -> usize {
        self.traces.shape[1]
    }

    /// Full time axis, or `None` if the archive has none.
    pub fn read_times(&self) -> Result<Option<Vec<f64>>> {
        let Some(meta) = &self.times else {
            return Ok(None);
        };
        let rows = read_block(&self.path.join(TIMES_ARRAY), meta, 0, 0..meta.shape[0])?;
        Ok(Some(rows))
    }

    /// Every channel at full resolution.
    pub fn read_traces(&self) -> Result<Vec<Vec<f64>>> {
        (0..self.channel_count())
            .map(|c| self.read_trace_range(c, 0..self.sample_count()))
            .collect()
    }

    /// Samples `range` of one channel, touching only the chunks it overlaps.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArchive`] if the channel or range is out of bounds.
    pub fn read_trace_range(&self, channel: usize, range: Range<usize>) -> Result<Vec<f64>> {
        if channel >= self.channel_count() {
            return Err(Error::InvalidArchive(format!(
                "channel {} out of range ({} channel(s))",
                channel,
                self.channel_count()
            )));
        }
        if range.start > range.end || range.end > self.sample_count() {
            return Err(Error::InvalidArchive(format!(
                "sample range {}..{} out of bounds ({} samples)",
                range.start,
                range.end,
                self.sample_count()
            )));
        }
        read_block(&self.path.join(TRACES_ARRAY), &self.traces, channel, range)
    }

    /// Summarise shape, codec and provenance.
    pub fn summary(&self) -> Result<ArchiveSummary> {
        let time_span = match (&self.times, self.sample_count()) {
            (Some(meta), n) if n > 0 => {
                let dir = self.path.join(TIMES_ARRAY);
                let first = read_block(&dir, meta, 0, 0..1)?;
                let last = read_block(&dir, meta, 0, n - 1..n)?;
                first.first().copied().zip(last.first().copied())
            }
            _ => None,
        };

        Ok(ArchiveSummary {
            path: self.path.clone(),
            channels: self.channel_count(),
            samples: self.sample_count(),
            chunk_size: self.traces.chunks[1],
            dtype: dtype_name(&self.traces),
            compressor: self.traces.compressor.clone(),
            has_times: self.times.is_some(),
            time_span,
            provenance: self.attribute(PROVENANCE_ATTR),
            attributes: self
                .attributes
                .iter()
                .filter(|(k, _)| k.as_str() != PROVENANCE_ATTR)
                .map(|(k, v)| (k.clone(), decode_attribute(v)))
                .collect(),
        })
    }
}

fn dtype_name(meta: &ArrayMetadata) -> String {
    match serde_json::to_value(meta.dtype) {
        Ok(Value::String(s)) => s,
        _ => format!("{:?}", meta.dtype),
    }
}

fn decode_attribute(value: &Value) -> Value {
    match value {
        Value::String(s) => serde_json::from_str(s).unwrap_or_else(|_| value.clone()),
        other => other.clone(),
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path).map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            Error::InvalidArchive(format!("missing {}", path.display()))
        } else {
            Error::Io(e)
        }
    })?;
    Ok(serde_json::from_str(&text)?)
}

/// Read `range` along the last axis of `row` from a 1-D or 2-D array.
///
/// Missing chunk files read as the fill value.
fn read_block(
    dir: &Path,
    meta: &ArrayMetadata,
    row: usize,
    range: Range<usize>,
) -> Result<Vec<f64>> {
    let codec = codec_from_metadata(&meta.compressor)?;
    let (rows_per_chunk, cols_per_chunk) = match meta.chunks.as_slice() {
        [c] => (1, *c),
        [r, c] => (*r, *c),
        _ => {
            return Err(Error::InvalidArchive(format!(
                "unsupported array rank {}",
                meta.chunks.len()
            )));
        }
    };
    let chunk_row = row / rows_per_chunk;
    let row_in_chunk = row % rows_per_chunk;

    let mut out = Vec::with_capacity(range.len());
    if range.is_empty() {
        return Ok(out);
    }
    let first = range.start / cols_per_chunk;
    let last = (range.end - 1) / cols_per_chunk;

    for j in first..=last {
        let mut index = Vec::with_capacity(meta.chunks.len());
        if meta.chunks.len() == 2 {
            index.push(chunk_row);
        }
        index.push(j);

        let values = read_chunk(&dir.join(meta.chunk_key(&index)), meta, codec.as_ref())?;
        let base = row_in_chunk * cols_per_chunk;
        let chunk_start = j * cols_per_chunk;
        let lo = range.start.max(chunk_start) - chunk_start;
        let hi = range.end.min(chunk_start + cols_per_chunk) - chunk_start;
        let slice = values.get(base + lo..base + hi).ok_or_else(|| {
            Error::InvalidArchive(format!("chunk {} is shorter than expected", j))
        })?;
        out.extend_from_slice(slice);
    }
    Ok(out)
}

fn read_chunk(path: &Path, meta: &ArrayMetadata, codec: &dyn Codec) -> Result<Vec<f64>> {
    match fs::read(path) {
        Ok(encoded) => meta.dtype.decode(&codec.decode(&encoded)?),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(vec![meta.fill_value; meta.chunk_len()]),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::{ArchiveRecord, ArchiveWriter, archive_path};
    use crate::codec::{CodecKind, DEFAULT_LEVEL};
    use neurotrace_types::Trace;

    fn ramp(n: usize) -> Trace {
        let times: Vec<f64> = (0..n).map(|i| i as f64 * 0.0005).collect();
        let values: Vec<f64> = (0..n).map(|i| -65.0 + (i % 100) as f64).collect();
        Trace::with_times(times, values).unwrap()
    }

    fn write(dir: &Path, trace: &Trace, kind: CodecKind, chunk: usize) -> PathBuf {
        let codec = kind.build(DEFAULT_LEVEL).unwrap();
        let path = archive_path(dir, "sim1");
        let record = ArchiveRecord::from_trace(trace)
            .with_provenance(Provenance::new().with("source", "converted_csv"));
        ArchiveWriter::new(codec.as_ref())
            .with_chunk_size(chunk)
            .write(&path, &record)
            .unwrap();
        path
    }

    #[test]
    fn test_round_trip_every_compiled_codec() {
        let dir = tempfile::tempdir().unwrap();
        let trace = ramp(10_000);

        for kind in CodecKind::ALL.into_iter().filter(CodecKind::is_compiled) {
            let path = write(dir.path(), &trace, kind, 4096);
            let reader = ArchiveReader::open(&path).unwrap();

            assert_eq!(reader.channel_count(), 1);
            assert_eq!(reader.sample_count(), 10_000);
            assert_eq!(reader.read_times().unwrap().unwrap(), trace.times().unwrap());
            assert_eq!(reader.read_traces().unwrap()[0], trace.values());
        }
    }

    #[test]
    fn test_layout_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), &ramp(10_000), CodecKind::None, 4096);

        assert!(path.join(".zgroup").is_file());
        assert!(path.join("times/0").is_file());
        assert!(path.join("times/2").is_file());
        assert!(path.join("traces/0.2").is_file());
        assert!(!path.join("traces/0.3").exists());

        // edge chunk is padded to a full chunk of f32
        let last = fs::read(path.join("traces/0.2")).unwrap();
        assert_eq!(last.len(), 4096 * 4);
    }

    #[test]
    fn test_provenance_stored_as_json_string() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), &ramp(10), CodecKind::None, 4096);

        let attrs: Value =
            serde_json::from_str(&fs::read_to_string(path.join(".zattrs")).unwrap()).unwrap();
        assert_eq!(attrs["provenance"], r#"{"source":"converted_csv"}"#);

        let reader = ArchiveReader::open(&path).unwrap();
        let provenance = reader.provenance().unwrap();
        assert_eq!(provenance.get("source").unwrap(), "converted_csv");
    }

    #[test]
    fn test_range_read_spans_chunks() {
        let dir = tempfile::tempdir().unwrap();
        let trace = ramp(1000);
        let path = write(dir.path(), &trace, CodecKind::None, 64);
        let reader = ArchiveReader::open(&path).unwrap();

        let got = reader.read_trace_range(0, 60..200).unwrap();
        assert_eq!(got, trace.values()[60..200].to_vec());
        assert!(reader.read_trace_range(0, 990..1001).is_err());
        assert!(reader.read_trace_range(1, 0..1).is_err());
        assert!(reader.read_trace_range(0, 5..5).unwrap().is_empty());
    }

    #[test]
    fn test_overwrite_replaces_archive() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), &ramp(10_000), CodecKind::None, 4096);
        let path = write(dir.path(), &ramp(10), CodecKind::None, 4096);

        assert!(!path.join("traces/0.2").exists());
        let reader = ArchiveReader::open(&path).unwrap();
        assert_eq!(reader.sample_count(), 10);
    }

    #[test]
    fn test_multi_channel_and_no_times() {
        let dir = tempfile::tempdir().unwrap();
        let a: Vec<f64> = (0..100_i32).map(f64::from).collect();
        let b: Vec<f64> = (0..100_i32).map(|i| -f64::from(i)).collect();
        let codec = CodecKind::None.build(DEFAULT_LEVEL).unwrap();
        let path = archive_path(dir.path(), "multi");
        let record = ArchiveRecord {
            times: None,
            channels: vec![&a, &b],
            provenance: Provenance::new(),
            attributes: vec![("params".to_string(), serde_json::json!({"dt": 0.001}))],
        };
        ArchiveWriter::new(codec.as_ref())
            .with_chunk_size(32)
            .write(&path, &record)
            .unwrap();

        let reader = ArchiveReader::open(&path).unwrap();
        assert!(reader.read_times().unwrap().is_none());
        assert_eq!(reader.read_trace_range(1, 40..43).unwrap(), vec![-40.0, -41.0, -42.0]);
        assert_eq!(reader.attribute("params").unwrap()["dt"], 0.001);

        let summary = reader.summary().unwrap();
        assert_eq!(summary.channels, 2);
        assert_eq!(summary.dtype, "<f4");
        assert!(summary.time_span.is_none());
        assert!(summary.attributes.contains_key("params"));
    }

    #[test]
    fn test_mismatched_channels_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let a = [1.0, 2.0];
        let b = [1.0];
        let codec = CodecKind::None.build(DEFAULT_LEVEL).unwrap();
        let record = ArchiveRecord {
            times: None,
            channels: vec![&a, &b],
            provenance: Provenance::new(),
            attributes: Vec::new(),
        };
        let err = ArchiveWriter::new(codec.as_ref())
            .write(&dir.path().join("bad.zarr"), &record)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArchive(_)));
    }

    #[test]
    fn test_open_rejects_non_archive() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ArchiveReader::open(dir.path().join("missing.zarr")).is_err());
        assert!(ArchiveReader::open(dir.path()).is_err());
    }

    #[test]
    fn test_summary_time_span() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), &ramp(5000), CodecKind::None, 4096);
        let summary = ArchiveReader::open(&path).unwrap().summary().unwrap();

        let (first, last) = summary.time_span.unwrap();
        assert_eq!(first, 0.0);
        assert!((last - 4999.0 * 0.0005).abs() < 1e-12);
        assert_eq!(summary.chunk_size, 4096);
    }
}
