//! Archive writing.

use std::fs;
use std::path::Path;

use serde_json::{Map, Value};
use tracing::debug;

use super::metadata::{ArrayMetadata, Dtype, GroupMetadata, ZARRAY, ZATTRS, ZGROUP};
use super::{ArchiveRecord, DEFAULT_CHUNK_SIZE, PROVENANCE_ATTR, TIMES_ARRAY, TRACES_ARRAY};
use crate::codec::Codec;
use crate::error::{Error, Result, create_dir_all};

/// Writes [`ArchiveRecord`]s as Zarr v2 groups.
#[derive(Debug, Clone, Copy)]
pub struct ArchiveWriter<'c> {
    codec: &'c dyn Codec,
    chunk_size: usize,
}

impl<'c> ArchiveWriter<'c> {
    /// Writer compressing chunks with `codec`, using the default chunk size.
    #[must_use]
    pub fn new(codec: &'c dyn Codec) -> Self {
        Self {
            codec,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    #[must_use]
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Write `record` to `path`, replacing whatever archive was there.
    ///
    /// # Errors
    ///
    /// Returns an error if the record is inconsistent, the chunk size is
    /// zero, or any file cannot be written.
    pub fn write(&self, path: &Path, record: &ArchiveRecord<'_>) -> Result<()> {
        record.validate()?;
        if self.chunk_size == 0 {
            return Err(Error::InvalidArchive("chunk size must be positive".to_string()));
        }

        if path.exists() {
            debug!("Replacing existing archive at {}", path.display());
            if path.is_dir() {
                fs::remove_dir_all(path)?;
            } else {
                fs::remove_file(path)?;
            }
        }
        create_dir_all(path)?;

        write_json(&path.join(ZGROUP), &GroupMetadata::default())?;
        write_json(&path.join(ZATTRS), &group_attributes(record)?)?;

        let n = record.sample_count();
        let chunk = self.chunk_size;

        if let Some(times) = record.times {
            let meta = ArrayMetadata::new(vec![n], vec![chunk], Dtype::F64, self.codec.metadata());
            self.write_array(&path.join(TIMES_ARRAY), &meta, &[times])?;
        }

        let channels = record.channels.len();
        let meta = ArrayMetadata::new(
            vec![channels, n],
            vec![channels, chunk],
            Dtype::F32,
            self.codec.metadata(),
        );
        self.write_array(&path.join(TRACES_ARRAY), &meta, &record.channels)?;

        debug!(
            "Wrote archive {} ({} channel(s) x {} samples, codec {})",
            path.display(),
            channels,
            n,
            self.codec.id()
        );
        Ok(())
    }

    /// Write `rows` as one array whose chunks span every row.
    ///
    /// The last chunk along the sample axis is padded with the fill value.
    fn write_array(&self, dir: &Path, meta: &ArrayMetadata, rows: &[&[f64]]) -> Result<()> {
        create_dir_all(dir)?;
        write_json(&dir.join(ZARRAY), meta)?;

        let chunk = self.chunk_size;
        let n = rows.first().map_or(0, |r| r.len());
        let leading = meta.shape.len() - 1;

        for j in 0..n.div_ceil(chunk) {
            let start = j * chunk;
            let end = (start + chunk).min(n);
            let mut block = Vec::with_capacity(rows.len() * chunk);
            for row in rows {
                block.extend_from_slice(&row[start..end]);
                block.resize(block.len() + (chunk - (end - start)), meta.fill_value);
            }

            let mut index = vec![0; leading];
            index.push(j);
            let encoded = self.codec.encode(&meta.dtype.encode(&block))?;
            fs::write(dir.join(meta.chunk_key(&index)), encoded)?;
        }
        debug!("Wrote {} chunk(s) to {}", n.div_ceil(chunk), dir.display());
        Ok(())
    }
}

/// `.zattrs` document: every attribute is stored as a JSON string.
fn group_attributes(record: &ArchiveRecord<'_>) -> Result<Map<String, Value>> {
    let mut attrs = Map::new();
    attrs.insert(
        PROVENANCE_ATTR.to_string(),
        Value::String(record.provenance.to_json_string()),
    );
    for (key, value) in &record.attributes {
        attrs.insert(key.clone(), Value::String(serde_json::to_string(value)?));
    }
    Ok(attrs)
}

fn write_json<T: serde::Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    Ok(())
}
