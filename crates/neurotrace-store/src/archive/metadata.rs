//! Zarr v2 metadata documents (`.zgroup`, `.zarray`).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

pub const ZARR_FORMAT: u8 = 2;
pub const ZGROUP: &str = ".zgroup";
pub const ZARRAY: &str = ".zarray";
pub const ZATTRS: &str = ".zattrs";

/// Element type of an archived array, little-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Dtype {
    #[serde(rename = "<f4")]
    F32,
    #[serde(rename = "<f8")]
    F64,
}

impl Dtype {
    /// Bytes per element.
    #[must_use]
    pub fn size(&self) -> usize {
        match self {
            Dtype::F32 => 4,
            Dtype::F64 => 8,
        }
    }

    /// Encode values as little-endian bytes of this type.
    #[must_use]
    pub fn encode(&self, values: &[f64]) -> Vec<u8> {
        match self {
            Dtype::F32 => values
                .iter()
                .flat_map(|&v| (v as f32).to_le_bytes())
                .collect(),
            Dtype::F64 => values.iter().flat_map(|v| v.to_le_bytes()).collect(),
        }
    }

    /// Decode little-endian bytes of this type, widening to `f64`.
    pub fn decode(&self, bytes: &[u8]) -> Result<Vec<f64>> {
        if bytes.len() % self.size() != 0 {
            return Err(Error::InvalidArchive(format!(
                "chunk of {} bytes is not a whole number of {}-byte elements",
                bytes.len(),
                self.size()
            )));
        }
        Ok(match self {
            Dtype::F32 => bytes
                .chunks_exact(4)
                .map(|b| f64::from(f32::from_le_bytes([b[0], b[1], b[2], b[3]])))
                .collect(),
            Dtype::F64 => bytes
                .chunks_exact(8)
                .map(|b| {
                    let mut buf = [0u8; 8];
                    buf.copy_from_slice(b);
                    f64::from_le_bytes(buf)
                })
                .collect(),
        })
    }
}

/// Contents of `.zgroup`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupMetadata {
    pub zarr_format: u8,
}

impl Default for GroupMetadata {
    fn default() -> Self {
        Self {
            zarr_format: ZARR_FORMAT,
        }
    }
}

/// Contents of `.zarray`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrayMetadata {
    pub zarr_format: u8,
    pub shape: Vec<usize>,
    pub chunks: Vec<usize>,
    pub dtype: Dtype,
    pub compressor: Value,
    pub fill_value: f64,
    pub order: String,
    pub filters: Option<Vec<Value>>,
    #[serde(default = "default_separator")]
    pub dimension_separator: String,
}

fn default_separator() -> String {
    ".".to_string()
}

impl ArrayMetadata {
    /// C-ordered array metadata with `0.0` as fill value.
    #[must_use]
    pub fn new(shape: Vec<usize>, chunks: Vec<usize>, dtype: Dtype, compressor: Value) -> Self {
        Self {
            zarr_format: ZARR_FORMAT,
            shape,
            chunks,
            dtype,
            compressor,
            fill_value: 0.0,
            order: "C".to_string(),
            filters: None,
            dimension_separator: default_separator(),
        }
    }

    /// Number of chunks along each dimension.
    #[must_use]
    pub fn chunk_grid(&self) -> Vec<usize> {
        self.shape
            .iter()
            .zip(&self.chunks)
            .map(|(&len, &chunk)| len.div_ceil(chunk.max(1)))
            .collect()
    }

    /// Storage key of a chunk, e.g. `"0.3"`.
    #[must_use]
    pub fn chunk_key(&self, index: &[usize]) -> String {
        index
            .iter()
            .map(usize::to_string)
            .collect::<Vec<_>>()
            .join(&self.dimension_separator)
    }

    /// Elements in one full chunk.
    #[must_use]
    pub fn chunk_len(&self) -> usize {
        self.chunks.iter().product()
    }

    /// Check the document describes something this crate can read.
    pub fn validate(&self) -> Result<()> {
        if self.zarr_format != ZARR_FORMAT {
            return Err(Error::InvalidArchive(format!(
                "unsupported zarr_format {}",
                self.zarr_format
            )));
        }
        if self.shape.len() != self.chunks.len() || self.shape.is_empty() {
            return Err(Error::InvalidArchive(
                "shape and chunks must have the same non-zero rank".to_string(),
            ));
        }
        if self.chunks.contains(&0) {
            return Err(Error::InvalidArchive("zero-sized chunk".to_string()));
        }
        if self.order != "C" {
            return Err(Error::InvalidArchive(format!(
                "unsupported order '{}'",
                self.order
            )));
        }
        if self.filters.as_ref().is_some_and(|f| !f.is_empty()) {
            return Err(Error::InvalidArchive("filters are not supported".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_metadata_json_shape() {
        let meta = ArrayMetadata::new(vec![1, 10_000], vec![1, 4096], Dtype::F32, Value::Null);
        let json: Value = serde_json::to_value(&meta).unwrap();

        assert_eq!(json["zarr_format"], 2);
        assert_eq!(json["dtype"], "<f4");
        assert_eq!(json["order"], "C");
        assert!(json["compressor"].is_null());
        assert!(json["filters"].is_null());
        assert_eq!(json["shape"], serde_json::json!([1, 10000]));
    }

    #[test]
    fn test_chunk_grid_and_keys() {
        let meta = ArrayMetadata::new(vec![2, 10_000], vec![2, 4096], Dtype::F32, Value::Null);
        assert_eq!(meta.chunk_grid(), vec![1, 3]);
        assert_eq!(meta.chunk_key(&[0, 2]), "0.2");
        assert_eq!(meta.chunk_len(), 8192);
    }

    #[test]
    fn test_dtype_encode_decode() {
        let values = [-65.0, 30.25, 0.0];
        let f4 = Dtype::F32.encode(&values);
        assert_eq!(f4.len(), 12);
        assert_eq!(Dtype::F32.decode(&f4).unwrap(), values.to_vec());

        let f8 = Dtype::F64.encode(&[0.001]);
        assert_eq!(Dtype::F64.decode(&f8).unwrap(), vec![0.001]);
    }

    #[test]
    fn test_dtype_decode_rejects_ragged_bytes() {
        assert!(Dtype::F64.decode(&[0u8; 7]).is_err());
    }

    #[test]
    fn test_validate_rejects_filters() {
        let mut meta = ArrayMetadata::new(vec![4], vec![2], Dtype::F64, Value::Null);
        assert!(meta.validate().is_ok());
        meta.filters = Some(vec![serde_json::json!({"id": "delta"})]);
        assert!(meta.validate().is_err());
    }
}
