//! Chunk compressors.
//!
//! A [`Codec`] turns raw little-endian chunk bytes into what is stored on disk
//! and back. The archive treats codecs as opaque: the only contract is a
//! lossless round trip. Each codec also describes itself in the Zarr
//! `compressor` metadata so other Zarr readers can decode the chunks.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::{Error, Result};

/// Default compression level for codecs that take one.
pub const DEFAULT_LEVEL: i32 = 3;

/// A lossless byte-oriented compressor for archive chunks.
pub trait Codec: fmt::Debug + Send + Sync {
    /// Zarr compressor id (`"zstd"`, `"gzip"`), or `"none"`.
    fn id(&self) -> &'static str;

    fn encode(&self, raw: &[u8]) -> Result<Vec<u8>>;

    fn decode(&self, encoded: &[u8]) -> Result<Vec<u8>>;

    /// Value of the `compressor` field in `.zarray`, `null` for no compression.
    fn metadata(&self) -> Value;
}

/// Selectable codec, as named in configuration and on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodecKind {
    #[default]
    Zstd,
    Gzip,
    None,
}

impl CodecKind {
    /// All kinds, in display order.
    pub const ALL: [CodecKind; 3] = [CodecKind::Zstd, CodecKind::Gzip, CodecKind::None];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            CodecKind::Zstd => "zstd",
            CodecKind::Gzip => "gzip",
            CodecKind::None => "none",
        }
    }

    /// Whether support for this codec was compiled in.
    #[must_use]
    pub fn is_compiled(&self) -> bool {
        match self {
            CodecKind::Zstd => cfg!(feature = "zstd"),
            CodecKind::Gzip => cfg!(feature = "gzip"),
            CodecKind::None => true,
        }
    }

    /// Build the codec.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BackendUnavailable`] if the codec was compiled out.
    pub fn build(&self, level: i32) -> Result<Box<dyn Codec>> {
        match self {
            CodecKind::None => Ok(Box::new(NoCompression)),
            #[cfg(feature = "zstd")]
            CodecKind::Zstd => Ok(Box::new(ZstdCodec { level })),
            #[cfg(feature = "gzip")]
            CodecKind::Gzip => Ok(Box::new(GzipCodec {
                level: level.clamp(0, 9) as u32,
            })),
            #[allow(unreachable_patterns)]
            other => {
                let _ = level;
                Err(Error::BackendUnavailable(format!(
                    "{} support is not compiled in (enable the '{}' feature)",
                    other, other
                )))
            }
        }
    }
}

impl fmt::Display for CodecKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CodecKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "zstd" => Ok(CodecKind::Zstd),
            "gzip" | "gz" => Ok(CodecKind::Gzip),
            "none" | "raw" => Ok(CodecKind::None),
            _ => Err(format!("Unknown codec '{}'. Valid values: zstd, gzip, none", s)),
        }
    }
}

/// Build the codec described by a `.zarray` `compressor` field.
///
/// # Errors
///
/// Returns [`Error::InvalidArchive`] for unknown ids and
/// [`Error::BackendUnavailable`] for codecs that are not compiled in.
pub fn codec_from_metadata(compressor: &Value) -> Result<Box<dyn Codec>> {
    if compressor.is_null() {
        return Ok(Box::new(NoCompression));
    }
    let id = compressor
        .get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::InvalidArchive("compressor without id".to_string()))?;
    let level = compressor
        .get("level")
        .and_then(Value::as_i64)
        .map_or(DEFAULT_LEVEL, |l| l as i32);
    let kind = match id {
        "zstd" => CodecKind::Zstd,
        "gzip" => CodecKind::Gzip,
        other => {
            return Err(Error::InvalidArchive(format!(
                "unsupported compressor '{}'",
                other
            )));
        }
    };
    kind.build(level)
}

/// Stores chunks uncompressed.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCompression;

impl Codec for NoCompression {
    fn id(&self) -> &'static str {
        "none"
    }

    fn encode(&self, raw: &[u8]) -> Result<Vec<u8>> {
        Ok(raw.to_vec())
    }

    fn decode(&self, encoded: &[u8]) -> Result<Vec<u8>> {
        Ok(encoded.to_vec())
    }

    fn metadata(&self) -> Value {
        Value::Null
    }
}

/// Zstandard compression.
#[cfg(feature = "zstd")]
#[derive(Debug, Clone, Copy)]
pub struct ZstdCodec {
    pub level: i32,
}

#[cfg(feature = "zstd")]
impl Codec for ZstdCodec {
    fn id(&self) -> &'static str {
        "zstd"
    }

    fn encode(&self, raw: &[u8]) -> Result<Vec<u8>> {
        zstd::bulk::compress(raw, self.level).map_err(|e| Error::Codec {
            codec: "zstd",
            source: e,
        })
    }

    fn decode(&self, encoded: &[u8]) -> Result<Vec<u8>> {
        zstd::stream::decode_all(encoded).map_err(|e| Error::Codec {
            codec: "zstd",
            source: e,
        })
    }

    fn metadata(&self) -> Value {
        json!({ "id": "zstd", "level": self.level })
    }
}

/// Gzip (deflate) compression.
#[cfg(feature = "gzip")]
#[derive(Debug, Clone, Copy)]
pub struct GzipCodec {
    pub level: u32,
}

#[cfg(feature = "gzip")]
impl Codec for GzipCodec {
    fn id(&self) -> &'static str {
        "gzip"
    }

    fn encode(&self, raw: &[u8]) -> Result<Vec<u8>> {
        use std::io::Write;

        let wrap = |e| Error::Codec {
            codec: "gzip",
            source: e,
        };
        let mut encoder =
            flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::new(self.level));
        encoder.write_all(raw).map_err(wrap)?;
        encoder.finish().map_err(wrap)
    }

    fn decode(&self, encoded: &[u8]) -> Result<Vec<u8>> {
        use std::io::Read;

        let mut out = Vec::new();
        flate2::read::GzDecoder::new(encoded)
            .read_to_end(&mut out)
            .map_err(|e| Error::Codec {
                codec: "gzip",
                source: e,
            })?;
        Ok(out)
    }

    fn metadata(&self) -> Value {
        json!({ "id": "gzip", "level": self.level })
    }
}
