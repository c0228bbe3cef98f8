//! Chunked archive of full-resolution traces.
//!
//! Archives use the Zarr v2 directory layout so they can be opened by any
//! Zarr reader:
//!
//! ```text
//! sim1.zarr/
//!   .zgroup
//!   .zattrs            {"provenance": "{\"source\":\"converted_csv\"}"}
//!   times/.zarray      1-D <f8, chunked by chunk_size
//!   times/0 ...
//!   traces/.zarray     2-D <f4, [channels, samples], chunks [channels, chunk_size]
//!   traces/0.0 ...
//! ```

mod metadata;
mod reader;
mod writer;

use std::path::{Path, PathBuf};

use serde_json::Value;

use neurotrace_types::{Provenance, Trace};

use crate::error::{Error, Result};

pub use metadata::{ArrayMetadata, Dtype, GroupMetadata};
pub use reader::{ArchiveReader, ArchiveSummary};
pub use writer::ArchiveWriter;

/// File extension of archive directories.
pub const ARCHIVE_EXT: &str = "zarr";

/// Name of the 1-D time array.
pub const TIMES_ARRAY: &str = "times";

/// Name of the 2-D `[channel, sample]` value array.
pub const TRACES_ARRAY: &str = "traces";

/// Attribute key holding the JSON-encoded provenance.
pub const PROVENANCE_ATTR: &str = "provenance";

/// Default number of samples per chunk.
pub const DEFAULT_CHUNK_SIZE: usize = 4096;

/// Path of the archive for `basename` under `root`, e.g. `data/sim1.zarr`.
#[must_use]
pub fn archive_path(root: &Path, basename: &str) -> PathBuf {
    root.join(format!("{}.{}", basename, ARCHIVE_EXT))
}

/// Everything written into one archive group.
#[derive(Debug, Clone)]
pub struct ArchiveRecord<'a> {
    /// Shared time axis in seconds, if known.
    pub times: Option<&'a [f64]>,
    /// One value slice per channel, all the same length.
    pub channels: Vec<&'a [f64]>,
    pub provenance: Provenance,
    /// Extra group attributes, each stored JSON-encoded like the provenance.
    pub attributes: Vec<(String, Value)>,
}

impl<'a> ArchiveRecord<'a> {
    /// Record holding a single-channel trace.
    #[must_use]
    pub fn from_trace(trace: &'a Trace) -> Self {
        Self {
            times: trace.times(),
            channels: vec![trace.values()],
            provenance: Provenance::new(),
            attributes: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_provenance(mut self, provenance: Provenance) -> Self {
        self.provenance = provenance;
        self
    }

    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: Value) -> Self {
        self.attributes.push((key.into(), value));
        self
    }

    /// Samples per channel.
    #[must_use]
    pub fn sample_count(&self) -> usize {
        self.channels.first().map_or(0, |c| c.len())
    }

    /// Check channels and times agree on the sample count.
    pub fn validate(&self) -> Result<()> {
        if self.channels.is_empty() {
            return Err(Error::InvalidArchive("no channels to write".to_string()));
        }
        let n = self.sample_count();
        if let Some(bad) = self.channels.iter().position(|c| c.len() != n) {
            return Err(Error::InvalidArchive(format!(
                "channel {} has {} samples, expected {}",
                bad,
                self.channels[bad].len(),
                n
            )));
        }
        if let Some(times) = self.times
            && times.len() != n
        {
            return Err(Error::InvalidArchive(format!(
                "{} timestamps for {} samples",
                times.len(),
                n
            )));
        }
        Ok(())
    }
}
