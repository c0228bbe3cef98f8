//! Persistence for neurotrace recordings.
//!
//! This crate writes the two outputs of a conversion run: a chunked,
//! compressed archive of the full-resolution trace and a compact JSON
//! preview for the web frontend.
//!
//! # Features
//!
//! - Zarr v2 directory archives with pluggable chunk codecs (`zstd`, `gzip`, `none`)
//! - Archive reading, including partial reads of a sample range
//! - Archive capability resolved once per run ([`ArchiveBackend`])
//! - Preview documents for `convert`, `generate` and `split`
//! - Catalog of the preview documents in a directory
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use neurotrace_store::{
//!     ArchiveBackend, ArchiveRecord, ArchiveSettings, ArchiveWriter, archive_path,
//! };
//! use neurotrace_types::{Provenance, Trace};
//!
//! let trace = Trace::from_interval(vec![-65.0, -64.0, 30.0], 0.001)?;
//! let backend = ArchiveBackend::resolve(&ArchiveSettings::default());
//! let record = ArchiveRecord::from_trace(&trace)
//!     .with_provenance(Provenance::new().with("source", "converted_csv"));
//! ArchiveWriter::new(backend.codec()?).write(&archive_path(Path::new("data"), "sim1"), &record)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod archive;
pub mod backend;
pub mod catalog;
pub mod codec;
mod error;
pub mod preview;

pub use archive::{
    ArchiveReader, ArchiveRecord, ArchiveSummary, ArchiveWriter, DEFAULT_CHUNK_SIZE, archive_path,
};
pub use backend::{ArchiveBackend, ArchiveSettings};
pub use catalog::{PreviewCatalog, PreviewEntry};
pub use codec::{Codec, CodecKind, DEFAULT_LEVEL};
pub use error::{Error, Result};
pub use preview::{
    ConvertPreview, SamplePreview, SeriesMetadata, SeriesPreview, preview_path,
    series_preview_path, write_preview,
};
