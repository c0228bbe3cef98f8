//! Convert command implementation.

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, warn};

use neurotrace_core::{ReadOptions, downsample_trace, read_trace};
use neurotrace_store::{
    ArchiveBackend, ArchiveRecord, ArchiveWriter, ConvertPreview, archive_path, preview_path,
    write_preview,
};
use neurotrace_types::Provenance;

use crate::format::FormatOptions;
use crate::style;
use crate::util::{display_name, now_rfc3339};

/// Arguments for the convert command.
pub struct ConvertArgs<'a> {
    pub input: &'a Path,
    pub basename: String,
    pub dt: Option<f64>,
    pub max_points: NonZeroUsize,
    pub delimiter: u8,
    pub archive_root: PathBuf,
    pub preview_root: PathBuf,
    pub backend: &'a ArchiveBackend,
    pub chunk_size: usize,
    pub quiet: bool,
    pub opts: &'a FormatOptions,
}

/// What a conversion produced.
#[derive(Debug, Clone)]
pub struct ConvertOutcome {
    pub samples: usize,
    /// Data rows dropped as unparseable; a header row is not counted.
    pub skipped_rows: usize,
    pub preview_points: usize,
    /// `None` when the archive was skipped.
    pub archive: Option<PathBuf>,
    pub preview: PathBuf,
}

pub fn cmd_convert(args: ConvertArgs<'_>) -> Result<ConvertOutcome> {
    let ConvertArgs {
        input,
        basename,
        dt,
        max_points,
        delimiter,
        archive_root,
        preview_root,
        backend,
        chunk_size,
        quiet,
        opts,
    } = args;

    // Reading fails before anything is created on disk.
    let read_opts = ReadOptions::default().with_delimiter(delimiter).with_dt(dt);
    let reading = read_trace(input, &read_opts)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let trace = reading.trace;

    let skipped_data = reading
        .skipped_rows
        .saturating_sub(usize::from(reading.header_skipped));
    if !quiet && skipped_data > 0 {
        eprintln!(
            "{}",
            style::format_info(
                &format!("Skipped {} unparseable row(s)", skipped_data),
                opts.no_color
            )
        );
    }

    let archive = match backend.codec() {
        Ok(codec) => {
            let mut provenance = Provenance::new()
                .with("source", "converted_csv")
                .with("input", display_name(input));
            if reading.synthesized_times
                && let Some(dt) = dt
            {
                provenance.insert("dt", dt);
            }
            if let Some(stamp) = now_rfc3339() {
                provenance.insert("created_at", stamp);
            }

            let path = archive_path(&archive_root, &basename);
            let record = ArchiveRecord::from_trace(&trace).with_provenance(provenance);
            ArchiveWriter::new(codec)
                .with_chunk_size(chunk_size)
                .write(&path, &record)
                .with_context(|| format!("Failed to write archive {}", path.display()))?;
            if !quiet {
                eprintln!(
                    "{}",
                    style::format_success(
                        &format!("Wrote archive {} ({} samples)", path.display(), trace.len()),
                        opts.no_color
                    )
                );
            }
            Some(path)
        }
        Err(e) if backend.is_disabled() => {
            debug!("{}; skipping archive", e);
            if !quiet {
                eprintln!(
                    "{}",
                    style::format_info("Archive disabled; writing preview only", opts.no_color)
                );
            }
            None
        }
        Err(e) => {
            warn!("{}; skipping archive", e);
            if !quiet {
                eprintln!(
                    "{}",
                    style::format_warning(&format!("{}; skipping archive", e), opts.no_color)
                );
            }
            None
        }
    };

    let reduced = downsample_trace(&trace, max_points);
    let preview = preview_path(&preview_root, &basename);
    write_preview(&preview, &ConvertPreview::from_trace(&reduced))
        .with_context(|| format!("Failed to write preview {}", preview.display()))?;
    if !quiet {
        eprintln!(
            "{}",
            style::format_success(
                &format!("Wrote preview {} ({} points)", preview.display(), reduced.len()),
                opts.no_color
            )
        );
    }

    Ok(ConvertOutcome {
        samples: trace.len(),
        skipped_rows: skipped_data,
        preview_points: reduced.len(),
        archive,
        preview,
    })
}
