//! Generate command implementation.

use std::num::NonZeroUsize;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde_json::json;
use tracing::{debug, warn};

use neurotrace_core::{SpikeTrainParams, generate_spike_train, stride_decimate};
use neurotrace_store::{
    ArchiveBackend, ArchiveRecord, ArchiveWriter, SamplePreview, archive_path, preview_path,
    write_preview,
};
use neurotrace_types::Provenance;

use crate::format::FormatOptions;
use crate::style;
use crate::util::now_rfc3339;

/// Arguments for the generate command.
pub struct GenerateArgs<'a> {
    pub params: SpikeTrainParams,
    pub archive_name: String,
    pub preview_name: String,
    pub max_points: NonZeroUsize,
    pub archive_root: PathBuf,
    pub preview_root: PathBuf,
    pub backend: &'a ArchiveBackend,
    pub chunk_size: usize,
    pub quiet: bool,
    pub opts: &'a FormatOptions,
}

/// Paths written by the generate command.
#[derive(Debug, Clone)]
pub struct GenerateOutcome {
    pub samples: usize,
    pub archive: Option<PathBuf>,
    pub preview: PathBuf,
}

pub fn cmd_generate(args: GenerateArgs<'_>) -> Result<GenerateOutcome> {
    let GenerateArgs {
        params,
        archive_name,
        preview_name,
        max_points,
        archive_root,
        preview_root,
        backend,
        chunk_size,
        quiet,
        opts,
    } = args;

    let trace = generate_spike_train(&params).context("Failed to generate spike train")?;

    let archive = match backend.codec() {
        Ok(codec) => {
            let mut provenance = Provenance::new().with("generated_by", "neurotrace generate");
            if let Some(stamp) = now_rfc3339() {
                provenance.insert("created_at", stamp);
            }
            let path = archive_path(&archive_root, &archive_name);
            let record = ArchiveRecord::from_trace(&trace)
                .with_provenance(provenance)
                .with_attribute(
                    "params",
                    json!({ "duration": params.duration, "dt": params.dt }),
                );
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

    let reduced = stride_decimate(&trace, max_points);
    let preview = preview_path(&preview_root, &preview_name);
    write_preview(&preview, &SamplePreview::from_trace(&reduced))
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

    Ok(GenerateOutcome {
        samples: trace.len(),
        archive,
        preview,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    use neurotrace_store::{ArchiveReader, ArchiveSettings, CodecKind};
    use serde_json::Value;

    fn try_run(
        root: &Path,
        params: SpikeTrainParams,
        max_points: usize,
    ) -> Result<GenerateOutcome> {
        let backend = ArchiveBackend::resolve(&ArchiveSettings {
            codec: CodecKind::None,
            ..Default::default()
        });
        let opts = FormatOptions::default();
        cmd_generate(GenerateArgs {
            params,
            archive_name: "sample_sim".to_string(),
            preview_name: "sim1".to_string(),
            max_points: NonZeroUsize::new(max_points).unwrap(),
            archive_root: root.join("data"),
            preview_root: root.join("public").join("data"),
            backend: &backend,
            chunk_size: 4096,
            quiet: true,
            opts: &opts,
        })
    }

    fn run(root: &Path, params: SpikeTrainParams, max_points: usize) -> GenerateOutcome {
        try_run(root, params, max_points).unwrap()
    }

    #[test]
    fn test_generate_default_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = run(dir.path(), SpikeTrainParams::default(), 2000);

        assert_eq!(outcome.samples, 2000);
        let archive = outcome.archive.unwrap();
        assert_eq!(archive, dir.path().join("data").join("sample_sim.zarr"));

        let reader = ArchiveReader::open(&archive).unwrap();
        assert_eq!(reader.sample_count(), 2000);
        assert_eq!(reader.attribute("params").unwrap()["dt"], 0.0005);
        let provenance = reader.provenance().unwrap();
        assert_eq!(provenance.get("generated_by").unwrap(), "neurotrace generate");

        let preview: Value =
            serde_json::from_str(&fs::read_to_string(&outcome.preview).unwrap()).unwrap();
        assert_eq!(preview["times"].as_array().unwrap().len(), 2000);
        assert_eq!(preview["voltages"][0], -65.0);
    }

    #[test]
    fn test_generate_rejects_oversized_recording() {
        let dir = tempfile::tempdir().unwrap();
        let params = SpikeTrainParams {
            dt: 1e-300,
            ..Default::default()
        };

        let err = try_run(dir.path(), params, 2000).unwrap_err();

        assert!(format!("{:#}", err).contains("limit"));
        assert!(!dir.path().join("data").exists());
        assert!(!dir.path().join("public").exists());
    }

    #[test]
    fn test_generate_preview_is_decimated() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = run(dir.path(), SpikeTrainParams::default(), 500);

        let preview: Value =
            serde_json::from_str(&fs::read_to_string(&outcome.preview).unwrap()).unwrap();
        let times = preview["times"].as_array().unwrap();
        assert_eq!(times.len(), 500);
        // stride of 4 samples at 0.5 ms
        assert!((times[1].as_f64().unwrap() - 0.002).abs() < 1e-12);
    }
}
