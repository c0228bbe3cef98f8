//! Inspect command implementation.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use neurotrace_store::ArchiveReader;

use crate::cli::OutputFormat;
use crate::format::{FormatOptions, InspectReport, format_inspect_text};
use crate::util::write_output;

/// Arguments for the inspect command.
pub struct InspectArgs<'a> {
    pub archive: &'a Path,
    pub format: OutputFormat,
    /// Leading samples to include per channel.
    pub head: Option<usize>,
    pub output: Option<&'a PathBuf>,
    pub opts: &'a FormatOptions,
}

/// Open the archive and build its report without printing it.
pub fn inspect_report(archive: &Path, head: Option<usize>) -> Result<InspectReport> {
    let reader = ArchiveReader::open(archive)
        .with_context(|| format!("Failed to open archive {}", archive.display()))?;
    let summary = reader.summary().context("Failed to read archive summary")?;

    let head = match head {
        Some(n) => {
            let end = n.min(reader.sample_count());
            let rows = (0..reader.channel_count())
                .map(|c| reader.read_trace_range(c, 0..end))
                .collect::<neurotrace_store::Result<Vec<_>>>()
                .context("Failed to read leading samples")?;
            Some(rows)
        }
        None => None,
    };

    Ok(InspectReport { summary, head })
}

pub fn cmd_inspect(args: InspectArgs<'_>) -> Result<()> {
    let InspectArgs {
        archive,
        format,
        head,
        output,
        opts,
    } = args;

    let report = inspect_report(archive, head)?;
    let content = match format {
        OutputFormat::Json => opts.as_json(&report)?,
        OutputFormat::Text => format_inspect_text(&report, opts),
    };
    write_output(output, &content)
}
