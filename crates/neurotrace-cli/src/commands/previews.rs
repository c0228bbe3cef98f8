//! Previews command implementation.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use neurotrace_store::PreviewCatalog;

use crate::cli::OutputFormat;
use crate::format::{FormatOptions, format_catalog_text};
use crate::util::write_output;

pub fn cmd_previews(
    dir: &Path,
    format: OutputFormat,
    output: Option<&PathBuf>,
    opts: &FormatOptions,
) -> Result<()> {
    let catalog = PreviewCatalog::scan(dir)
        .with_context(|| format!("Failed to list previews in {}", dir.display()))?;

    let content = match format {
        OutputFormat::Json => opts.as_json(&catalog)?,
        OutputFormat::Text => format_catalog_text(&catalog, opts),
    };
    write_output(output, &content)
}
