//! Output formatting for report commands.

use anyhow::Result;
use serde::Serialize;
use serde_json::Value;

use neurotrace_store::{ArchiveSummary, PreviewCatalog};

use crate::style::format_flag;

/// Options for formatting output.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatOptions {
    /// Disable colored output.
    pub no_color: bool,
    /// Use compact JSON output (no pretty-printing).
    pub compact: bool,
}

impl FormatOptions {
    #[must_use]
    pub fn new(no_color: bool, compact: bool) -> Self {
        Self { no_color, compact }
    }

    /// Serialize to JSON, pretty unless `compact` is set, with a trailing newline.
    pub fn as_json<T: Serialize>(&self, value: &T) -> Result<String> {
        let json = if self.compact {
            serde_json::to_string(value)?
        } else {
            serde_json::to_string_pretty(value)?
        };
        Ok(json + "\n")
    }
}

/// Archive summary plus optional leading samples, as printed by `inspect`.
#[derive(Debug, Clone, Serialize)]
pub struct InspectReport {
    #[serde(flatten)]
    pub summary: ArchiveSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head: Option<Vec<Vec<f64>>>,
}

fn compressor_name(compressor: &Value) -> String {
    match compressor {
        Value::Null => "none".to_string(),
        other => match (other.get("id").and_then(Value::as_str), other.get("level")) {
            (Some(id), Some(level)) => format!("{} (level {})", id, level),
            (Some(id), None) => id.to_string(),
            _ => other.to_string(),
        },
    }
}

// ============================================================================
// inspect
// ============================================================================

pub fn format_inspect_text(report: &InspectReport, opts: &FormatOptions) -> String {
    let s = &report.summary;
    let mut output = String::new();
    output.push_str(&format!("Archive:     {}\n", s.path.display()));
    output.push_str(&format!("Channels:    {}\n", s.channels));
    output.push_str(&format!("Samples:     {}\n", s.samples));
    output.push_str(&format!("Chunk size:  {}\n", s.chunk_size));
    output.push_str(&format!("Dtype:       {}\n", s.dtype));
    output.push_str(&format!("Compressor:  {}\n", compressor_name(&s.compressor)));
    output.push_str(&format!(
        "Times:       {}\n",
        format_flag(s.has_times, opts.no_color)
    ));
    if let Some((first, last)) = s.time_span {
        output.push_str(&format!("Time span:   {} s .. {} s\n", first, last));
    }
    match &s.provenance {
        Some(p) => output.push_str(&format!("Provenance:  {}\n", p)),
        None => output.push_str("Provenance:  (none)\n"),
    }
    for (key, value) in &s.attributes {
        output.push_str(&format!("Attribute:   {} = {}\n", key, value));
    }
    if let Some(head) = &report.head {
        for (channel, values) in head.iter().enumerate() {
            let joined = values
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            output.push_str(&format!("Channel {}:   [{}]\n", channel, joined));
        }
    }
    output
}

// ============================================================================
// previews
// ============================================================================

/// Yes/no cell padded to `width`; padding is added after coloring.
fn flag_cell(value: bool, width: usize, no_color: bool) -> String {
    let text_len = if value { 3 } else { 2 };
    format!(
        "{}{}",
        format_flag(value, no_color),
        " ".repeat(width.saturating_sub(text_len))
    )
}

pub fn format_catalog_text(catalog: &PreviewCatalog, opts: &FormatOptions) -> String {
    if catalog.is_empty() {
        return "No previews found.\n".to_string();
    }

    let id_width = catalog.iter().map(|e| e.id.len()).max().unwrap_or(0).max(2);
    let name_width = catalog.iter().map(|e| e.name.len()).max().unwrap_or(0).max(4);

    let mut output = format!(
        "{:<id_width$}  {:<name_width$}  TRACE  SPIKES  PREVIEW\n",
        "ID", "NAME"
    );
    for entry in catalog.iter() {
        output.push_str(&format!(
            "{:<id_width$}  {:<name_width$}  {}  {}  {}\n",
            entry.id,
            entry.name,
            flag_cell(entry.has_trace, 5, opts.no_color),
            flag_cell(entry.has_spikes, 6, opts.no_color),
            entry.preview
        ));
    }
    output
}
