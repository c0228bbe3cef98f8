//! Listing of the preview documents in a directory.
//!
//! The frontend picks previews from this list: each entry says what the
//! document is called and whether it carries a plottable trace.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::Result;

/// One preview document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewEntry {
    /// File stem.
    pub id: String,
    /// `metadata.name`, else `metadata.title`, else the id.
    pub name: String,
    pub summary: String,
    /// Path of the document relative to the served root, e.g. `/data/sim1.json`.
    pub preview: String,
    pub has_trace: bool,
    pub has_spikes: bool,
    pub metadata: Map<String, Value>,
    #[serde(skip)]
    pub path: PathBuf,
}

impl PreviewEntry {
    /// Describe a parsed preview document stored in `file_name`.
    ///
    /// Returns `None` for documents that are not JSON objects.
    #[must_use]
    pub fn from_document(file_name: &str, doc: &Value) -> Option<Self> {
        let obj = doc.as_object()?;
        let id = file_name.strip_suffix(".json").unwrap_or(file_name).to_string();
        let metadata = obj
            .get("metadata")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();

        let name = non_empty_str(metadata.get("name"))
            .or_else(|| non_empty_str(metadata.get("title")))
            .unwrap_or(id.as_str())
            .to_string();
        let summary = non_empty_str(metadata.get("summary"))
            .or_else(|| non_empty_str(obj.get("summary")))
            .unwrap_or_default()
            .to_string();

        let has = |key: &str| obj.get(key).is_some_and(|v| !v.is_null());
        let has_trace =
            (has("times") && has("voltages")) || (has("times_ms") && has("voltages_mv"));

        Some(Self {
            preview: format!("/data/{}", file_name),
            id,
            name,
            summary,
            has_trace,
            has_spikes: has("spikes"),
            metadata,
            path: PathBuf::from(file_name),
        })
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// All readable previews of a directory, sorted by id.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct PreviewCatalog {
    entries: Vec<PreviewEntry>,
}

impl PreviewCatalog {
    /// Scan `dir` for `*.json` documents.
    ///
    /// Documents that cannot be read or parsed are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if `dir` itself cannot be listed.
    pub fn scan(dir: &Path) -> Result<Self> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if !path.is_file() || !file_name.ends_with(".json") {
                continue;
            }

            let doc = match fs::read_to_string(&path)
                .map_err(|e| e.to_string())
                .and_then(|text| serde_json::from_str::<Value>(&text).map_err(|e| e.to_string()))
            {
                Ok(doc) => doc,
                Err(e) => {
                    warn!("Skipping preview {}: {}", path.display(), e);
                    continue;
                }
            };
            match PreviewEntry::from_document(file_name, &doc) {
                Some(mut item) => {
                    item.path = path.clone();
                    entries.push(item);
                }
                None => debug!("Skipping non-object preview {}", path.display()),
            }
        }
        entries.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(Self { entries })
    }

    #[must_use]
    pub fn entries(&self) -> &[PreviewEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PreviewEntry> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entry_name_fallbacks() {
        let doc = json!({"metadata": {"title": "Pyramidal"}, "times": [], "voltages": []});
        let entry = PreviewEntry::from_document("cell.json", &doc).unwrap();
        assert_eq!(entry.id, "cell");
        assert_eq!(entry.name, "Pyramidal");
        assert_eq!(entry.preview, "/data/cell.json");
        assert!(entry.has_trace);
        assert!(!entry.has_spikes);

        let entry = PreviewEntry::from_document("sim1.json", &json!({"times_ms": [0]})).unwrap();
        assert_eq!(entry.name, "sim1");
        assert!(!entry.has_trace);
    }

    #[test]
    fn test_entry_summary_from_top_level() {
        let doc = json!({"summary": "two spikes", "spikes": [0.1]});
        let entry = PreviewEntry::from_document("a.json", &doc).unwrap();
        assert_eq!(entry.summary, "two spikes");
        assert!(entry.has_spikes);
    }

    #[test]
    fn test_non_object_document_skipped() {
        assert!(PreviewEntry::from_document("x.json", &json!([1, 2])).is_none());
    }

    #[test]
    fn test_scan_sorts_and_skips_bad_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.json"), r#"{"times":[0],"voltages":[1]}"#).unwrap();
        fs::write(dir.path().join("a.json"), r#"{"metadata":{"name":"A"}}"#).unwrap();
        fs::write(dir.path().join("broken.json"), "{not json").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let catalog = PreviewCatalog::scan(dir.path()).unwrap();
        let ids: Vec<_> = catalog.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(catalog.entries()[0].name, "A");
        assert!(catalog.entries()[1].has_trace);
    }

    #[test]
    fn test_scan_serializes_camel_case() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("s.json"), r#"{"times":[0],"voltages":[1]}"#).unwrap();
        let catalog = PreviewCatalog::scan(dir.path()).unwrap();
        let json = serde_json::to_value(&catalog).unwrap();
        assert_eq!(json[0]["hasTrace"], true);
        assert_eq!(json[0]["id"], "s");
        assert!(json[0].get("path").is_none());
    }

    #[test]
    fn test_scan_missing_dir_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(PreviewCatalog::scan(&dir.path().join("nope")).is_err());
    }
}
