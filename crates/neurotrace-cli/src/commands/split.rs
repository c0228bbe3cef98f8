//! Split command implementation.

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use neurotrace_core::{downsample_trace, read_series};
use neurotrace_store::{SeriesPreview, series_preview_path, write_preview};

use crate::format::FormatOptions;
use crate::style;

/// Arguments for the split command.
pub struct SplitArgs<'a> {
    pub input: &'a Path,
    /// Defaults to the directory of the input.
    pub out_dir: Option<PathBuf>,
    /// Defaults to the input file stem.
    pub basename: Option<String>,
    /// Downsample each series when set.
    pub max_points: Option<NonZeroUsize>,
    pub delimiter: u8,
    pub quiet: bool,
    pub opts: &'a FormatOptions,
}

/// Write one preview per series and return their paths in file order.
pub fn cmd_split(args: SplitArgs<'_>) -> Result<Vec<PathBuf>> {
    let SplitArgs {
        input,
        out_dir,
        basename,
        max_points,
        delimiter,
        quiet,
        opts,
    } = args;

    let set = read_series(input, delimiter)
        .with_context(|| format!("Failed to read {}", input.display()))?;

    let out_dir = out_dir.unwrap_or_else(|| {
        input
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
    });
    let basename = basename.unwrap_or_else(|| {
        input
            .file_stem()
            .map_or_else(|| "series".to_string(), |s| s.to_string_lossy().into_owned())
    });

    if !quiet {
        eprintln!(
            "{}",
            style::format_info(
                &format!("Found {} series ({})", set.len(), set.layout),
                opts.no_color
            )
        );
    }

    let mut written = Vec::with_capacity(set.len());
    for series in &set {
        let preview = match max_points {
            Some(max) => SeriesPreview::from_labeled_trace(
                &series.label,
                &downsample_trace(&series.trace, max),
            ),
            None => SeriesPreview::from_series(series),
        };
        let path = series_preview_path(&out_dir, &basename, series);
        write_preview(&path, &preview)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        if !quiet {
            eprintln!(
                "{}",
                style::format_success(&format!("Wrote {}", path.display()), opts.no_color)
            );
        }
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use serde_json::{Value, json};

    fn split(
        input: &Path,
        out_dir: Option<PathBuf>,
        max_points: Option<usize>,
    ) -> Result<Vec<PathBuf>> {
        let opts = FormatOptions::default();
        cmd_split(SplitArgs {
            input,
            out_dir,
            basename: None,
            max_points: max_points.and_then(NonZeroUsize::new),
            delimiter: b',',
            quiet: true,
            opts: &opts,
        })
    }

    fn read_json(path: &Path) -> Value {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn test_row_oriented_split() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("traces.csv");
        fs::write(&input, "time,0,1,2\nWT,-65,-64,30\nKO,-65,-65,-65\n").unwrap();

        let written = split(&input, None, None).unwrap();

        assert_eq!(
            written,
            vec![
                dir.path().join("traces_WT.json"),
                dir.path().join("traces_KO.json")
            ]
        );
        let wt = read_json(&written[0]);
        assert_eq!(wt["metadata"]["name"], "WT");
        assert_eq!(wt["times"], json!([0.0, 1.0, 2.0]));
        assert_eq!(wt["voltages"], json!([-65.0, -64.0, 30.0]));
        let ko = read_json(&written[1]);
        assert_eq!(ko["times"], json!([0.0, 1.0, 2.0]));
    }

    #[test]
    fn test_column_oriented_split_to_out_dir() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("cells.csv");
        fs::write(&input, "time,Cell A,Cell B\n0,-65,-70\n1,-60,-71\n").unwrap();
        let out = dir.path().join("out");

        let written = split(&input, Some(out.clone()), None).unwrap();

        assert_eq!(
            written,
            vec![out.join("cells_cell_a.json"), out.join("cells_cell_b.json")]
        );
        let b = read_json(&written[1]);
        assert_eq!(b["metadata"]["name"], "cell b");
        assert_eq!(b["voltages"], json!([-70.0, -71.0]));
    }

    #[test]
    fn test_split_with_downsampling() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("long.csv");
        let mut csv = String::from("time,v\n");
        for i in 0..100_i32 {
            csv.push_str(&format!("{},{}\n", i, i % 7));
        }
        fs::write(&input, csv).unwrap();

        let written = split(&input, None, Some(10)).unwrap();
        let doc = read_json(&written[0]);
        assert_eq!(doc["voltages"].as_array().unwrap().len(), 20);
    }

    #[test]
    fn test_split_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        assert!(split(&dir.path().join("none.csv"), None, None).is_err());
    }
}
