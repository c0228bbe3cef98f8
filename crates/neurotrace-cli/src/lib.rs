//! Command-line converter for electrophysiology voltage traces.
//!
//! This crate turns CSV recordings into two artifacts: a chunked, compressed
//! archive holding the full-resolution trace, and a small JSON preview a web
//! frontend can plot directly.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `convert` | Convert a single-trace CSV into an archive and a downsampled preview |
//! | `split` | Split a multi-trace CSV into one preview per series |
//! | `generate` | Write a synthetic spike train for frontend prototyping |
//! | `inspect` | Describe an archive written by `convert` or `generate` |
//! | `previews` | List the preview documents in a directory |
//! | `config` | Manage CLI configuration |
//! | `completions` | Generate shell completions |
//!
//! # Output Layout
//!
//! By default archives go to `data/<basename>.zarr` and previews to
//! `public/data/<basename>.json`. Both roots can be changed per invocation
//! (`--archive-root`, `--preview-root`) or in the configuration file.
//!
//! # Configuration
//!
//! The CLI reads `~/.config/neurotrace/config.toml` (or platform equivalent),
//! or the file named by `--config` / `NEUROTRACE_CONFIG`. Options include:
//!
//! - `basename`: Default output basename for `convert`
//! - `max_points`: Default preview budget
//! - `archive_root`, `preview_root`: Output directories
//! - `delimiter`: CSV field delimiter
//! - `[archive]`: `enabled`, `codec`, `level`, `chunk_size`
//!
//! # Environment Variables
//!
//! - `NEUROTRACE_CONFIG`: Configuration file path (overridden by `--config`)
//! - `NO_COLOR`: Disable colored output when set
//! - `RUST_LOG`: Log filter when neither `--verbose` nor `--quiet` is given
//!
//! # Examples
//!
//! Convert a recording with a time column:
//! ```bash
//! neurotrace convert recording.csv --out-basename sim1
//! ```
//!
//! Convert a values-only recording sampled at 20 kHz:
//! ```bash
//! neurotrace convert values.csv --dt 0.00005
//! ```
//!
//! Split a genotype table into one preview per row:
//! ```bash
//! neurotrace split traces.csv --out-dir public/data
//! ```
//!
//! Describe an archive as JSON:
//! ```bash
//! neurotrace inspect data/sim1.zarr --format json --head 5
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod format;
pub mod style;
pub mod util;

pub use neurotrace_core;
pub use neurotrace_store;
pub use neurotrace_types;
