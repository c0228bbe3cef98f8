//! CLI argument definitions using clap.

use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use neurotrace_store::{ArchiveSettings, CodecKind};

use crate::config::Config;

/// Output format for report commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Archive chunk compressor
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CodecArg {
    /// Zstandard (default)
    Zstd,
    /// Gzip / deflate
    Gzip,
    /// Store chunks uncompressed
    None,
}

impl From<CodecArg> for CodecKind {
    fn from(arg: CodecArg) -> Self {
        match arg {
            CodecArg::Zstd => CodecKind::Zstd,
            CodecArg::Gzip => CodecKind::Gzip,
            CodecArg::None => CodecKind::None,
        }
    }
}

/// Where outputs go and how the archive is written
#[derive(Debug, Clone, Default, Args)]
pub struct OutputRootArgs {
    /// Directory for chunked archives [default: data]
    #[arg(long, value_name = "DIR")]
    pub archive_root: Option<PathBuf>,

    /// Directory for JSON previews [default: public/data]
    #[arg(long, value_name = "DIR")]
    pub preview_root: Option<PathBuf>,

    /// Archive chunk compressor (overrides config)
    #[arg(long, value_enum)]
    pub codec: Option<CodecArg>,

    /// Skip the archive and write only the preview
    #[arg(long)]
    pub no_archive: bool,
}

impl OutputRootArgs {
    /// Resolve archive root: explicit flag overrides config
    pub fn resolve_archive_root(&self, config: &Config) -> PathBuf {
        self.archive_root
            .clone()
            .unwrap_or_else(|| config.archive_root.clone())
    }

    /// Resolve preview root: explicit flag overrides config
    pub fn resolve_preview_root(&self, config: &Config) -> PathBuf {
        self.preview_root
            .clone()
            .unwrap_or_else(|| config.preview_root.clone())
    }

    /// Resolve archive settings: `--no-archive` and `--codec` override config
    pub fn resolve_archive(&self, config: &Config) -> ArchiveSettings {
        ArchiveSettings {
            enabled: config.archive.enabled && !self.no_archive,
            codec: self.codec.map_or(config.archive.codec, CodecKind::from),
            level: config.archive.level,
            chunk_size: config.archive.chunk_size,
        }
    }
}

#[derive(Parser)]
#[command(name = "neurotrace")]
#[command(
    author,
    version,
    about = "Convert voltage-trace CSV files into chunked archives and JSON previews",
    long_about = None
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output compact JSON (no pretty-printing)
    #[arg(long, global = true)]
    pub compact: bool,

    /// Disable colored output (any non-empty NO_COLOR also disables it)
    #[arg(
        long,
        global = true,
        env = "NO_COLOR",
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    pub no_color: bool,

    /// Use this configuration file instead of the default location
    #[arg(long, global = true, value_name = "PATH", env = "NEUROTRACE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert a single-trace CSV into an archive and a downsampled preview
    Convert {
        /// Input CSV file
        input: PathBuf,

        /// Base name of the outputs (<basename>.zarr, <basename>.json)
        #[arg(short = 'b', long)]
        out_basename: Option<String>,

        /// Sample interval in seconds, used when the file has no time column
        #[arg(long, value_name = "SECONDS")]
        dt: Option<f64>,

        /// Preview budget in points (output holds up to twice this many)
        #[arg(short, long)]
        max_points: Option<NonZeroUsize>,

        /// CSV field delimiter (overrides config)
        #[arg(short, long)]
        delimiter: Option<char>,

        #[command(flatten)]
        roots: OutputRootArgs,
    },

    /// Split a multi-trace CSV into one preview per series
    Split {
        /// Input CSV file
        input: PathBuf,

        /// Output directory [default: directory of the input]
        #[arg(short, long, value_name = "DIR")]
        out_dir: Option<PathBuf>,

        /// Output file prefix [default: input file stem]
        #[arg(short = 'b', long)]
        out_basename: Option<String>,

        /// Downsample each series to this budget (no downsampling by default)
        #[arg(short, long)]
        max_points: Option<NonZeroUsize>,

        /// CSV field delimiter (overrides config)
        #[arg(short, long)]
        delimiter: Option<char>,
    },

    /// Generate a synthetic spike train for frontend prototyping
    Generate {
        /// Recording length in seconds
        #[arg(long, default_value = "1.0")]
        duration: f64,

        /// Sample interval in seconds
        #[arg(long, default_value = "0.0005")]
        dt: f64,

        /// Spike onset in seconds (repeatable or comma-separated)
        #[arg(long = "spike-at", value_name = "SECONDS", value_delimiter = ',')]
        spike_at: Vec<f64>,

        /// Base name of the archive
        #[arg(long, default_value = "sample_sim")]
        archive_name: String,

        /// Base name of the preview
        #[arg(long, default_value = "sim1")]
        preview_name: String,

        /// Preview budget in points
        #[arg(short, long)]
        max_points: Option<NonZeroUsize>,

        #[command(flatten)]
        roots: OutputRootArgs,
    },

    /// Describe an archive written by convert or generate
    Inspect {
        /// Archive directory (e.g. data/sim1.zarr)
        archive: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Also print the first N samples of each channel
        #[arg(long, value_name = "N")]
        head: Option<usize>,

        /// Write output to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the preview documents in a directory
    Previews {
        /// Directory to scan [default: configured preview root]
        dir: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Write output to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Configuration subcommands
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init,
}
