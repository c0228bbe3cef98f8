//! Configuration file management.

use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use neurotrace_core::DEFAULT_MAX_POINTS;
use neurotrace_store::{CodecKind, DEFAULT_CHUNK_SIZE, DEFAULT_LEVEL};

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Default output basename for `convert`
    #[serde(default = "default_basename")]
    pub basename: String,

    /// Default preview budget in points
    #[serde(default = "default_max_points")]
    pub max_points: usize,

    /// Directory for chunked archives
    #[serde(default = "default_archive_root")]
    pub archive_root: PathBuf,

    /// Directory for JSON previews
    #[serde(default = "default_preview_root")]
    pub preview_root: PathBuf,

    /// CSV field delimiter
    #[serde(default = "default_delimiter")]
    pub delimiter: char,

    /// Archive settings
    #[serde(default)]
    pub archive: ArchiveConfig,
}

/// Archive writer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchiveConfig {
    /// Write archives at all (previews are always written)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Chunk compressor: "zstd", "gzip" or "none"
    #[serde(default)]
    pub codec: CodecKind,

    /// Compression level
    #[serde(default = "default_level")]
    pub level: i32,

    /// Samples per chunk
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
}

fn default_basename() -> String {
    "sim1".to_string()
}

fn default_max_points() -> usize {
    DEFAULT_MAX_POINTS.get()
}

fn default_archive_root() -> PathBuf {
    PathBuf::from("data")
}

fn default_preview_root() -> PathBuf {
    PathBuf::from("public").join("data")
}

fn default_delimiter() -> char {
    ','
}

fn default_true() -> bool {
    true
}

fn default_level() -> i32 {
    DEFAULT_LEVEL
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

impl Default for Config {
    fn default() -> Self {
        Self {
            basename: default_basename(),
            max_points: default_max_points(),
            archive_root: default_archive_root(),
            preview_root: default_preview_root(),
            delimiter: default_delimiter(),
            archive: ArchiveConfig::default(),
        }
    }
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            codec: CodecKind::default(),
            level: default_level(),
            chunk_size: default_chunk_size(),
        }
    }
}

impl Config {
    /// Get the default config file path
    pub fn path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("neurotrace")
            .join("config.toml")
    }

    /// Load config from `path`, or return default if not found or invalid
    pub fn load_from(path: &Path) -> Self {
        if path.exists() {
            match fs::read_to_string(path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        eprintln!("Warning: Failed to parse config: {}", e);
                    }
                },
                Err(e) => {
                    eprintln!("Warning: Failed to read config: {}", e);
                }
            }
        }
        Self::default()
    }

    /// Save config to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }
}

/// Resolve basename: explicit flag overrides config
pub fn resolve_basename(arg: Option<String>, config: &Config) -> String {
    arg.unwrap_or_else(|| config.basename.clone())
}

/// Resolve preview budget: explicit flag overrides config
pub fn resolve_max_points(arg: Option<NonZeroUsize>, config: &Config) -> Result<NonZeroUsize> {
    match arg {
        Some(n) => Ok(n),
        None => NonZeroUsize::new(config.max_points)
            .context("max_points in the configuration file must be greater than zero"),
    }
}

/// Resolve CSV delimiter: explicit flag overrides config; must be a single ASCII character
pub fn resolve_delimiter(arg: Option<char>, config: &Config) -> Result<u8> {
    let c = arg.unwrap_or(config.delimiter);
    if !c.is_ascii() {
        bail!("Invalid delimiter '{}'. The delimiter must be an ASCII character", c);
    }
    Ok(c as u8)
}
