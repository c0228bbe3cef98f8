//! Config command implementation.

use std::path::Path;

use anyhow::{Context, Result};

use crate::cli::ConfigAction;
use crate::config::Config;
use crate::format::FormatOptions;
use crate::style;

pub fn cmd_config(
    action: ConfigAction,
    path: &Path,
    config: &Config,
    opts: &FormatOptions,
) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let content = toml::to_string_pretty(config).context("Failed to serialize config")?;
            print!("{}", content);
        }
        ConfigAction::Path => {
            println!("{}", path.display());
        }
        ConfigAction::Init => {
            if path.exists() {
                eprintln!(
                    "{}",
                    style::format_warning(
                        &format!("Config already exists at {}", path.display()),
                        opts.no_color
                    )
                );
                return Ok(());
            }
            Config::default().save_to(path)?;
            eprintln!(
                "{}",
                style::format_success(
                    &format!("Created config at {}", path.display()),
                    opts.no_color
                )
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_init_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("neurotrace").join("config.toml");

        cmd_config(
            ConfigAction::Init,
            &path,
            &Config::default(),
            &FormatOptions::default(),
        )
        .unwrap();

        assert_eq!(Config::load_from(&path), Config::default());
    }

    #[test]
    fn test_init_keeps_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "basename = \"mine\"\n").unwrap();

        cmd_config(
            ConfigAction::Init,
            &path,
            &Config::default(),
            &FormatOptions::default(),
        )
        .unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "basename = \"mine\"\n");
        assert_eq!(Config::load_from(&path).basename, "mine");
    }
}
