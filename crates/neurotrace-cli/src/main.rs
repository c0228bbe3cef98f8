use std::io;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use neurotrace_cli::cli::{Cli, Commands};
use neurotrace_cli::commands::{
    ConvertArgs, GenerateArgs, InspectArgs, SplitArgs, cmd_config, cmd_convert, cmd_generate,
    cmd_inspect, cmd_previews, cmd_split,
};
use neurotrace_cli::config::{Config, resolve_basename, resolve_delimiter, resolve_max_points};
use neurotrace_cli::format::FormatOptions;
use neurotrace_core::SpikeTrainParams;
use neurotrace_store::ArchiveBackend;

fn main() -> Result<()> {
    human_panic::setup_panic!();

    let cli = Cli::parse();

    // Handle completions command early (before tracing init)
    if let Commands::Completions { shell } = cli.command {
        let mut cmd = Cli::command();
        clap_complete::generate(shell, &mut cmd, "neurotrace", &mut io::stdout());
        return Ok(());
    }

    // Logs go to stderr so JSON on stdout stays parseable
    let filter = if cli.quiet {
        EnvFilter::new("warn")
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let config_path = cli.config.clone().unwrap_or_else(Config::path);
    let config = Config::load_from(&config_path);
    let opts = FormatOptions::new(cli.no_color, cli.compact);

    match cli.command {
        Commands::Convert {
            input,
            out_basename,
            dt,
            max_points,
            delimiter,
            roots,
        } => {
            let settings = roots.resolve_archive(&config);
            let backend = ArchiveBackend::resolve(&settings);
            cmd_convert(ConvertArgs {
                input: &input,
                basename: resolve_basename(out_basename, &config),
                dt,
                max_points: resolve_max_points(max_points, &config)?,
                delimiter: resolve_delimiter(delimiter, &config)?,
                archive_root: roots.resolve_archive_root(&config),
                preview_root: roots.resolve_preview_root(&config),
                backend: &backend,
                chunk_size: settings.chunk_size,
                quiet: cli.quiet,
                opts: &opts,
            })?;
        }
        Commands::Split {
            input,
            out_dir,
            out_basename,
            max_points,
            delimiter,
        } => {
            cmd_split(SplitArgs {
                input: &input,
                out_dir,
                basename: out_basename,
                max_points,
                delimiter: resolve_delimiter(delimiter, &config)?,
                quiet: cli.quiet,
                opts: &opts,
            })?;
        }
        Commands::Generate {
            duration,
            dt,
            spike_at,
            archive_name,
            preview_name,
            max_points,
            roots,
        } => {
            let defaults = SpikeTrainParams::default();
            let params = SpikeTrainParams {
                duration,
                dt,
                spike_times: if spike_at.is_empty() {
                    defaults.spike_times.clone()
                } else {
                    spike_at
                },
                ..defaults
            };
            let settings = roots.resolve_archive(&config);
            let backend = ArchiveBackend::resolve(&settings);
            cmd_generate(GenerateArgs {
                params,
                archive_name,
                preview_name,
                max_points: resolve_max_points(max_points, &config)?,
                archive_root: roots.resolve_archive_root(&config),
                preview_root: roots.resolve_preview_root(&config),
                backend: &backend,
                chunk_size: settings.chunk_size,
                quiet: cli.quiet,
                opts: &opts,
            })?;
        }
        Commands::Inspect {
            archive,
            format,
            head,
            output,
        } => {
            cmd_inspect(InspectArgs {
                archive: &archive,
                format,
                head,
                output: output.as_ref(),
                opts: &opts,
            })?;
        }
        Commands::Previews {
            dir,
            format,
            output,
        } => {
            let dir = dir.unwrap_or_else(|| config.preview_root.clone());
            cmd_previews(&dir, format, output.as_ref(), &opts)?;
        }
        Commands::Config { action } => {
            cmd_config(action, &config_path, &config, &opts)?;
        }
        Commands::Completions { .. } => {
            // Already handled above
            unreachable!()
        }
    }

    Ok(())
}
