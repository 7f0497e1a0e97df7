// Declare modules
pub mod batch;
pub mod cli;
pub mod config;
pub mod models;
pub mod renderer;
pub mod resolver;

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io;

use self::cli::Cli;
use self::config::resolve_config;
use self::models::{Mode, RunConfig};

/// Parses arguments, resolves the run configuration and dispatches to
/// the single-file or batch path.
pub fn run() -> Result<()> {
    let args = Cli::parse();
    let config = resolve_config(args)?;

    match config.mode {
        Mode::Single => render_single(&config),
        Mode::Batch => {
            batch::process_directory(&config)?;
            Ok(())
        }
    }
}

/// Single-file mode: one template, one data source, one sink. Every
/// failure here is fatal.
fn render_single(config: &RunConfig) -> Result<()> {
    let data_stem = resolver::resolve_data_stem(
        &config.template_path,
        None,
        &config.data_location,
        config.data_is_file,
    )?;
    let output = resolver::resolve_output_path(&config.template_path, None, &config.target)?;

    match output {
        Some(path) => {
            let mut sink = File::create(&path)
                .with_context(|| format!("failed to create output file {}", path.display()))?;
            renderer::render(&config.template_path, &data_stem, &mut sink)?;
        }
        None => {
            let stdout = io::stdout();
            renderer::render(&config.template_path, &data_stem, &mut stdout.lock())?;
        }
    }

    Ok(())
}
