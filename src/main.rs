use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

mod config;
mod convert;
mod error;
mod geometry;
mod level;
mod obj;
mod quaternion;

use crate::config::{BlockErrorPolicy, Config};
use crate::convert::convert_document;

/// Convert Wavefront OBJ files made of boxes into custom level files.
#[derive(Parser, Debug)]
#[command(name = "obj2level", version, about)]
struct Cli {
    /// OBJ files, or directories searched recursively for them
    #[arg(default_value = ".")]
    paths: Vec<PathBuf>,

    /// YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Skip inputs whose output is newer than the input
    #[arg(long)]
    skip_up_to_date: bool,

    /// Extension of the written level files
    #[arg(long)]
    extension: Option<String>,

    /// What to do with objects that are not boxes
    #[arg(long, value_enum)]
    block_errors: Option<BlockErrorPolicy>,
}

#[derive(Debug, Default, PartialEq)]
struct Summary {
    converted: usize,
    up_to_date: usize,
    failed: usize,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    let summary = run(&cli)?;
    log::info!(
        "finished: {} converted, {} up to date, {} failed",
        summary.converted,
        summary.up_to_date,
        summary.failed
    );
    if summary.failed > 0 {
        return Err(anyhow!("{} file(s) failed to convert", summary.failed));
    }
    Ok(())
}

fn run(cli: &Cli) -> Result<Summary> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(extension) = &cli.extension {
        config.output_extension = extension.clone();
    }
    if let Some(policy) = cli.block_errors {
        config.block_errors = policy;
    }

    let mut inputs = Vec::new();
    for path in &cli.paths {
        collect_obj_files(path, &mut inputs)?;
    }

    let mut summary = Summary::default();
    for input in inputs {
        let output = input.with_extension(&config.output_extension);
        if cli.skip_up_to_date && is_up_to_date(&input, &output) {
            log::info!("{} is up to date", output.display());
            summary.up_to_date += 1;
            continue;
        }

        log::info!("processing: {}", input.display());
        match convert_file(&input, &output, &config) {
            Ok(()) => summary.converted += 1,
            Err(e) => {
                log::error!("{}: {:#}", input.display(), e);
                summary.failed += 1;
            }
        }
    }
    Ok(summary)
}

fn convert_file(input: &Path, output: &Path, config: &Config) -> Result<()> {
    let text = fs::read_to_string(input).context("reading input")?;
    let document = convert_document(&text, config)?;
    log::debug!("{} level entries", document.entries.len());
    let json = document.to_json()?;
    fs::write(output, json).with_context(|| format!("writing {}", output.display()))?;
    Ok(())
}

/// Gather `.obj` files below `path` in a stable order. A file given directly is
/// taken whatever its extension. Symlinked directories are not descended into.
fn collect_obj_files(path: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    if !path.is_dir() {
        if !path.exists() {
            return Err(anyhow!("{} does not exist", path.display()));
        }
        files.push(path.to_path_buf());
        return Ok(());
    }

    for entry in WalkDir::new(path).sort_by_file_name() {
        let entry = entry.with_context(|| format!("walking {}", path.display()))?;
        let is_obj = entry.path().extension().map_or(false, |ext| ext == "obj");
        if is_obj && entry.path().is_file() {
            files.push(entry.into_path());
        }
    }
    Ok(())
}

fn is_up_to_date(input: &Path, output: &Path) -> bool {
    let modified = |path: &Path| fs::metadata(path).and_then(|m| m.modified()).ok();
    match (modified(input), modified(output)) {
        (Some(input), Some(output)) => output >= input,
        _ => false,
    }
}
