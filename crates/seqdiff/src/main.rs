//! seqdiff: compare two files with the Hunt–McIlroy LCS engine
//!
//! Exit status follows `diff`: 0 when the inputs match, 1 when they
//! differ, 2 on error. Set `SEQDIFF_LOG=debug` for alignment details.

mod config;
mod render;
mod tokenize;

use anyhow::{Context, Result};
use clap::Parser;
use seqdiff_core::{context_sdiff, diff, sdiff};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use crate::config::{Config, Format, Unit};

#[derive(Parser, Debug)]
#[command(name = "seqdiff")]
#[command(about = "Compare two files line by line, word by word, or character by character")]
#[command(version)]
struct Cli {
    /// Original file
    old: PathBuf,

    /// Changed file
    new: PathBuf,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<Format>,

    /// Unchanged steps shown around each unified hunk
    #[arg(short = 'U', long)]
    context: Option<usize>,

    /// Token unit the inputs are split into
    #[arg(short, long, value_enum)]
    unit: Option<Unit>,

    /// Column width for side-by-side output
    #[arg(short = 'W', long)]
    width: Option<usize>,

    /// Path to configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Only report whether the files differ
    #[arg(short = 'q', long)]
    brief: bool,
}

impl Cli {
    /// Command-line flags win over the config file.
    fn apply(&self, mut config: Config) -> Config {
        if let Some(format) = self.format {
            config.format = format;
        }
        if let Some(context) = self.context {
            config.context = context;
        }
        if let Some(unit) = self.unit {
            config.unit = unit;
        }
        if let Some(width) = self.width {
            config.width = width;
        }
        config
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("SEQDIFF_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(false) => ExitCode::SUCCESS,
        Ok(true) => ExitCode::from(1),
        Err(err) => {
            eprintln!("seqdiff: {err:#}");
            ExitCode::from(2)
        }
    }
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Diff the two files and print the result. Returns whether they differ.
fn run(cli: &Cli) -> Result<bool> {
    let config = cli.apply(Config::load(cli.config.as_deref())?);
    tracing::debug!(?config, "resolved config");

    let old_text = read(&cli.old)?;
    let new_text = read(&cli.new)?;
    let old = tokenize::tokenize(&old_text, config.unit);
    let new = tokenize::tokenize(&new_text, config.unit);
    tracing::debug!(old = old.len(), new = new.len(), unit = ?config.unit, "tokenized");

    let differ = old != new;
    if cli.brief {
        if differ {
            println!("Files {} and {} differ", cli.old.display(), cli.new.display());
        }
        return Ok(differ);
    }

    let mut out = String::new();
    match config.format {
        Format::Unified => render::unified(
            &mut out,
            &cli.old.display().to_string(),
            &cli.new.display().to_string(),
            &context_sdiff(&old, &new),
            config.context,
        )?,
        Format::SideBySide => render::side_by_side(&mut out, &sdiff(&old, &new), config.width)?,
        Format::Inline => render::inline(&mut out, &sdiff(&old, &new))?,
        Format::Json => {
            out = render::json(&diff(&old, &new))?;
            out.push('\n');
        }
    }

    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(out.as_bytes())
        .context("Failed to write diff")?;
    stdout.flush().context("Failed to write diff")?;

    Ok(differ)
}
