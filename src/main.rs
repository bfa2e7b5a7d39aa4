use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use quiz_packager::config::DEFAULT_CONFIG_FILE;
use quiz_packager::{ConversionContext, PackageFormat, PackagerConfig, QuizPackager, discover_inputs};

/// Convert flat quiz-bank exports into nested quiz packages.
#[derive(Debug, Parser)]
#[command(name = "quiz-packager", version, about)]
struct Cli {
  /// Configuration file. Defaults to `quiz_packager.config.json` in the working directory.
  #[arg(long)]
  config: Option<PathBuf>,

  /// Directory containing the subject exports.
  #[arg(long)]
  input_dir: Option<PathBuf>,

  /// Directory receiving the packages.
  #[arg(long)]
  output_dir: Option<PathBuf>,

  /// Directory holding the source images.
  #[arg(long)]
  assets_dir: Option<PathBuf>,

  /// Write nested JSON only, without images or archives.
  #[arg(long)]
  json_only: bool,
}

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_target(false)
    .init();

  let cli = Cli::parse();

  let mut config = match &cli.config {
    Some(path) => PackagerConfig::from_path(path)
      .with_context(|| format!("failed to load configuration from {}", path.display()))?,
    None => {
      let cwd = std::env::current_dir().context("failed to resolve working directory")?;
      PackagerConfig::discover(&cwd)
    }
  };
  if cli.json_only {
    config.format = PackageFormat::Json;
  }

  let input_dir = cli.input_dir.unwrap_or_else(|| config.input_dir_path());
  let output_dir = cli.output_dir.unwrap_or_else(|| config.output_dir_path());
  let assets_dir = match cli.assets_dir {
    Some(dir) => dir,
    None if config.assets_dir.is_some() => config.assets_dir_path(),
    None => input_dir.join("assets").join("images"),
  };

  std::fs::create_dir_all(&output_dir)
    .with_context(|| format!("failed to create {}", output_dir.display()))?;

  let inputs = discover_inputs(&input_dir, &[DEFAULT_CONFIG_FILE])
    .with_context(|| format!("failed to list inputs in {}", input_dir.display()))?;
  if inputs.is_empty() {
    bail!("no JSON files found in {}", input_dir.display());
  }
  info!("found {} subjects to process", inputs.len());

  let packager = QuizPackager::new(ConversionContext {
    layout: config.to_layout(),
    assets_dir: &assets_dir,
    output_dir: &output_dir,
    format: config.format,
  })
  .context("invalid packaging configuration")?;

  let summary = packager.convert_all(&inputs);
  for report in &summary.converted {
    if !report.missing_assets.is_empty() {
      warn!(
        "{}: {} referenced assets were not found",
        report.subject_name_en,
        report.missing_assets.len()
      );
    }
  }

  info!(
    converted = summary.converted.len(),
    failed = summary.failures.len(),
    "packages written to {}",
    output_dir.display()
  );

  if !summary.is_success() {
    let failed: Vec<String> = summary
      .failures
      .iter()
      .map(|(path, err)| format!("{}: {err}", path.display()))
      .collect();
    bail!("{} document(s) failed:\n{}", failed.len(), failed.join("\n"));
  }

  Ok(())
}
