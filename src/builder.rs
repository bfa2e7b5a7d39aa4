//! Conversion orchestrator: build the nested package, discover its assets and write it out.

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{error, info};

use crate::bundle::{bundle_package, write_package_json};
use crate::error::{PackageError, Result};
use crate::models::{PackageStats, RawDocument};
use crate::package::{AssetScanner, TreeBuilder};
use crate::project::{ConversionContext, PackageFormat};
use crate::text::PathRewrite;

/// Outcome of converting one subject export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionReport {
  /// English subject name of the converted book.
  pub subject_name_en: String,
  /// Chapter, section and question counts.
  pub stats: PackageStats,
  /// Written archive or JSON file.
  pub output_path: PathBuf,
  /// Asset references found in the package text.
  pub referenced_assets: usize,
  /// Images included in the archive. Always zero in JSON mode.
  pub image_count: usize,
  /// Referenced assets missing from the assets directory.
  pub missing_assets: Vec<PathBuf>,
}

/// Result of a batch run. One failing document never prevents the others from converting.
#[derive(Debug, Default)]
pub struct BatchSummary {
  /// Reports for documents that converted successfully, in processing order.
  pub converted: Vec<ConversionReport>,
  /// Documents that failed, with the reason.
  pub failures: Vec<(PathBuf, PackageError)>,
}

impl BatchSummary {
  /// Returns `true` when every document converted.
  pub fn is_success(&self) -> bool {
    self.failures.is_empty()
  }
}

/// High-level helper converting flat exports into packages.
#[derive(Debug)]
pub struct QuizPackager<'a> {
  context: ConversionContext<'a>,
  scanner: AssetScanner,
}

impl<'a> QuizPackager<'a> {
  /// Create a packager for the provided context.
  pub fn new(context: ConversionContext<'a>) -> Result<Self> {
    let layout = context.layout;
    let scanner = AssetScanner::new(layout.asset_prefix, layout.asset_extensions)?;
    Ok(Self { context, scanner })
  }

  /// Convert an in-memory document.
  ///
  /// In JSON mode the package is written as `<subject_name_en>.json`.
  pub fn convert_document(&self, document: &RawDocument) -> Result<ConversionReport> {
    self.convert(document, None)
  }

  /// Read and convert a single export file.
  ///
  /// In JSON mode the package is written under the input's file name.
  pub fn convert_file(&self, path: &Path) -> Result<ConversionReport> {
    let content = fs::read_to_string(path).map_err(|err| PackageError::io(path, err))?;
    let document: RawDocument = serde_json::from_str(&content)?;
    self.convert(&document, path.file_name())
  }

  /// Convert every input in turn, isolating failures per document.
  pub fn convert_all(&self, inputs: &[PathBuf]) -> BatchSummary {
    let mut summary = BatchSummary::default();

    for input in inputs {
      info!(input = %input.display(), "processing");
      match self.convert_file(input) {
        Ok(report) => summary.converted.push(report),
        Err(err) => {
          error!(input = %input.display(), error = %err, "conversion failed");
          summary.failures.push((input.clone(), err));
        }
      }
    }

    summary
  }

  fn convert(&self, document: &RawDocument, json_name: Option<&OsStr>) -> Result<ConversionReport> {
    let layout = &self.context.layout;
    let builder = TreeBuilder::new(PathRewrite {
      from: layout.legacy_asset_prefix,
      to: layout.asset_prefix,
    });

    let package = builder.build(document)?;
    let stats = package.stats();
    info!(
      chapters = stats.chapters,
      sections = stats.sections,
      questions = stats.questions,
      "built package for {}",
      package.subject_name_en
    );

    match self.context.format {
      PackageFormat::Json => {
        let file_name = match json_name {
          Some(name) => PathBuf::from(name),
          None => PathBuf::from(format!(
            "{}.json",
            crate::bundle::archive_stem(layout, &package)
          )),
        };
        fs::create_dir_all(self.context.output_dir)
          .map_err(|err| PackageError::io(self.context.output_dir, err))?;
        let output_path = self.context.output_dir.join(file_name);
        write_package_json(&package, &output_path)?;
        info!(output = %output_path.display(), "wrote package");

        Ok(ConversionReport {
          subject_name_en: package.subject_name_en,
          stats,
          output_path,
          referenced_assets: 0,
          image_count: 0,
          missing_assets: Vec::new(),
        })
      }
      PackageFormat::Archive => {
        let assets = self.scanner.scan(&package)?;
        let report = bundle_package(
          layout,
          &package,
          &assets,
          self.context.assets_dir,
          self.context.output_dir,
        )?;
        info!(
          "created {} ({} images)",
          report.archive_path.display(),
          report.image_count
        );

        Ok(ConversionReport {
          subject_name_en: package.subject_name_en,
          stats,
          output_path: report.archive_path,
          referenced_assets: assets.len(),
          image_count: report.image_count,
          missing_assets: report.missing_assets,
        })
      }
    }
  }
}

/// List the `*.json` exports in `input_dir`, sorted by file name.
///
/// Files whose name appears in `skip` (such as a configuration file) are left out.
pub fn discover_inputs(input_dir: &Path, skip: &[&str]) -> Result<Vec<PathBuf>> {
  let entries = fs::read_dir(input_dir).map_err(|err| PackageError::io(input_dir, err))?;
  let mut inputs = Vec::new();

  for entry in entries.flatten() {
    if !entry.file_type().is_ok_and(|ft| ft.is_file()) {
      continue;
    }
    let path = entry.path();
    if path.extension().and_then(OsStr::to_str) != Some("json") {
      continue;
    }
    let name = entry.file_name();
    if skip.iter().any(|skipped| name.to_str() == Some(*skipped)) {
      continue;
    }
    inputs.push(path);
  }

  inputs.sort();
  Ok(inputs)
}
