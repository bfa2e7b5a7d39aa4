//! Borrowed views of the packaging layout and per-run context.

use std::path::Path;

use serde::Deserialize;

/// Output flavour produced for each converted document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageFormat {
  /// Zip archive holding the data file and every located image.
  #[default]
  Archive,
  /// Nested JSON only, written under the input's file name.
  Json,
}

/// Naming conventions used when building and bundling a package.
#[derive(Debug, Clone, Copy)]
pub struct PackageLayout<'a> {
  /// File name of the nested JSON inside the archive.
  pub data_file_name: &'a str,
  /// Folder inside the archive receiving referenced images.
  pub images_dir_name: &'a str,
  /// Legacy asset prefix rewritten in question text.
  pub legacy_asset_prefix: &'a str,
  /// Package-relative asset prefix that replaces the legacy one.
  pub asset_prefix: &'a str,
  /// File extensions recognised as package assets.
  pub asset_extensions: &'a [String],
  /// Extension of the generated archive.
  pub archive_extension: &'a str,
  /// Archive stem used when a book has no English subject name.
  pub fallback_subject_name: &'a str,
}

/// Filesystem locations for a conversion run.
#[derive(Debug, Clone, Copy)]
pub struct ConversionContext<'a> {
  /// Naming conventions for the run.
  pub layout: PackageLayout<'a>,
  /// Directory holding source images keyed by bare file name.
  pub assets_dir: &'a Path,
  /// Directory receiving archives or JSON packages.
  pub output_dir: &'a Path,
  /// Output flavour.
  pub format: PackageFormat,
}
