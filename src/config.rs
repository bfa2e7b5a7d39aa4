//! Packager configuration loader describing input, output and naming conventions.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{PackageError, Result};
use crate::project::{PackageFormat, PackageLayout};

/// Configuration file name looked up by [`PackagerConfig::discover`].
pub const DEFAULT_CONFIG_FILE: &str = "quiz_packager.config.json";

/// Discoverable configuration for a packaging run.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PackagerConfig {
  /// Directory scanned for flat subject exports (`*.json`).
  pub input_dir: String,
  /// Directory receiving archives or JSON packages.
  pub output_dir: String,
  /// Directory holding source images. Defaults to `<input_dir>/assets/images`.
  pub assets_dir: Option<String>,
  /// File name of the nested JSON inside the archive.
  pub data_file_name: String,
  /// Folder inside the archive receiving referenced images.
  pub images_dir_name: String,
  /// Legacy asset prefix rewritten in question text.
  pub legacy_asset_prefix: String,
  /// Package-relative asset prefix.
  pub asset_prefix: String,
  /// File extensions recognised as package assets.
  pub asset_extensions: Vec<String>,
  /// Extension of the generated archive.
  pub archive_extension: String,
  /// Archive stem used when a book has no English subject name.
  pub fallback_subject_name: String,
  /// Output flavour.
  pub format: PackageFormat,
}

impl Default for PackagerConfig {
  fn default() -> Self {
    Self {
      input_dir: "data".into(),
      output_dir: "output".into(),
      assets_dir: None,
      data_file_name: "data.json".into(),
      images_dir_name: "images".into(),
      legacy_asset_prefix: "assets/images/".into(),
      asset_prefix: "images/".into(),
      asset_extensions: ["png", "jpg", "gif", "webp", "mp4"]
        .into_iter()
        .map(String::from)
        .collect(),
      archive_extension: "zip".into(),
      fallback_subject_name: "unknown".into(),
      format: PackageFormat::Archive,
    }
  }
}

impl PackagerConfig {
  /// Attempt to load configuration from the provided directory.
  ///
  /// A missing or unparsable file falls back to the defaults.
  pub fn discover(dir: &Path) -> Self {
    let candidate = dir.join(DEFAULT_CONFIG_FILE);
    if !candidate.is_file() {
      debug!(path = %candidate.display(), "no config file, using defaults");
      return Self::default();
    }

    Self::from_path(&candidate).unwrap_or_else(|err| {
      warn!(error = %err, "ignoring unusable config file");
      Self::default()
    })
  }

  /// Read configuration from a specific JSON file.
  pub fn from_path(path: &Path) -> Result<Self> {
    let content = fs::read_to_string(path).map_err(|err| PackageError::io(path, err))?;
    Ok(serde_json::from_str(&content)?)
  }

  /// Borrowing conversion into a layout.
  pub fn to_layout(&self) -> PackageLayout<'_> {
    PackageLayout {
      data_file_name: &self.data_file_name,
      images_dir_name: &self.images_dir_name,
      legacy_asset_prefix: &self.legacy_asset_prefix,
      asset_prefix: &self.asset_prefix,
      asset_extensions: &self.asset_extensions,
      archive_extension: &self.archive_extension,
      fallback_subject_name: &self.fallback_subject_name,
    }
  }

  /// Directory scanned for subject exports.
  pub fn input_dir_path(&self) -> PathBuf {
    PathBuf::from(&self.input_dir)
  }

  /// Directory receiving the packages.
  pub fn output_dir_path(&self) -> PathBuf {
    PathBuf::from(&self.output_dir)
  }

  /// Directory holding source images.
  pub fn assets_dir_path(&self) -> PathBuf {
    match &self.assets_dir {
      Some(dir) => PathBuf::from(dir),
      None => self.input_dir_path().join("assets").join("images"),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::tempdir;

  #[test]
  fn discover_falls_back_to_defaults() {
    let dir = tempdir().unwrap();
    let config = PackagerConfig::discover(dir.path());
    assert_eq!(config.data_file_name, "data.json");
    assert_eq!(config.format, PackageFormat::Archive);
    assert_eq!(config.asset_extensions.len(), 5);
  }

  #[test]
  fn discover_reads_partial_overrides() {
    let dir = tempdir().unwrap();
    fs::write(
      dir.path().join(DEFAULT_CONFIG_FILE),
      r#"{"input_dir": "exports", "format": "json", "asset_extensions": ["svg"]}"#,
    )
    .unwrap();

    let config = PackagerConfig::discover(dir.path());
    assert_eq!(config.input_dir, "exports");
    assert_eq!(config.format, PackageFormat::Json);
    assert_eq!(config.asset_extensions, vec!["svg".to_string()]);
    assert_eq!(config.images_dir_name, "images");
  }

  #[test]
  fn from_path_reports_parse_errors() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("custom.json");
    fs::write(&path, r#"{"format": "tarball"}"#).unwrap();

    let result = PackagerConfig::from_path(&path);
    assert!(matches!(result, Err(PackageError::Json(_))));

    let missing = PackagerConfig::from_path(&dir.path().join("absent.json"));
    assert!(matches!(missing, Err(PackageError::Io { .. })));
  }

  #[test]
  fn discover_ignores_malformed_file() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(DEFAULT_CONFIG_FILE), "{not json").unwrap();
    let config = PackagerConfig::discover(dir.path());
    assert_eq!(config.input_dir, "data");
  }

  #[test]
  fn assets_dir_defaults_under_input_dir() {
    let config = PackagerConfig {
      input_dir: "exports".into(),
      ..PackagerConfig::default()
    };
    assert_eq!(
      config.assets_dir_path(),
      PathBuf::from("exports").join("assets").join("images")
    );

    let config = PackagerConfig {
      assets_dir: Some("media".into()),
      ..config
    };
    assert_eq!(config.assets_dir_path(), PathBuf::from("media"));
  }
}
