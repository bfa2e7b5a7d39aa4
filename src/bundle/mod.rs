//! Write nested packages to disk, either as plain JSON or as an archive with their images.

mod archive;
mod staging;

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{PackageError, Result};
use crate::models::NestedPackage;
use crate::project::PackageLayout;

pub use archive::write_archive;
pub use staging::{StagedPackage, stage_package, write_package_json};

/// Outcome of bundling a single package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleReport {
  /// Location of the written archive.
  pub archive_path: PathBuf,
  /// Number of images included in the archive.
  pub image_count: usize,
  /// Source paths of referenced assets that were not found.
  pub missing_assets: Vec<PathBuf>,
}

/// Archive stem for a package: its English subject name, or the layout fallback when blank.
pub fn archive_stem<'a>(layout: &PackageLayout<'a>, package: &'a NestedPackage) -> &'a str {
  if package.subject_name_en.is_empty() {
    layout.fallback_subject_name
  } else {
    &package.subject_name_en
  }
}

/// Stage the package with its assets and compress it into `<output_dir>/<stem>.<ext>`.
///
/// Missing assets do not abort bundling. The staging directory is removed once the archive
/// has been written, and also when any step fails.
pub fn bundle_package(
  layout: &PackageLayout<'_>,
  package: &NestedPackage,
  assets: &BTreeSet<String>,
  assets_dir: &Path,
  output_dir: &Path,
) -> Result<BundleReport> {
  fs::create_dir_all(output_dir).map_err(|err| PackageError::io(output_dir, err))?;

  let stem = archive_stem(layout, package);
  let staged = stage_package(layout, package, stem, assets, assets_dir, output_dir)?;

  let archive_path = output_dir.join(format!("{stem}.{}", layout.archive_extension));
  let entries = write_archive(staged.path(), &archive_path)?;
  debug!(archive = %archive_path.display(), entries, "archive written");

  let report = BundleReport {
    archive_path,
    image_count: staged.image_count,
    missing_assets: staged.missing_assets.clone(),
  };
  staged.close()?;
  Ok(report)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::PackagerConfig;

  fn package(name: &str) -> NestedPackage {
    NestedPackage {
      subject_name_zh: String::new(),
      subject_name_en: name.into(),
      chapters: Vec::new(),
    }
  }

  #[test]
  fn archive_stem_falls_back_for_blank_names() {
    let config = PackagerConfig::default();
    let layout = config.to_layout();
    let named = package("physics");
    let blank = package("");
    assert_eq!(archive_stem(&layout, &named), "physics");
    assert_eq!(archive_stem(&layout, &blank), "unknown");
  }

  #[test]
  fn bundling_leaves_only_the_archive_behind() -> Result<()> {
    let temp = tempfile::tempdir().unwrap();
    let output_dir = temp.path().join("out");
    let config = PackagerConfig::default();

    let report = bundle_package(
      &config.to_layout(),
      &package("biology"),
      &BTreeSet::new(),
      temp.path(),
      &output_dir,
    )?;

    assert_eq!(report.archive_path, output_dir.join("biology.zip"));
    assert_eq!(report.image_count, 0);
    let leftovers: Vec<_> = fs::read_dir(&output_dir)
      .unwrap()
      .flatten()
      .map(|entry| entry.file_name())
      .collect();
    assert_eq!(leftovers, vec![std::ffi::OsString::from("biology.zip")]);
    Ok(())
  }
}
