//! Staging directory holding the data file and the located images before archiving.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::{debug, warn};

use crate::error::{PackageError, Result};
use crate::models::NestedPackage;
use crate::project::PackageLayout;

/// Package contents laid out on disk, removed when dropped.
#[derive(Debug)]
pub struct StagedPackage {
  dir: TempDir,
  /// Number of images installed into the staging `images/` folder.
  pub image_count: usize,
  /// Source paths of referenced assets that could not be found.
  pub missing_assets: Vec<PathBuf>,
}

impl StagedPackage {
  /// Root of the staging directory.
  pub fn path(&self) -> &Path {
    self.dir.path()
  }

  /// Remove the staging directory, reporting failures instead of ignoring them.
  pub fn close(self) -> Result<()> {
    let path = self.dir.path().to_path_buf();
    self.dir.close().map_err(|err| PackageError::io(path, err))
  }
}

/// Create a fresh staging directory inside `output_dir` and fill it.
///
/// The directory name is unique per call, so concurrent runs for books sharing an English
/// name never collide. Assets missing from `assets_dir` are logged and skipped.
pub fn stage_package(
  layout: &PackageLayout<'_>,
  package: &NestedPackage,
  stem: &str,
  assets: &BTreeSet<String>,
  assets_dir: &Path,
  output_dir: &Path,
) -> Result<StagedPackage> {
  let dir = tempfile::Builder::new()
    .prefix(&format!("_tmp_{stem}_"))
    .tempdir_in(output_dir)
    .map_err(|err| PackageError::io(output_dir, err))?;

  write_package_json(package, &dir.path().join(layout.data_file_name))?;

  let mut staged = StagedPackage {
    dir,
    image_count: 0,
    missing_assets: Vec::new(),
  };

  if assets.is_empty() {
    return Ok(staged);
  }

  let images_dir = staged.path().join(layout.images_dir_name);
  fs::create_dir_all(&images_dir).map_err(|err| PackageError::io(&images_dir, err))?;

  // Images are flattened to their bare file name, so each name is resolved once.
  let mut seen = BTreeSet::new();
  for asset in assets {
    let Some(file_name) = Path::new(asset).file_name() else {
      continue;
    };
    if !seen.insert(file_name) {
      debug!(asset = %asset, "asset already handled under the same name");
      continue;
    }

    let source = assets_dir.join(file_name);
    if !source.is_file() {
      warn!(source = %source.display(), "asset not found");
      staged.missing_assets.push(source);
      continue;
    }

    let destination = images_dir.join(file_name);
    fs::copy(&source, &destination).map_err(|err| PackageError::io(&destination, err))?;
    staged.image_count += 1;
  }

  Ok(staged)
}

/// Write the package as indented UTF-8 JSON.
pub fn write_package_json(package: &NestedPackage, path: &Path) -> Result<()> {
  let json = serde_json::to_string_pretty(package)?;
  fs::write(path, json).map_err(|err| PackageError::io(path, err))
}
