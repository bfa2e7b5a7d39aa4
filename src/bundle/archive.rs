//! Zip writer for staged packages.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use tracing::warn;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{PackageError, Result};

/// Compress every file below `source_dir` into `archive_path`.
///
/// Entry names are relative to `source_dir` and always use forward slashes. Returns the
/// number of files written. A partially written archive is removed on failure.
pub fn write_archive(source_dir: &Path, archive_path: &Path) -> Result<usize> {
  let mut files = Vec::new();
  collect_files(source_dir, Path::new(""), &mut files)?;
  files.sort();

  write_files(source_dir, &files, archive_path)?;
  Ok(files.len())
}

fn write_files(source_dir: &Path, files: &[PathBuf], archive_path: &Path) -> Result<()> {
  let archive = File::create(archive_path).map_err(|err| PackageError::io(archive_path, err))?;
  let result = write_entries(ZipWriter::new(archive), source_dir, files);

  if result.is_err() {
    discard_partial(archive_path);
  }
  result
}

fn discard_partial(archive_path: &Path) {
  if let Err(err) = fs::remove_file(archive_path) {
    warn!(archive = %archive_path.display(), error = %err, "failed to remove partial archive");
  }
}

fn write_entries(mut writer: ZipWriter<File>, source_dir: &Path, files: &[PathBuf]) -> Result<()> {
  let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

  for relative in files {
    let entry_name = relative
      .components()
      .map(|component| component.as_os_str().to_string_lossy())
      .collect::<Vec<_>>()
      .join("/");
    let source = source_dir.join(relative);

    writer.start_file(entry_name, options)?;
    let mut input = File::open(&source).map_err(|err| PackageError::io(&source, err))?;
    io::copy(&mut input, &mut writer).map_err(|err| PackageError::io(&source, err))?;
  }

  writer.finish()?;
  Ok(())
}

fn collect_files(root: &Path, relative: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
  let current = root.join(relative);
  let entries = fs::read_dir(&current).map_err(|err| PackageError::io(&current, err))?;

  for entry in entries {
    let entry = entry.map_err(|err| PackageError::io(&current, err))?;
    let child_relative = relative.join(entry.file_name());
    let file_type = entry
      .file_type()
      .map_err(|err| PackageError::io(entry.path(), err))?;

    if file_type.is_dir() {
      collect_files(root, &child_relative, files)?;
    } else if file_type.is_file() {
      files.push(child_relative);
    }
  }

  Ok(())
}
