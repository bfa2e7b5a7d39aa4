//! Error type shared by the conversion pipeline.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Failures that abort the conversion of a single document.
#[derive(Debug, Error)]
pub enum PackageError {
  /// The input document has no top-level `book` object.
  #[error("input document is missing the `book` object")]
  MissingBook,

  /// A top-level question cannot be attached to any section.
  #[error("question #{index} has no `section_id`")]
  MissingSectionId {
    /// Position of the offending question in the input `questions` array.
    index: usize,
  },

  /// The input could not be parsed, or the package could not be serialised.
  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  /// Filesystem failure tied to a specific path.
  #[error("i/o error at {}: {source}", path.display())]
  Io {
    /// Path being read or written when the error occurred.
    path: PathBuf,
    /// Underlying I/O error.
    source: std::io::Error,
  },

  /// A configured asset pattern does not compile.
  #[error("invalid asset pattern: {0}")]
  Pattern(#[from] regex::Error),

  /// The archive writer failed.
  #[error("archive error: {0}")]
  Archive(#[from] zip::result::ZipError),
}

impl PackageError {
  /// Wrap an I/O error together with the path that produced it.
  pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
    Self::Io {
      path: path.as_ref().to_path_buf(),
      source,
    }
  }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, PackageError>;
