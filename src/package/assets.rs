//! Discover the media files a nested package refers to.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::Result;
use crate::models::NestedPackage;
use crate::text::PACKAGE_ASSET_PREFIX;

/// Extensions treated as package assets when no configuration overrides them.
pub const DEFAULT_ASSET_EXTENSIONS: &[&str] = &["png", "jpg", "gif", "webp", "mp4"];

/// Finds asset references in the serialised form of a package.
///
/// Scanning the JSON text keeps discovery independent of which fields may carry a reference.
/// It relies on `serde_json` writing `/` and `.` unescaped.
#[derive(Debug, Clone)]
pub struct AssetScanner {
  pattern: Regex,
}

impl AssetScanner {
  /// Build a scanner matching `<prefix><path>.<ext>` for the given extensions.
  pub fn new<S: AsRef<str>>(prefix: &str, extensions: &[S]) -> Result<Self> {
    let extensions: Vec<String> = extensions
      .iter()
      .map(|ext| regex::escape(ext.as_ref().trim_start_matches('.')))
      .filter(|ext| !ext.is_empty())
      .collect();
    let pattern = Regex::new(&format!(
      r#"{}[^"\\\s]+\.(?:{})"#,
      regex::escape(prefix),
      extensions.join("|")
    ))?;
    Ok(Self { pattern })
  }

  /// Collect every distinct asset path referenced anywhere in the package.
  pub fn scan(&self, package: &NestedPackage) -> Result<BTreeSet<String>> {
    let text = serde_json::to_string(package)?;
    Ok(self.scan_text(&text))
  }

  /// Collect every distinct asset path found in an arbitrary text blob.
  pub fn scan_text(&self, text: &str) -> BTreeSet<String> {
    self
      .pattern
      .find_iter(text)
      .map(|found| found.as_str().to_string())
      .collect()
  }
}

fn default_scanner() -> &'static AssetScanner {
  static SCANNER: OnceLock<AssetScanner> = OnceLock::new();
  SCANNER.get_or_init(|| {
    AssetScanner::new(PACKAGE_ASSET_PREFIX, DEFAULT_ASSET_EXTENSIONS)
      .expect("invalid asset reference regex")
  })
}

/// Collect `images/...` references using the default extension set.
pub fn scan_assets(package: &NestedPackage) -> Result<BTreeSet<String>> {
  default_scanner().scan(package)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::models::{PackageChapter, PackageSection, PackagedQuestion, QuestionShape};

  fn package_with_content(content: &str) -> NestedPackage {
    NestedPackage {
      subject_name_zh: "物理".into(),
      subject_name_en: "physics".into(),
      chapters: vec![PackageChapter {
        title: "ch".into(),
        sections: vec![PackageSection {
          title: "sec".into(),
          questions: vec![PackagedQuestion {
            content: content.into(),
            explanation: String::new(),
            shape: QuestionShape::Leaf,
          }],
        }],
      }],
    }
  }

  #[test]
  fn finds_supported_references_and_skips_others() {
    let package = package_with_content(
      r#"<img src="images/diagram_1.png"> see images/shot.mp4 and images/old.bmp"#,
    );
    let assets = scan_assets(&package).unwrap();
    assert_eq!(
      assets,
      BTreeSet::from(["images/diagram_1.png".to_string(), "images/shot.mp4".to_string()])
    );
  }

  #[test]
  fn deduplicates_repeated_references() {
    let package = package_with_content("images/a.gif images/a.gif images/b.webp");
    let assets = scan_assets(&package).unwrap();
    assert_eq!(assets.len(), 2);
  }

  #[test]
  fn stops_at_quotes_and_whitespace() {
    let scanner = AssetScanner::new("images/", DEFAULT_ASSET_EXTENSIONS).unwrap();
    let assets = scanner.scan_text(r#""images/a.jpg" images/b c.png"#);
    assert_eq!(assets, BTreeSet::from(["images/a.jpg".to_string()]));
  }

  #[test]
  fn keeps_nested_directories_in_reference() {
    let scanner = AssetScanner::new("images/", DEFAULT_ASSET_EXTENSIONS).unwrap();
    let assets = scanner.scan_text("images/ch1/fig.png");
    assert!(assets.contains("images/ch1/fig.png"));
  }

  #[test]
  fn honours_configured_extensions() {
    let scanner = AssetScanner::new("images/", &["svg".to_string()]).unwrap();
    let assets = scanner.scan_text("images/a.svg images/b.png");
    assert_eq!(assets, BTreeSet::from(["images/a.svg".to_string()]));
  }
}
