#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod builder;
pub mod bundle;
pub mod config;
pub mod error;
pub mod models;
pub mod package;
pub mod project;
pub mod text;

pub use builder::{BatchSummary, ConversionReport, QuizPackager, discover_inputs};
pub use bundle::{BundleReport, bundle_package};
pub use config::PackagerConfig;
pub use error::{PackageError, Result};
pub use models::{NestedPackage, RawDocument};
pub use package::{build_package, scan_assets};
pub use project::{ConversionContext, PackageFormat, PackageLayout};
pub use text::{normalize, rewrite_paths};
