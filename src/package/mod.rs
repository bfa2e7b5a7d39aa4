//! Nested package construction split into the join, the question reshaping and asset discovery.

mod assets;
mod question;
mod tree;

pub use assets::{AssetScanner, DEFAULT_ASSET_EXTENSIONS, scan_assets};
pub use question::transform_question;
pub use tree::{TreeBuilder, build_package};
