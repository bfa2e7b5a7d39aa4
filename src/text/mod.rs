//! Text fixes applied to every string field of a question.
//!
//! LaTeX clean-up and asset path rewriting live in separate submodules; they touch disjoint
//! patterns but are always applied in the same order so the output stays deterministic.

mod latex;
mod paths;

pub use latex::{GREEK_LETTERS, normalize};
pub use paths::{LEGACY_ASSET_PREFIX, PACKAGE_ASSET_PREFIX, PathRewrite, rewrite_paths};

/// Normalise LaTeX, then rewrite asset paths.
pub fn clean_text(text: &str, rewrite: &PathRewrite<'_>) -> String {
    rewrite.apply(&normalize(text))
}
