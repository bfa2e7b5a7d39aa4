/// Prefix used by the quiz-bank export for image references.
pub const LEGACY_ASSET_PREFIX: &str = "assets/images/";

/// Prefix expected by the packaged quiz client.
pub const PACKAGE_ASSET_PREFIX: &str = "images/";

/// Literal prefix substitution applied to asset references in question text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathRewrite<'a> {
    /// Prefix to replace.
    pub from: &'a str,
    /// Replacement prefix.
    pub to: &'a str,
}

impl Default for PathRewrite<'static> {
    fn default() -> Self {
        Self {
            from: LEGACY_ASSET_PREFIX,
            to: PACKAGE_ASSET_PREFIX,
        }
    }
}

impl PathRewrite<'_> {
    /// Replace every occurrence of the legacy prefix. Case-sensitive, no pattern matching.
    pub fn apply(&self, text: &str) -> String {
        if text.is_empty() || self.from.is_empty() {
            return text.to_string();
        }
        text.replace(self.from, self.to)
    }
}

/// Rewrite `assets/images/` references to the package-relative `images/` convention.
pub fn rewrite_paths(text: &str) -> String {
    PathRewrite::default().apply(text)
}
