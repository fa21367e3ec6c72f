//! Decides which files found in a directory count as photos.

use std::path::Path;

/// Extensions picked up when walking a directory
pub const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "webp", "heic", "heif", "gif", "bmp", "tiff", "tif",
];

/// Accepts image files, optionally skipping hidden ones
#[derive(Debug, Clone, Default)]
pub struct ImageFilter {
    include_hidden: bool,
}

impl ImageFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept names starting with `.`
    pub fn with_hidden(mut self, include: bool) -> Self {
        self.include_hidden = include;
        self
    }

    /// Whether a hidden entry should be skipped
    pub fn skips(&self, path: &Path) -> bool {
        !self.include_hidden && is_hidden(path)
    }

    /// Whether `path` names an image file this filter accepts
    pub fn accepts(&self, path: &Path) -> bool {
        if self.skips(path) {
            return false;
        }

        path.extension()
            .and_then(|e| e.to_str())
            .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
            .unwrap_or(false)
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|name| name.starts_with('.'))
}
