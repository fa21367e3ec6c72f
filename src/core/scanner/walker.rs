//! Expands file and directory arguments into photo identifiers.

use super::filter::ImageFilter;
use crate::core::photo::Photo;
use crate::error::ScanError;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Options for collecting photos
#[derive(Debug, Clone, Default)]
pub struct CollectConfig {
    /// Follow symbolic links while walking directories
    pub follow_symlinks: bool,
    /// Include hidden files and directories
    pub include_hidden: bool,
    /// Maximum directory depth (None = unlimited)
    pub max_depth: Option<usize>,
}

/// Turns command-line paths into an ordered photo list
///
/// Files are taken as given. Directories contribute their image files in
/// file name order, so repeated runs see photos in the same order.
pub struct PhotoCollector {
    config: CollectConfig,
    filter: ImageFilter,
}

impl PhotoCollector {
    pub fn new(config: CollectConfig) -> Self {
        let filter = ImageFilter::new().with_hidden(config.include_hidden);
        Self { config, filter }
    }

    /// Collect photos from every path, in argument order
    pub fn collect(&self, paths: &[PathBuf]) -> Result<Vec<Photo>, ScanError> {
        let mut photos = Vec::new();

        for path in paths {
            if path.is_dir() {
                photos.extend(self.collect_directory(path)?);
            } else if path.exists() {
                photos.push(Photo::from(path.as_path()));
            } else {
                return Err(ScanError::PathNotFound { path: path.clone() });
            }
        }

        Ok(photos)
    }

    fn collect_directory(&self, root: &Path) -> Result<Vec<Photo>, ScanError> {
        let mut walker = WalkDir::new(root)
            .follow_links(self.config.follow_symlinks)
            .sort_by_file_name();

        if let Some(depth) = self.config.max_depth {
            walker = walker.max_depth(depth);
        }

        let filter = &self.filter;
        let mut photos = Vec::new();

        // Prune hidden directories instead of walking into them
        let entries = walker
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !filter.skips(entry.path()));

        for entry in entries {
            let entry = entry.map_err(|source| ScanError::ReadDirectory {
                path: source
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| root.to_path_buf()),
                source,
            })?;

            if entry.file_type().is_file() && filter.accepts(entry.path()) {
                photos.push(Photo::from(entry.path()));
            }
        }

        debug!(directory = %root.display(), photos = photos.len(), "Collected photos");
        Ok(photos)
    }
}

impl Default for PhotoCollector {
    fn default() -> Self {
        Self::new(CollectConfig::default())
    }
}
