//! # Core Module
//!
//! The transport-agnostic grouping engine.
//!
//! ## Modules
//! - `photo` - Photo identifiers and face-count classification
//! - `analyzer` - Face detection and comparison capability
//! - `cache` - Remembers face counts per photo
//! - `grouper` - Clusters photos into family groups
//! - `metadata` - Per-group counts for reporting
//! - `scanner` - Collects photos from files and directories

pub mod analyzer;
pub mod cache;
pub mod grouper;
pub mod metadata;
pub mod photo;
pub mod scanner;

// Re-export commonly used types
pub use analyzer::FaceAnalyzer;
pub use cache::FaceCountCache;
pub use grouper::{GroupId, GroupingResult, PhotoGroup, PhotoGrouper, ThresholdStrategy};
pub use metadata::GroupMetadata;
pub use photo::{Distance, FaceCount, Photo, PhotoKind};
