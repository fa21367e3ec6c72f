//! # Scanner Module
//!
//! Collects photo identifiers from files and directories given on the
//! command line.
//!
//! ## Supported Formats
//! jpg, jpeg, png, webp, heic, heif, gif, bmp, tiff, tif
//!
//! ## Example
//! ```rust,ignore
//! use family_photo_grouper::core::scanner::PhotoCollector;
//!
//! let photos = PhotoCollector::default().collect(&["/albums/2019".into()])?;
//! ```

mod filter;
mod walker;

pub use filter::{ImageFilter, IMAGE_EXTENSIONS};
pub use walker::{CollectConfig, PhotoCollector};
