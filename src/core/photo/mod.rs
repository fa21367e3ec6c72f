//! # Photo Module
//!
//! Photo identifiers and the face-count classification derived from them.
//!
//! | Face count | Kind         | Grouped? |
//! |------------|--------------|----------|
//! | 0          | `Empty`      | No       |
//! | 1          | `Individual` | Yes      |
//! | 2+         | `Family`     | Yes      |

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Number of faces detected in a photo
pub type FaceCount = u32;

/// Dissimilarity between the faces in two photos (lower = more similar)
pub type Distance = f64;

/// Opaque photo identifier, usually a file path
///
/// Only identity equality is meaningful to the grouper.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Photo(String);

impl Photo {
    /// Create a photo identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The identifier interpreted as a filesystem path
    pub fn as_path(&self) -> &Path {
        Path::new(&self.0)
    }

    /// Whether the identifier is blank
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for Photo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Photo {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for Photo {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&Path> for Photo {
    fn from(path: &Path) -> Self {
        Self(path.to_string_lossy().into_owned())
    }
}

/// Classification of a photo by how many faces it contains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhotoKind {
    /// No faces detected (or detection failed)
    Empty,
    /// Exactly one face
    Individual,
    /// More than one face
    Family,
}

impl PhotoKind {
    /// Classify based on face count
    pub fn from_face_count(count: FaceCount) -> Self {
        match count {
            0 => PhotoKind::Empty,
            1 => PhotoKind::Individual,
            _ => PhotoKind::Family,
        }
    }

    pub fn is_family(&self) -> bool {
        matches!(self, PhotoKind::Family)
    }
}

impl fmt::Display for PhotoKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhotoKind::Empty => write!(f, "No Faces"),
            PhotoKind::Individual => write!(f, "Individual"),
            PhotoKind::Family => write!(f, "Family"),
        }
    }
}
