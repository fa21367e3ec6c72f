//! Analyzer that replays precomputed face counts and distances.
//!
//! Manifest format:
//! ```json
//! {
//!   "faces": { "mum.jpg": 1, "beach.jpg": 3 },
//!   "distances": [ { "a": "mum.jpg", "b": "beach.jpg", "distance": 0.31 } ],
//!   "default_distance": null
//! }
//! ```

use super::{AnalyzerCalls, CallCounter, FaceAnalyzer};
use crate::core::photo::{Distance, FaceCount, Photo};
use crate::error::{AnalyzerError, ComparisonError, DetectionError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// On-disk manifest layout
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    /// Face count per photo
    #[serde(default)]
    pub faces: HashMap<Photo, FaceCount>,
    /// Pairwise distances (order of `a` and `b` does not matter)
    #[serde(default)]
    pub distances: Vec<DistanceEntry>,
    /// Distance used for pairs that are not listed
    #[serde(default)]
    pub default_distance: Option<Distance>,
}

/// One pairwise distance in a manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistanceEntry {
    pub a: Photo,
    pub b: Photo,
    pub distance: Distance,
}

/// Replays a [`Manifest`]
///
/// Photos or pairs missing from the manifest fail the same way a real
/// analyzer would fail on an unreadable image.
pub struct ManifestAnalyzer {
    faces: HashMap<Photo, FaceCount>,
    distances: HashMap<(Photo, Photo), Distance>,
    default_distance: Option<Distance>,
    calls: CallCounter,
}

impl ManifestAnalyzer {
    /// Create an empty analyzer
    pub fn new() -> Self {
        Self {
            faces: HashMap::new(),
            distances: HashMap::new(),
            default_distance: None,
            calls: CallCounter::default(),
        }
    }

    /// Load a manifest from a JSON file
    pub fn from_path(path: &Path) -> Result<Self, AnalyzerError> {
        let content = std::fs::read_to_string(path).map_err(|source| AnalyzerError::ManifestRead {
            path: path.to_path_buf(),
            source,
        })?;

        let manifest: Manifest =
            serde_json::from_str(&content).map_err(|e| AnalyzerError::ManifestParse {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        Self::from_manifest(manifest)
    }

    /// Build from an in-memory manifest
    pub fn from_manifest(manifest: Manifest) -> Result<Self, AnalyzerError> {
        if let Some(value) = manifest.default_distance.filter(|d| !is_valid_distance(*d)) {
            return Err(AnalyzerError::ManifestDefaultDistance { value });
        }

        let mut analyzer = Self::new();
        analyzer.faces = manifest.faces;
        analyzer.default_distance = manifest.default_distance;

        for entry in manifest.distances {
            if !is_valid_distance(entry.distance) {
                return Err(AnalyzerError::ManifestDistance {
                    a: entry.a,
                    b: entry.b,
                    value: entry.distance,
                });
            }
            analyzer = analyzer.with_distance(entry.a, entry.b, entry.distance);
        }

        Ok(analyzer)
    }

    /// Record the face count of a photo
    pub fn with_faces(mut self, photo: impl Into<Photo>, count: FaceCount) -> Self {
        self.faces.insert(photo.into(), count);
        self
    }

    /// Record the distance between two photos
    pub fn with_distance(mut self, a: impl Into<Photo>, b: impl Into<Photo>, distance: Distance) -> Self {
        self.distances.insert(pair_key(a.into(), b.into()), distance);
        self
    }

    /// Distance for pairs the manifest does not list
    pub fn with_default_distance(mut self, distance: Distance) -> Self {
        self.default_distance = Some(distance);
        self
    }

    /// Number of analyzer calls served so far
    pub fn calls(&self) -> AnalyzerCalls {
        self.calls.snapshot()
    }
}

impl Default for ManifestAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl FaceAnalyzer for ManifestAnalyzer {
    fn count_faces(&self, photo: &Photo) -> Result<FaceCount, DetectionError> {
        self.calls.record_detection();

        self.faces
            .get(photo)
            .copied()
            .ok_or_else(|| DetectionError::UnknownPhoto {
                photo: photo.clone(),
            })
    }

    fn compare(&self, a: &Photo, b: &Photo) -> Result<Distance, ComparisonError> {
        self.calls.record_comparison();

        if let Some(distance) = self.distances.get(&pair_key(a.clone(), b.clone())) {
            return Ok(*distance);
        }

        if a == b {
            return Ok(0.0);
        }

        self.default_distance.ok_or_else(|| ComparisonError::UnknownPair {
            a: a.clone(),
            b: b.clone(),
        })
    }

    fn name(&self) -> &str {
        "manifest"
    }
}

fn pair_key(a: Photo, b: Photo) -> (Photo, Photo) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

pub(super) fn is_valid_distance(distance: Distance) -> bool {
    !distance.is_nan() && distance >= 0.0
}
