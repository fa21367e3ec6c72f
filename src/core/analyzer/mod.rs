//! # Analyzer Module
//!
//! The face detection and comparison capability the grouper depends on.
//!
//! ## Implementations
//! - `ManifestAnalyzer` - Replays precomputed counts and distances from JSON
//! - `CommandAnalyzer` - Delegates to an external program per call

mod command;
mod manifest;
mod traits;

pub use command::CommandAnalyzer;
pub use manifest::{DistanceEntry, Manifest, ManifestAnalyzer};
pub use traits::FaceAnalyzer;

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};

/// How many times an analyzer has been called
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzerCalls {
    /// `count_faces` calls
    pub detections: usize,
    /// `compare` calls
    pub comparisons: usize,
}

#[derive(Debug, Default)]
struct CallCounter {
    detections: AtomicUsize,
    comparisons: AtomicUsize,
}

impl CallCounter {
    fn record_detection(&self) {
        self.detections.fetch_add(1, Ordering::Relaxed);
    }

    fn record_comparison(&self) {
        self.comparisons.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self) -> AnalyzerCalls {
        AnalyzerCalls {
            detections: self.detections.load(Ordering::Relaxed),
            comparisons: self.comparisons.load(Ordering::Relaxed),
        }
    }
}
