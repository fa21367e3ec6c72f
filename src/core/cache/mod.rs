//! # Cache Module
//!
//! Remembers face counts so each photo is detected at most once.
//!
//! ## Behaviour
//! - Keyed by exact photo identifier
//! - Lives as long as its owner (the grouping service); nothing is persisted
//! - Detection failures are cached as "no faces"

mod face_counts;

pub use face_counts::FaceCountCache;

use serde::{Deserialize, Serialize};

/// Cache statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Number of photos with a cached count
    pub total_entries: usize,
    /// Lookups answered from the cache
    pub hits: usize,
    /// Lookups that required detection
    pub misses: usize,
    /// Detections that failed and were cached as zero faces
    pub detection_failures: usize,
}

impl CacheStats {
    /// Fraction of lookups answered from the cache
    pub fn hit_rate(&self) -> f64 {
        let lookups = self.hits + self.misses;
        if lookups == 0 {
            0.0
        } else {
            self.hits as f64 / lookups as f64
        }
    }
}
