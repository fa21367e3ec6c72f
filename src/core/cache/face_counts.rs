//! Get-or-detect face count cache.

use super::CacheStats;
use crate::core::analyzer::FaceAnalyzer;
use crate::core::photo::{FaceCount, Photo};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, warn};

#[derive(Debug, Default)]
struct CacheState {
    counts: HashMap<Photo, FaceCount>,
    hits: usize,
    misses: usize,
    failures: usize,
}

/// Memoizes face counts per photo identifier
///
/// One mutex guards the whole get-or-detect step, so concurrent callers
/// never detect the same photo twice and never lose an insert. Detection
/// failures are stored as 0 and are not retried for the cache's lifetime.
#[derive(Debug, Default)]
pub struct FaceCountCache {
    state: Mutex<CacheState>,
}

impl FaceCountCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Face count for `photo`, asking `analyzer` only on first sight
    pub fn get(&self, photo: &Photo, analyzer: &dyn FaceAnalyzer) -> FaceCount {
        let mut state = self.lock();

        if let Some(count) = state.counts.get(photo).copied() {
            state.hits += 1;
            debug!(photo = %photo, count, "face count cache hit");
            return count;
        }

        state.misses += 1;
        let count = match analyzer.count_faces(photo) {
            Ok(count) => count,
            Err(e) => {
                state.failures += 1;
                warn!(photo = %photo, error = %e, "face detection failed, treating photo as having no faces");
                0
            }
        };

        state.counts.insert(photo.clone(), count);
        count
    }

    /// Cached count without triggering detection
    pub fn peek(&self, photo: &Photo) -> Option<FaceCount> {
        self.lock().counts.get(photo).copied()
    }

    /// Number of cached photos
    pub fn len(&self) -> usize {
        self.lock().counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every cached count and reset statistics
    pub fn clear(&self) {
        *self.lock() = CacheState::default();
    }

    /// Hit/miss statistics
    pub fn stats(&self) -> CacheStats {
        let state = self.lock();
        CacheStats {
            total_entries: state.counts.len(),
            hits: state.hits,
            misses: state.misses,
            detection_failures: state.failures,
        }
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        // Every critical section leaves the map consistent, so a poisoned
        // lock still holds usable data.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
