//! Request-level entry point around the photo grouper.

use super::types::{AnalyzeResponse, GroupingResponse, HealthResponse, STATUS_SUCCESS};
use crate::core::analyzer::FaceAnalyzer;
use crate::core::cache::{CacheStats, FaceCountCache};
use crate::core::grouper::{PhotoGrouper, ThresholdStrategy};
use crate::core::metadata::GroupMetadata;
use crate::core::photo::{Distance, Photo};
use crate::error::{InputError, Result};
use crate::events::{null_sender, EventSender};
use std::sync::Arc;
use tracing::info;

pub const SERVICE_NAME: &str = "family-photo-grouping";

/// Service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Threshold used when a request does not override it
    pub strategy: ThresholdStrategy,
    /// Reject photos that do not name an existing file
    pub require_existing_files: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            strategy: ThresholdStrategy::default(),
            require_existing_files: true,
        }
    }
}

/// Validates requests and runs the grouper
///
/// Owns the face count cache, so counts are shared by every request the
/// service handles. Groups never outlive a single call.
pub struct GroupingService {
    analyzer: Arc<dyn FaceAnalyzer>,
    cache: FaceCountCache,
    config: ServiceConfig,
}

impl GroupingService {
    pub fn new(analyzer: Arc<dyn FaceAnalyzer>, config: ServiceConfig) -> Self {
        Self {
            analyzer,
            cache: FaceCountCache::new(),
            config,
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn analyzer_name(&self) -> &str {
        self.analyzer.name()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Group photos with the configured threshold
    pub fn group(&self, photos: &[Photo]) -> Result<GroupingResponse> {
        self.group_with_events(photos, None, &null_sender())
    }

    /// Group photos, optionally overriding the threshold for this call
    pub fn group_with_threshold(
        &self,
        photos: &[Photo],
        threshold: Option<Distance>,
    ) -> Result<GroupingResponse> {
        self.group_with_events(photos, threshold, &null_sender())
    }

    /// Group photos and report progress through `events`
    pub fn group_with_events(
        &self,
        photos: &[Photo],
        threshold: Option<Distance>,
        events: &EventSender,
    ) -> Result<GroupingResponse> {
        let strategy = match threshold {
            Some(value) => ThresholdStrategy::new(value)?,
            None => self.config.strategy,
        };
        self.validate(photos)?;

        info!(
            photos = photos.len(),
            threshold = strategy.threshold(),
            "Grouping request"
        );

        let result = PhotoGrouper::new(self.analyzer.as_ref(), &self.cache)
            .with_strategy(strategy)
            .group_with_events(photos, events)?;

        Ok(GroupingResponse {
            status: STATUS_SUCCESS.to_string(),
            groups: GroupMetadata::for_result(&result),
            total_groups: result.total_groups(),
            total_photos: result.total_photos,
            photos_without_faces: result.photos_without_faces,
        })
    }

    /// Count the faces in one photo
    pub fn analyze(&self, photo: &Photo) -> Result<AnalyzeResponse> {
        if photo.is_blank() {
            return Err(InputError::MissingPhoto.into());
        }
        self.check_exists(photo)?;

        let face_count = self.cache.get(photo, self.analyzer.as_ref());

        Ok(AnalyzeResponse {
            status: STATUS_SUCCESS.to_string(),
            photo: photo.clone(),
            face_count,
            is_family_photo: face_count > 1,
        })
    }

    /// Whether the photo shows more than one face
    pub fn is_family_photo(&self, photo: &Photo) -> bool {
        self.cache.get(photo, self.analyzer.as_ref()) > 1
    }

    pub fn health(&self) -> HealthResponse {
        HealthResponse {
            status: "healthy".to_string(),
            service: SERVICE_NAME.to_string(),
        }
    }

    fn validate(&self, photos: &[Photo]) -> std::result::Result<(), InputError> {
        if photos.is_empty() {
            return Err(InputError::NoPhotos);
        }
        photos.iter().try_for_each(|photo| self.check_exists(photo))
    }

    fn check_exists(&self, photo: &Photo) -> std::result::Result<(), InputError> {
        if self.config.require_existing_files && !photo.as_path().exists() {
            return Err(InputError::PhotoNotFound {
                photo: photo.clone(),
            });
        }
        Ok(())
    }
}
