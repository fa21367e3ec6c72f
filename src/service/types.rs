//! Service layer response types

use crate::core::grouper::GroupId;
use crate::core::metadata::GroupMetadata;
use crate::core::photo::{FaceCount, Photo};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const STATUS_SUCCESS: &str = "success";

/// Result of grouping a batch of photos
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupingResponse {
    pub status: String,
    /// Live groups keyed by id
    pub groups: BTreeMap<GroupId, GroupMetadata>,
    pub total_groups: usize,
    /// Number of identifiers in the request
    pub total_photos: usize,
    /// Photos left out of every group because no face was found
    pub photos_without_faces: Vec<Photo>,
}

/// Face count of a single photo
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub status: String,
    pub photo: Photo,
    pub face_count: FaceCount,
    pub is_family_photo: bool,
}

/// Health check result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
}
