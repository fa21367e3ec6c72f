//! # Metadata Module
//!
//! Per-group counts reported alongside a grouping result.

use crate::core::grouper::{GroupId, GroupingResult, PhotoGroup};
use crate::core::photo::{Photo, PhotoKind};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Summary of one group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMetadata {
    /// Members in the order they joined
    pub photos: Vec<Photo>,
    /// Photos with more than one face
    pub family_photos: usize,
    /// Photos that are not family photos
    pub individual_photos: usize,
    pub total_photos: usize,
    /// Same as `individual_photos`
    pub members: usize,
}

impl GroupMetadata {
    /// Count the photo kinds in `group`
    ///
    /// Photos missing from `kinds` count as non-family.
    pub fn from_group(group: &PhotoGroup, kinds: &HashMap<Photo, PhotoKind>) -> Self {
        let family_photos = group
            .photos
            .iter()
            .filter(|photo| kinds.get(*photo).is_some_and(PhotoKind::is_family))
            .count();
        let individual_photos = group.photos.len() - family_photos;

        Self {
            photos: group.photos.clone(),
            family_photos,
            individual_photos,
            total_photos: group.photos.len(),
            members: individual_photos,
        }
    }

    /// Metadata for every live group of a result, keyed by group id
    pub fn for_result(result: &GroupingResult) -> BTreeMap<GroupId, GroupMetadata> {
        result
            .groups
            .iter()
            .map(|group| (group.id, Self::from_group(group, &result.kinds)))
            .collect()
    }
}
