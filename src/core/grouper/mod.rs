//! # Grouper Module
//!
//! Clusters photos into family groups.
//!
//! ## How It Works
//! 1. **Classify** - count faces; keep individual (1 face) and family
//!    (2+ faces) photos, drop photos without faces
//! 2. **Cluster** - each individual photo joins the first existing group
//!    holding a matching face, or opens a new group
//! 3. **Bridge** - each family photo joins the lowest-id group containing
//!    an individual it matches, and every other such group is merged in
//!
//! Group ids count up from 0 and are never reused after a merge retires
//! them.

mod arena;
mod clustering;
mod strategy;

pub use clustering::PhotoGrouper;
pub use strategy::{ThresholdStrategy, DEFAULT_THRESHOLD};

use crate::core::photo::{Photo, PhotoKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Identifier of a group within one grouping result
pub type GroupId = usize;

/// A live group of photos
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoGroup {
    pub id: GroupId,
    /// Members in the order they joined
    pub photos: Vec<Photo>,
}

impl PhotoGroup {
    pub fn contains(&self, photo: &Photo) -> bool {
        self.photos.contains(photo)
    }

    pub fn len(&self) -> usize {
        self.photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }
}

/// Outcome of grouping one batch of photos
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupingResult {
    /// Live groups in ascending id order
    pub groups: Vec<PhotoGroup>,
    /// Classification of every distinct input photo
    pub kinds: HashMap<Photo, PhotoKind>,
    /// Photos with no detected faces, in input order
    pub photos_without_faces: Vec<Photo>,
    /// Number of identifiers supplied, duplicates included
    pub total_photos: usize,
}

impl GroupingResult {
    pub fn total_groups(&self) -> usize {
        self.groups.len()
    }

    /// Group by id, `None` if the id is unknown or was retired
    pub fn group(&self, id: GroupId) -> Option<&PhotoGroup> {
        self.groups.iter().find(|g| g.id == id)
    }

    /// Id of the group holding `photo`
    pub fn group_of(&self, photo: &Photo) -> Option<GroupId> {
        self.groups.iter().find(|g| g.contains(photo)).map(|g| g.id)
    }

    pub fn kind_of(&self, photo: &Photo) -> Option<PhotoKind> {
        self.kinds.get(photo).copied()
    }
}
