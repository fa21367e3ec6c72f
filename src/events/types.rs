//! Event type definitions for grouping progress.

use crate::core::grouper::GroupId;
use crate::core::photo::{Photo, PhotoKind};
use serde::{Deserialize, Serialize};

/// All events emitted while grouping photos
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// Grouping lifecycle events
    Grouping(GroupingEvent),
    /// Changes to individual groups
    Group(GroupEvent),
}

/// Phases of a grouping run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupingPhase {
    /// Counting faces to sort photos into individual and family photos
    Classifying,
    /// Clustering individual photos
    Clustering,
    /// Merging groups through family photos
    Bridging,
}

impl std::fmt::Display for GroupingPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GroupingPhase::Classifying => write!(f, "Counting faces"),
            GroupingPhase::Clustering => write!(f, "Clustering individuals"),
            GroupingPhase::Bridging => write!(f, "Bridging with family photos"),
        }
    }
}

/// Grouping lifecycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GroupingEvent {
    /// Grouping started
    Started { total_photos: usize },
    /// Entered a new phase; `total` is the number of photos it will visit
    PhaseChanged { phase: GroupingPhase, total: usize },
    /// A photo's face count was resolved
    PhotoClassified { photo: Photo, kind: PhotoKind },
    /// A photo finished its phase (`completed` of the phase total)
    Progress { phase: GroupingPhase, completed: usize },
    /// Grouping finished
    Completed(GroupingSummary),
}

/// Summary of a finished grouping run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupingSummary {
    pub total_groups: usize,
    pub individual_photos: usize,
    pub family_photos: usize,
    pub photos_without_faces: usize,
}

/// Changes to groups
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GroupEvent {
    /// A new group was opened for a photo
    Created { group_id: GroupId, photo: Photo },
    /// A photo joined an existing group
    PhotoAdded { group_id: GroupId, photo: Photo },
    /// A family photo folded `retired` groups into `target`
    Merged {
        target: GroupId,
        retired: Vec<GroupId>,
        family_photo: Photo,
    },
}
