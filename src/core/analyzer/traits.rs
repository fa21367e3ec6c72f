//! Face analyzer trait definition.

use crate::core::photo::{Distance, FaceCount, Photo};
use crate::error::{ComparisonError, DetectionError};

/// Face detection and comparison capability consumed by the grouper
///
/// Implementations are stateless per call. Failures are returned, not
/// swallowed; the grouper decides how to degrade.
pub trait FaceAnalyzer: Send + Sync {
    /// Count the faces in a photo
    fn count_faces(&self, photo: &Photo) -> Result<FaceCount, DetectionError>;

    /// Distance between the faces in two photos (lower = more similar)
    fn compare(&self, a: &Photo, b: &Photo) -> Result<Distance, ComparisonError>;

    /// Short name for logs and the CLI summary
    fn name(&self) -> &str;
}
