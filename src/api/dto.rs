//! REST API request/response data transfer objects

use crate::core::photo::{Distance, Photo};
use serde::{Deserialize, Serialize};

/// Group request
#[derive(Debug, Clone, Deserialize)]
pub struct GroupRequest {
    #[serde(default)]
    pub photos: Vec<Photo>,
    /// Overrides the configured threshold for this request
    pub threshold: Option<Distance>,
}

/// Analyze request
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeRequest {
    pub photo: Option<Photo>,
}

/// Error body returned with every non-2xx response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
