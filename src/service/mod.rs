//! Service layer module

pub mod grouping_service;
pub mod types;

pub use grouping_service::{GroupingService, ServiceConfig, SERVICE_NAME};
pub use types::*;
