//! # Family Photo Grouper
//!
//! Groups photos into families using pairwise face similarity.
//!
//! Individual photos (one face) are clustered by face distance, then family
//! photos (several faces) bridge the clusters of the people they show.
//!
//! ## Architecture
//! - `core` - The grouping engine: photo model, analyzers, face count cache,
//!   grouper, group metadata, photo collection
//! - `service` - Request validation and response shaping around the grouper
//! - `api` - HTTP transport for the service
//! - `events` - Progress events emitted while grouping
//! - `error` - Error types

pub mod api;
pub mod core;
pub mod error;
pub mod events;
pub mod service;

// Re-export commonly used types at the crate root
pub use error::{FamilyGrouperError, Result};

/// Initialize tracing for the library
///
/// Logs go to stderr. `RUST_LOG` takes precedence over `default_directive`.
/// Calling this more than once keeps the first subscriber.
pub fn init_tracing(default_directive: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_directive));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
