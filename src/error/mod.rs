//! # Error Module
//!
//! Error types for the family photo grouper.
//!
//! ## Design Principles
//! - **Analyzer failures stay inside the core** - `DetectionError` and
//!   `ComparisonError` are absorbed by the grouper, never returned to callers
//! - **Include context** - photo identifiers, paths, what went wrong
//! - **Reject bad input early** - the service validates requests before grouping

use crate::core::photo::Photo;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum FamilyGrouperError {
    #[error("Analyzer error: {0}")]
    Analyzer(#[from] AnalyzerError),

    #[error("Invalid input: {0}")]
    Input(#[from] InputError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Photo collection error: {0}")]
    Scan(#[from] ScanError),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),
}

/// Failure to count the faces in a photo
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DetectionError {
    #[error("Photo {photo} is not known to the analyzer")]
    UnknownPhoto { photo: Photo },

    #[error("Face detection failed for {photo}: {reason}")]
    Failed { photo: Photo, reason: String },
}

/// Failure to compare the faces in two photos
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComparisonError {
    #[error("No distance known between {a} and {b}")]
    UnknownPair { a: Photo, b: Photo },

    #[error("Analyzer returned an invalid distance {value} for {a} and {b}")]
    InvalidDistance { a: Photo, b: Photo, value: f64 },

    #[error("Face comparison failed for {a} and {b}: {reason}")]
    Failed { a: Photo, b: Photo, reason: String },
}

/// Errors raised while setting up an analyzer
#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("Failed to read manifest {path}: {source}")]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed manifest {path}: {reason}")]
    ManifestParse { path: PathBuf, reason: String },

    #[error("Invalid distance {value} between {a} and {b} in manifest")]
    ManifestDistance { a: Photo, b: Photo, value: f64 },

    #[error("Invalid default distance {value} in manifest")]
    ManifestDefaultDistance { value: f64 },

    #[error("Analyzer command must not be empty")]
    EmptyCommand,

    #[error("No analyzer configured (use --manifest or --analyzer-command)")]
    NotConfigured,
}

/// Requests the grouping service refuses to run
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    #[error("At least one photo is required")]
    NoPhotos,

    #[error("Photo path is required")]
    MissingPhoto,

    #[error("Photo not found: {photo}")]
    PhotoNotFound { photo: Photo },
}

/// Invalid configuration values
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Invalid threshold: {value} (must be a finite number >= 0)")]
    InvalidThreshold { value: f64 },
}

/// Errors that occur while collecting photos from the filesystem
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Path not found: {path}")]
    PathNotFound { path: PathBuf },

    #[error("Failed to read directory {path}: {source}")]
    ReadDirectory {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, FamilyGrouperError>;
