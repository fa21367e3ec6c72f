//! Analyzer that shells out to an external face recognition program.
//!
//! The program is invoked once per call:
//! - `<program> [args..] count <photo>` prints the number of faces
//! - `<program> [args..] compare <a> <b>` prints the distance
//!
//! This is how a DeepFace (or similar) wrapper script plugs in.

use super::manifest::is_valid_distance;
use super::{AnalyzerCalls, CallCounter, FaceAnalyzer};
use crate::core::photo::{Distance, FaceCount, Photo};
use crate::error::{AnalyzerError, ComparisonError, DetectionError};
use std::process::{Command, Output};

/// Runs an external program for every detection and comparison
pub struct CommandAnalyzer {
    program: String,
    args: Vec<String>,
    calls: CallCounter,
}

impl CommandAnalyzer {
    /// Create an analyzer for `program`, prefixing every call with `args`
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Result<Self, AnalyzerError> {
        let program = program.into();
        if program.trim().is_empty() {
            return Err(AnalyzerError::EmptyCommand);
        }

        Ok(Self {
            program,
            args,
            calls: CallCounter::default(),
        })
    }

    /// Number of analyzer calls served so far
    pub fn calls(&self) -> AnalyzerCalls {
        self.calls.snapshot()
    }

    fn run(&self, operation: &str, photos: &[&Photo]) -> Result<String, String> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(operation)
            .args(photos.iter().map(|p| p.as_str()))
            .output()
            .map_err(|e| format!("failed to run {}: {}", self.program, e))?;

        stdout_or_error(output)
    }
}

impl FaceAnalyzer for CommandAnalyzer {
    fn count_faces(&self, photo: &Photo) -> Result<FaceCount, DetectionError> {
        self.calls.record_detection();

        let stdout = self.run("count", &[photo]).map_err(|reason| DetectionError::Failed {
            photo: photo.clone(),
            reason,
        })?;

        stdout
            .trim()
            .parse::<FaceCount>()
            .map_err(|e| DetectionError::Failed {
                photo: photo.clone(),
                reason: format!("unexpected output {:?}: {}", stdout.trim(), e),
            })
    }

    fn compare(&self, a: &Photo, b: &Photo) -> Result<Distance, ComparisonError> {
        self.calls.record_comparison();

        let stdout = self.run("compare", &[a, b]).map_err(|reason| ComparisonError::Failed {
            a: a.clone(),
            b: b.clone(),
            reason,
        })?;

        let distance = stdout
            .trim()
            .parse::<Distance>()
            .map_err(|e| ComparisonError::Failed {
                a: a.clone(),
                b: b.clone(),
                reason: format!("unexpected output {:?}: {}", stdout.trim(), e),
            })?;

        if !is_valid_distance(distance) {
            return Err(ComparisonError::InvalidDistance {
                a: a.clone(),
                b: b.clone(),
                value: distance,
            });
        }

        Ok(distance)
    }

    fn name(&self) -> &str {
        &self.program
    }
}

fn stdout_or_error(output: Output) -> Result<String, String> {
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!("exited with {}: {}", output.status, stderr.trim()));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
