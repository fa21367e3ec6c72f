//! Distance threshold that decides whether two faces are the same person.

use crate::core::photo::Distance;
use crate::error::ConfigError;

/// Default maximum distance for a match
pub const DEFAULT_THRESHOLD: Distance = 0.6;

/// Inclusive distance threshold
///
/// A pair matches when `distance <= threshold`. Failed comparisons are
/// reported as infinite distance and therefore never match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdStrategy {
    threshold: Distance,
}

impl ThresholdStrategy {
    /// Create a strategy, rejecting negative, infinite and NaN thresholds
    pub fn new(threshold: Distance) -> Result<Self, ConfigError> {
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(ConfigError::InvalidThreshold { value: threshold });
        }
        Ok(Self { threshold })
    }

    /// Whether two faces at `distance` are the same person
    pub fn is_match(&self, distance: Distance) -> bool {
        distance <= self.threshold
    }

    pub fn threshold(&self) -> Distance {
        self.threshold
    }

    /// Human-readable description
    pub fn description(&self) -> String {
        format!(
            "Photos with face distance <= {} are treated as the same person",
            self.threshold
        )
    }
}

impl Default for ThresholdStrategy {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_is_inclusive() {
        let strategy = ThresholdStrategy::new(0.6).unwrap();

        assert!(strategy.is_match(0.59));
        assert!(strategy.is_match(0.6));
        assert!(!strategy.is_match(0.6 + 1e-9));
    }

    #[test]
    fn infinite_distance_never_matches() {
        let strategy = ThresholdStrategy::new(1000.0).unwrap();
        assert!(!strategy.is_match(Distance::INFINITY));
    }

    #[test]
    fn default_threshold() {
        assert_eq!(ThresholdStrategy::default().threshold(), 0.6);
    }

    #[test]
    fn rejects_invalid_thresholds() {
        assert!(ThresholdStrategy::new(-0.1).is_err());
        assert!(ThresholdStrategy::new(Distance::NAN).is_err());
        assert!(ThresholdStrategy::new(Distance::INFINITY).is_err());
        assert!(ThresholdStrategy::new(0.0).is_ok());
    }

    #[test]
    fn description_includes_threshold() {
        let strategy = ThresholdStrategy::new(0.45).unwrap();
        assert!(strategy.description().contains("0.45"));
    }
}
