//! Distance-to-confidence scoring and match-tier classification
//!
//! Both functions are pure and total over non-negative distances. They are
//! calibrated independently: confidence is a piecewise-linear curve with no
//! jump discontinuities, while the tier thresholds are their own breakpoints
//! and are never derived by thresholding confidence.

use serde::{Deserialize, Serialize};

/// Map a vector-search distance to a confidence score in [0.1, 1.0].
///
/// Strictly decreasing piecewise-linear curve, continuous at each
/// breakpoint. Each range's lower bound belongs to the lower formula
/// (distance exactly 0.8 uses the second segment). Beyond 1.4 the decay
/// floors at 0.1 instead of going negative.
pub fn confidence(distance: f64) -> f64 {
    if distance < 0.8 {
        0.9 + (0.8 - distance) * 0.125
    } else if distance < 1.0 {
        0.7 + (1.0 - distance) * 1.0
    } else if distance < 1.2 {
        0.5 + (1.2 - distance) * 1.0
    } else if distance < 1.4 {
        0.3 + (1.4 - distance) * 1.0
    } else {
        (0.3 - (distance - 1.4) * 0.33).max(0.1)
    }
}

/// Round to 3 decimal places for display. Internal comparisons always use
/// the unrounded value.
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Ordinal relevance bucket derived from distance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchTier {
    Exact,
    Semantic,
    Adjacent,
    Peripheral,
}

impl MatchTier {
    /// Classify a distance into a match tier.
    pub fn classify(distance: f64) -> Self {
        if distance < 0.2 {
            MatchTier::Exact
        } else if distance < 0.35 {
            MatchTier::Semantic
        } else if distance < 0.65 {
            MatchTier::Adjacent
        } else {
            MatchTier::Peripheral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchTier::Exact => "exact",
            MatchTier::Semantic => "semantic",
            MatchTier::Adjacent => "adjacent",
            MatchTier::Peripheral => "peripheral",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_endpoints() {
        assert_eq!(confidence(0.0), 1.0);
        assert!(confidence(5.0) >= 0.1);
        assert!((confidence(2.0) - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_confidence_monotonic_non_increasing() {
        let mut prev = f64::INFINITY;
        let mut d = 0.0;
        while d <= 3.0 {
            let c = confidence(d);
            assert!(c <= prev + 1e-12, "confidence rose at distance {}", d);
            assert!((0.1..=1.0).contains(&c), "confidence out of range at {}", d);
            prev = c;
            d += 0.01;
        }
    }

    #[test]
    fn test_confidence_continuous_at_breakpoints() {
        for bp in [0.8, 1.0, 1.2, 1.4] {
            let below = confidence(bp - 1e-9);
            let at = confidence(bp);
            assert!(
                (below - at).abs() < 1e-6,
                "discontinuity at breakpoint {}",
                bp
            );
        }
    }

    #[test]
    fn test_confidence_boundary_uses_lower_segment() {
        // distance exactly 0.8 belongs to the second segment
        assert!((confidence(0.8) - 0.9).abs() < 1e-9);
        assert!((confidence(1.0) - 0.7).abs() < 1e-9);
        assert!((confidence(1.2) - 0.5).abs() < 1e-9);
        assert!((confidence(1.4) - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_tier_thresholds() {
        assert_eq!(MatchTier::classify(0.1), MatchTier::Exact);
        assert_eq!(MatchTier::classify(0.19), MatchTier::Exact);
        assert_eq!(MatchTier::classify(0.2), MatchTier::Semantic);
        assert_eq!(MatchTier::classify(0.34), MatchTier::Semantic);
        assert_eq!(MatchTier::classify(0.35), MatchTier::Adjacent);
        assert_eq!(MatchTier::classify(0.64), MatchTier::Adjacent);
        assert_eq!(MatchTier::classify(0.65), MatchTier::Peripheral);
        assert_eq!(MatchTier::classify(2.0), MatchTier::Peripheral);
    }

    #[test]
    fn test_tier_serialization() {
        let json = serde_json::to_string(&MatchTier::Semantic).unwrap();
        assert_eq!(json, "\"semantic\"");
    }

    #[test]
    fn test_round3() {
        assert_eq!(round3(0.12345), 0.123);
        assert_eq!(round3(0.9995), 1.0);
        assert_eq!(round3(0.0), 0.0);
    }
}
