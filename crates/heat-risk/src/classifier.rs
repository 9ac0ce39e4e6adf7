//! Heat risk classification
//!
//! Linear buckets of width 10 over the raw sampled value, clamped to
//! five levels (0 = lowest, 4 = highest).

use serde::{Deserialize, Serialize};

/// Bucket width in raw provider units
pub const BUCKET_WIDTH: f64 = 10.0;

/// Highest level; everything above its threshold clamps here
pub const MAX_LEVEL: u8 = 4;

/// Ordinal risk level 0..=4
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RiskLevel(u8);

impl RiskLevel {
    pub const MIN: RiskLevel = RiskLevel(0);
    pub const MAX: RiskLevel = RiskLevel(MAX_LEVEL);

    /// Level for an already-ordinal value, clamped into range
    pub fn from_ordinal(level: u8) -> Self {
        RiskLevel(level.min(MAX_LEVEL))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn info(self) -> &'static LevelInfo {
        &LEVELS[self.0 as usize]
    }
}

/// `min(floor(value / 10), 4)`. Negative and NaN inputs map to level 0.
pub fn classify(value: f64) -> RiskLevel {
    if value.is_nan() {
        return RiskLevel::MIN;
    }
    let bucket = (value / BUCKET_WIDTH).floor().clamp(0.0, MAX_LEVEL as f64);
    RiskLevel(bucket as u8)
}

/// Display metadata for a level
#[derive(Debug, Clone, Serialize)]
pub struct LevelInfo {
    pub level: u8,
    pub description: &'static str,
    /// Fill color as `#RRGGBB`
    pub color: &'static str,
    pub opacity: f64,
}

pub static LEVELS: [LevelInfo; 5] = [
    LevelInfo { level: 0, description: "Little to no heat risk", color: "#FFFFFF", opacity: 0.1 },
    LevelInfo { level: 1, description: "Mild heat - Caution", color: "#FFFF00", opacity: 0.3 },
    LevelInfo { level: 2, description: "Moderate heat - Extreme Caution", color: "#FFA500", opacity: 0.5 },
    LevelInfo { level: 3, description: "High heat - Danger", color: "#FF4500", opacity: 0.7 },
    LevelInfo { level: 4, description: "Extreme heat - Extreme Danger", color: "#FF0000", opacity: 0.8 },
];

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_reference_values() {
        assert_eq!(classify(5.0).value(), 0);
        assert_eq!(classify(39.9).value(), 3);
        assert_eq!(classify(55.0).value(), 4);
        assert_eq!(classify(1000.0).value(), 4);
    }

    #[test]
    fn test_bucket_edges() {
        assert_eq!(classify(0.0).value(), 0);
        assert_eq!(classify(9.999).value(), 0);
        assert_eq!(classify(10.0).value(), 1);
        assert_eq!(classify(20.0).value(), 2);
        assert_eq!(classify(40.0).value(), 4);
    }

    #[test]
    fn test_out_of_domain_inputs() {
        assert_eq!(classify(-12.0), RiskLevel::MIN);
        assert_eq!(classify(f64::NAN), RiskLevel::MIN);
        assert_eq!(classify(f64::INFINITY), RiskLevel::MAX);
    }

    #[test]
    fn test_level_info_lookup() {
        let info = classify(33.0).info();
        assert_eq!(info.level, 3);
        assert_eq!(info.description, "High heat - Danger");
        assert_eq!(RiskLevel::from_ordinal(9), RiskLevel::MAX);
    }

    #[test]
    fn test_serializes_as_number() {
        assert_eq!(serde_json::to_string(&classify(21.0)).unwrap(), "2");
    }

    proptest! {
        #[test]
        fn prop_matches_clamped_floor(v in 0.0f64..10_000.0) {
            let expected = ((v / 10.0).floor() as u64).min(4) as u8;
            prop_assert_eq!(classify(v).value(), expected);
        }

        #[test]
        fn prop_monotonic(a in 0.0f64..200.0, b in 0.0f64..200.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(classify(lo) <= classify(hi));
        }
    }
}
