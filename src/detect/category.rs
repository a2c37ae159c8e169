use serde::{Deserialize, Serialize};
use std::fmt;

/// Simulated PPE detection categories.
///
/// The set is fixed; the simulator draws uniformly from [`DetectionCategory::ALL`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionCategory {
    MissingHelmet,
    MissingVest,
    ZoneViolation,
}

impl DetectionCategory {
    pub const ALL: [DetectionCategory; 3] = [
        DetectionCategory::MissingHelmet,
        DetectionCategory::MissingVest,
        DetectionCategory::ZoneViolation,
    ];

    /// Human-readable label shown on overlays and notification titles.
    pub fn label(self) -> &'static str {
        match self {
            DetectionCategory::MissingHelmet => "Missing Helmet",
            DetectionCategory::MissingVest => "Missing Vest",
            DetectionCategory::ZoneViolation => "Zone Violation",
        }
    }

    /// Short name used by the incidents-by-type chart.
    pub fn short_name(self) -> &'static str {
        match self {
            DetectionCategory::MissingHelmet => "Helmet",
            DetectionCategory::MissingVest => "Vest",
            DetectionCategory::ZoneViolation => "Zone",
        }
    }

    /// Border style tag used by the overlay layer.
    pub fn style(self) -> &'static str {
        match self {
            DetectionCategory::MissingHelmet => "destructive",
            DetectionCategory::MissingVest => "brand",
            DetectionCategory::ZoneViolation => "primary",
        }
    }

    /// Wire identifier (`missing_helmet`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            DetectionCategory::MissingHelmet => "missing_helmet",
            DetectionCategory::MissingVest => "missing_vest",
            DetectionCategory::ZoneViolation => "zone_violation",
        }
    }
}

impl fmt::Display for DetectionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_distinct() {
        let labels: Vec<_> = DetectionCategory::ALL.iter().map(|c| c.label()).collect();
        assert_eq!(labels, vec!["Missing Helmet", "Missing Vest", "Zone Violation"]);
    }

    #[test]
    fn serializes_as_snake_case() {
        let json = serde_json::to_string(&DetectionCategory::ZoneViolation).unwrap();
        assert_eq!(json, "\"zone_violation\"");
        assert_eq!(DetectionCategory::ZoneViolation.as_str(), "zone_violation");
    }
}
