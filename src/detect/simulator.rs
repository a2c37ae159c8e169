use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::ops::Range;
use uuid::{Builder, Uuid};

use super::category::DetectionCategory;
use super::result::{Detection, DetectionEvent, OverlayBox};

/// Source of detections for the live monitor.
///
/// The monitor calls `next_detection` once per scheduler firing and never
/// re-enters it; implementations own whatever state they need.
pub trait DetectionSource: Send {
    /// Source identifier.
    fn name(&self) -> &'static str;

    /// Produce the detection for a firing at `at`.
    fn next_detection(&mut self, at: DateTime<Utc>) -> Detection;
}

/// Sampling ranges for synthetic boxes (half-open, normalized).
#[derive(Clone, Debug, PartialEq)]
pub struct BoxRanges {
    pub x: Range<f32>,
    pub y: Range<f32>,
    pub width: Range<f32>,
    pub height: Range<f32>,
}

impl Default for BoxRanges {
    fn default() -> Self {
        Self {
            x: 0.0..0.7,
            y: 0.0..0.6,
            width: 0.20..0.35,
            height: 0.25..0.40,
        }
    }
}

/// Random detection generator.
///
/// Every draw comes from the injected RNG, including the event id, so a
/// seeded simulator replays the same sequence.
pub struct DetectionSimulator<R: Rng + Send = StdRng> {
    rng: R,
    ranges: BoxRanges,
    generated: u64,
}

impl DetectionSimulator<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng + Send> DetectionSimulator<R> {
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            ranges: BoxRanges::default(),
            generated: 0,
        }
    }

    pub fn with_ranges(mut self, ranges: BoxRanges) -> Self {
        self.ranges = ranges;
        self
    }

    pub fn ranges(&self) -> &BoxRanges {
        &self.ranges
    }

    /// Number of detections produced so far.
    pub fn generated(&self) -> u64 {
        self.generated
    }

    fn sample(&mut self, range: &Range<f32>) -> f32 {
        // gen_range panics on an empty range; a degenerate range pins the value.
        if range.start >= range.end {
            return range.start;
        }
        self.rng.gen_range(range.clone())
    }

    fn random_category(&mut self) -> DetectionCategory {
        let idx = self.rng.gen_range(0..DetectionCategory::ALL.len());
        DetectionCategory::ALL[idx]
    }

    fn random_id(&mut self) -> Uuid {
        Builder::from_random_bytes(self.rng.gen()).into_uuid()
    }
}

impl<R: Rng + Send> DetectionSource for DetectionSimulator<R> {
    fn name(&self) -> &'static str {
        "simulator"
    }

    fn next_detection(&mut self, at: DateTime<Utc>) -> Detection {
        let category = self.random_category();
        let ranges = self.ranges.clone();
        let x = self.sample(&ranges.x);
        let y = self.sample(&ranges.y);
        let width = self.sample(&ranges.width);
        let height = self.sample(&ranges.height);
        let id = self.random_id();
        self.generated += 1;

        log::debug!("simulator: {} at ({:.2}, {:.2})", category.as_str(), x, y);

        Detection {
            overlay: OverlayBox {
                id,
                x,
                y,
                width,
                height,
                category,
            },
            event: DetectionEvent {
                id,
                category,
                timestamp: at,
            },
        }
    }
}
