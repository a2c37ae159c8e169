use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::category::DetectionCategory;

/// A simulated detection recorded in the event log. Immutable once created.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetectionEvent {
    pub id: Uuid,
    pub category: DetectionCategory,
    pub timestamp: DateTime<Utc>,
}

/// Bounding box (normalized 0..1 coordinates) shown on the live feed.
///
/// Position and size are drawn independently, so `x + width` may exceed 1.0.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OverlayBox {
    pub id: Uuid,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub category: DetectionCategory,
}

impl OverlayBox {
    /// True when the box extends past the right or bottom edge.
    pub fn exceeds_bounds(&self) -> bool {
        self.x + self.width > 1.0 || self.y + self.height > 1.0
    }
}

/// Output of one simulator firing: the box and its matching event share an id.
#[derive(Clone, Debug, PartialEq)]
pub struct Detection {
    pub overlay: OverlayBox,
    pub event: DetectionEvent,
}

impl Detection {
    pub fn id(&self) -> Uuid {
        self.event.id
    }

    pub fn category(&self) -> DetectionCategory {
        self.event.category
    }
}
