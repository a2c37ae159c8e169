//! Overlay geometry for the live feed.
//!
//! Pure mapping from normalized boxes to positioned rectangles. Percent
//! geometry is resolution independent; pixel geometry is computed for the
//! viewport passed at render time.

use serde::Serialize;
use uuid::Uuid;

use crate::detect::{DetectionCategory, OverlayBox};

pub const DEFAULT_OVERLAY_CAPACITY: usize = 5;

/// Container size in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        // 16:9 feed
        Self {
            width: 1280,
            height: 720,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }
}

/// A positioned, labelled rectangle ready for display.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OverlayRect {
    pub id: Uuid,
    pub category: DetectionCategory,
    pub label: &'static str,
    pub style: &'static str,
    /// Geometry in percent of the container (0..100).
    pub percent: Rect,
    /// Geometry in pixels for the viewport used at render time.
    pub pixels: Rect,
}

impl OverlayRect {
    /// True when the rectangle extends past the right or bottom edge.
    pub fn overflows(&self) -> bool {
        self.percent.right() > 100.0 || self.percent.bottom() > 100.0
    }
}

pub fn render_box(overlay: &OverlayBox, viewport: Viewport) -> OverlayRect {
    let vw = viewport.width as f32;
    let vh = viewport.height as f32;
    OverlayRect {
        id: overlay.id,
        category: overlay.category,
        label: overlay.category.label(),
        style: overlay.category.style(),
        percent: Rect {
            left: overlay.x * 100.0,
            top: overlay.y * 100.0,
            width: overlay.width * 100.0,
            height: overlay.height * 100.0,
        },
        pixels: Rect {
            left: overlay.x * vw,
            top: overlay.y * vh,
            width: overlay.width * vw,
            height: overlay.height * vh,
        },
    }
}

/// Render boxes in the order given (newest first for monitor output).
pub fn render<'a, I>(boxes: I, viewport: Viewport) -> Vec<OverlayRect>
where
    I: IntoIterator<Item = &'a OverlayBox>,
{
    boxes
        .into_iter()
        .map(|overlay| render_box(overlay, viewport))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_box(x: f32, y: f32, width: f32, height: f32) -> OverlayBox {
        OverlayBox {
            id: Uuid::from_u128(1),
            x,
            y,
            width,
            height,
            category: DetectionCategory::MissingVest,
        }
    }

    #[test]
    fn scales_to_percent_and_pixels() {
        let rect = render_box(
            &sample_box(0.25, 0.5, 0.25, 0.25),
            Viewport {
                width: 800,
                height: 400,
            },
        );
        assert_eq!(rect.percent.left, 25.0);
        assert_eq!(rect.percent.top, 50.0);
        assert_eq!(rect.pixels.left, 200.0);
        assert_eq!(rect.pixels.top, 200.0);
        assert_eq!(rect.pixels.width, 200.0);
        assert_eq!(rect.pixels.height, 100.0);
        assert_eq!(rect.label, "Missing Vest");
        assert_eq!(rect.style, "brand");
        assert!(!rect.overflows());
    }

    #[test]
    fn unclamped_boxes_are_reported_as_overflowing() {
        let overlay = sample_box(0.69, 0.1, 0.34, 0.3);
        assert!(overlay.exceeds_bounds());
        let rect = render_box(&overlay, Viewport::default());
        assert!(rect.overflows());
        assert!(rect.pixels.right() > 1280.0);
    }

    #[test]
    fn render_preserves_order() {
        let a = sample_box(0.0, 0.0, 0.25, 0.25);
        let mut b = sample_box(0.5, 0.5, 0.25, 0.25);
        b.id = Uuid::from_u128(2);
        let rects = render([&b, &a], Viewport::default());
        assert_eq!(rects.len(), 2);
        assert_eq!(rects[0].id, Uuid::from_u128(2));
        assert_eq!(rects[1].id, Uuid::from_u128(1));
    }
}
