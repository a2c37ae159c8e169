mod category;
mod result;
mod simulator;

pub use category::DetectionCategory;
pub use result::{Detection, DetectionEvent, OverlayBox};
pub use simulator::{BoxRanges, DetectionSimulator, DetectionSource};
