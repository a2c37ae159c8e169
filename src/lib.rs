//! Safety Monitor
//!
//! Simulated live-monitor panel for a PPE safety product demo. There is no
//! detection model: a seeded random simulator produces fake detections on a
//! fixed interval and the panel keeps bounded display state for them.
//!
//! # Module Structure
//!
//! - `detect`: detection categories, boxes/events, the random simulator
//! - `buffer`: bounded most-recent-first list shared by boxes and events
//! - `event_log`: rolling event history with per-category counts
//! - `overlay`: normalized box → positioned rectangle mapping
//! - `alerts`: channel toggles and notification text
//! - `scheduler`: fixed-interval tick scheduler driven by explicit instants
//! - `camera`: optional camera stream with classified failures
//! - `monitor`: the panel controller owning all of the above
//! - `incidents`: dashboard table/chart data
//! - `config`: JSON + env configuration

pub mod alerts;
pub mod buffer;
pub mod camera;
pub mod config;
pub mod detect;
pub mod event_log;
pub mod incidents;
pub mod monitor;
pub mod notify;
pub mod overlay;
pub mod scheduler;
pub mod ui;

pub use alerts::{AlertChannel, AlertChannels, Notification, NO_CHANNEL};
pub use buffer::RecentBuffer;
pub use camera::{
    CameraConstraints, CameraDevice, CameraError, CameraStatus, CameraStream, StubCamera,
};
pub use config::MonitorConfig;
pub use detect::{
    BoxRanges, Detection, DetectionCategory, DetectionEvent, DetectionSimulator, DetectionSource,
    OverlayBox,
};
pub use event_log::{CategoryCount, EventLog};
pub use monitor::{LiveMonitor, MonitorSettings, MonitorSnapshot};
pub use notify::{LogSink, NotificationSink, RecordingSink};
pub use overlay::{OverlayRect, Viewport};
pub use scheduler::IntervalScheduler;
