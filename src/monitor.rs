//! Live monitor panel controller.
//!
//! Owns every piece of panel state:
//! - the detection source and its interval scheduler
//! - the short overlay box list and the longer event log
//! - alert channel toggles and the notification sink
//! - the optional camera stream
//!
//! All mutation goes through `&mut self`, so ticks and user toggles are
//! serialized by construction. Consumers read state through accessors.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::{Duration, Instant};

use crate::alerts::{AlertChannel, AlertChannels, Notification};
use crate::buffer::RecentBuffer;
use crate::camera::{CameraConstraints, CameraDevice, CameraStatus, CameraStream};
use crate::config::MonitorConfig;
use crate::detect::{Detection, DetectionSimulator, DetectionSource, OverlayBox};
use crate::event_log::{CategoryCount, EventLog, DEFAULT_EVENT_CAPACITY};
use crate::notify::{LogSink, NotificationSink};
use crate::overlay::{self, OverlayRect, Viewport, DEFAULT_OVERLAY_CAPACITY};
use crate::scheduler::{IntervalScheduler, DEFAULT_INTERVAL};

/// Construction parameters for [`LiveMonitor`].
#[derive(Clone, Debug)]
pub struct MonitorSettings {
    pub interval: Duration,
    pub overlay_capacity: usize,
    pub event_capacity: usize,
    pub channels: AlertChannels,
    pub simulate: bool,
    pub constraints: CameraConstraints,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            overlay_capacity: DEFAULT_OVERLAY_CAPACITY,
            event_capacity: DEFAULT_EVENT_CAPACITY,
            channels: AlertChannels::default(),
            simulate: true,
            constraints: CameraConstraints::default(),
        }
    }
}

pub struct LiveMonitor {
    source: Box<dyn DetectionSource>,
    scheduler: IntervalScheduler,
    simulate: bool,
    boxes: RecentBuffer<OverlayBox>,
    events: EventLog,
    channels: AlertChannels,
    sink: Box<dyn NotificationSink>,
    camera: Option<Box<dyn CameraDevice>>,
    constraints: CameraConstraints,
    stream: Option<CameraStream>,
    camera_status: CameraStatus,
}

impl LiveMonitor {
    pub fn new<S: DetectionSource + 'static>(source: S, settings: MonitorSettings) -> Self {
        Self {
            source: Box::new(source),
            scheduler: IntervalScheduler::new(settings.interval),
            simulate: settings.simulate,
            boxes: RecentBuffer::new(settings.overlay_capacity),
            events: EventLog::new(settings.event_capacity),
            channels: settings.channels,
            sink: Box::new(LogSink),
            camera: None,
            constraints: settings.constraints,
            stream: None,
            camera_status: CameraStatus::Idle,
        }
    }

    /// Build a monitor with a random simulator and camera device from config.
    pub fn from_config(cfg: &MonitorConfig) -> Result<Self> {
        let simulator = match cfg.simulation.seed {
            Some(seed) => DetectionSimulator::seeded(seed),
            None => DetectionSimulator::from_entropy(),
        };
        let camera = crate::camera::open_device(&cfg.camera.url)?;
        Ok(Self::new(simulator, cfg.monitor_settings()).with_camera_device(camera))
    }

    pub fn with_sink<N: NotificationSink + 'static>(mut self, sink: N) -> Self {
        self.sink = Box::new(sink);
        self
    }

    pub fn with_camera<C: CameraDevice + 'static>(self, camera: C) -> Self {
        self.with_camera_device(Box::new(camera))
    }

    pub fn with_camera_device(mut self, camera: Box<dyn CameraDevice>) -> Self {
        self.camera = Some(camera);
        self
    }

    // ---------------------------------------------------------------------
    // Lifecycle
    // ---------------------------------------------------------------------

    /// Mount the panel: acquire the camera (best effort) and start the
    /// scheduler if simulation is enabled.
    pub fn activate(&mut self, now: Instant) {
        self.acquire_camera();
        if self.simulate {
            self.scheduler.start(now);
            log::info!(
                "live monitor: simulating via {} every {}ms",
                self.source.name(),
                self.scheduler.interval().as_millis()
            );
        }
    }

    /// Tear down: stop simulating and release the camera stream.
    ///
    /// Simulation stays off until re-enabled with [`LiveMonitor::set_simulate`].
    pub fn shutdown(&mut self) {
        if self.simulate {
            log::info!("live monitor: simulation stopped on teardown");
        }
        self.simulate = false;
        self.scheduler.stop();
        self.release_camera();
    }

    // ---------------------------------------------------------------------
    // Simulation
    // ---------------------------------------------------------------------

    pub fn is_simulating(&self) -> bool {
        self.simulate
    }

    /// Enable or disable the simulator. Enabling restarts the interval from `now`.
    pub fn set_simulate(&mut self, enabled: bool, now: Instant) {
        if enabled == self.simulate && enabled == self.scheduler.is_running() {
            return;
        }
        self.simulate = enabled;
        if enabled {
            self.scheduler.start(now);
            log::info!("live monitor: simulation enabled");
        } else {
            self.scheduler.stop();
            log::info!("live monitor: simulation disabled");
        }
    }

    /// Fire a tick if the interval has elapsed at `now`.
    pub fn poll(&mut self, now: Instant) -> Option<Detection> {
        if self.simulate && self.scheduler.poll(now) {
            self.tick_at(Utc::now())
        } else {
            None
        }
    }

    /// Time until the next scheduled tick, `None` when not simulating.
    pub fn time_until_next_tick(&self, now: Instant) -> Option<Duration> {
        self.scheduler.time_until_due(now)
    }

    /// Run one firing immediately, timestamped now.
    pub fn tick(&mut self) -> Option<Detection> {
        self.tick_at(Utc::now())
    }

    /// Run one firing immediately with an explicit timestamp.
    ///
    /// Does nothing while simulation is disabled.
    pub fn tick_at(&mut self, at: DateTime<Utc>) -> Option<Detection> {
        if !self.simulate {
            return None;
        }
        let detection = self.source.next_detection(at);
        self.boxes.push(detection.overlay.clone());
        self.events.record(detection.event.clone());

        let notification = Notification::for_detection(detection.category(), &self.channels);
        self.sink.notify(&notification);
        Some(detection)
    }

    // ---------------------------------------------------------------------
    // Alert channels
    // ---------------------------------------------------------------------

    pub fn channels(&self) -> AlertChannels {
        self.channels
    }

    pub fn toggle_channel(&mut self, channel: AlertChannel) -> bool {
        self.channels.toggle(channel)
    }

    pub fn set_channel(&mut self, channel: AlertChannel, enabled: bool) {
        self.channels.set(channel, enabled);
    }

    // ---------------------------------------------------------------------
    // Read accessors
    // ---------------------------------------------------------------------

    /// Overlay boxes, newest first.
    pub fn boxes(&self) -> impl Iterator<Item = &OverlayBox> + '_ {
        self.boxes.iter()
    }

    pub fn box_count(&self) -> usize {
        self.boxes.len()
    }

    pub fn event_log(&self) -> &EventLog {
        &self.events
    }

    pub fn overlay(&self, viewport: Viewport) -> Vec<OverlayRect> {
        overlay::render(self.boxes.iter(), viewport)
    }

    // ---------------------------------------------------------------------
    // Camera
    // ---------------------------------------------------------------------

    pub fn camera_status(&self) -> &CameraStatus {
        &self.camera_status
    }

    pub fn is_camera_ready(&self) -> bool {
        self.stream.as_ref().is_some_and(CameraStream::is_live)
    }

    /// Explicit user retry after a failed acquisition.
    pub fn retry_camera(&mut self) -> &CameraStatus {
        self.release_camera();
        self.acquire_camera();
        &self.camera_status
    }

    fn acquire_camera(&mut self) {
        if self.stream.is_some() {
            return;
        }
        let Some(camera) = self.camera.as_mut() else {
            return;
        };
        match camera.acquire(&self.constraints) {
            Ok(stream) => {
                let (width, height) = stream.resolution();
                self.camera_status = CameraStatus::Ready {
                    device: stream.device().to_string(),
                    width,
                    height,
                };
                self.stream = Some(stream);
            }
            Err(err) => {
                log::warn!(
                    "camera unavailable on {} ({}), falling back to demo mode",
                    camera.name(),
                    err
                );
                self.camera_status = CameraStatus::Unavailable(err);
            }
        }
    }

    fn release_camera(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.stop();
            self.camera_status = CameraStatus::Idle;
        }
    }

    // ---------------------------------------------------------------------
    // Snapshot
    // ---------------------------------------------------------------------

    pub fn snapshot(&self, viewport: Viewport) -> MonitorSnapshot {
        MonitorSnapshot {
            simulating: self.simulate,
            camera_ready: self.is_camera_ready(),
            placeholder: self.camera_status.placeholder(),
            channels: self.channels,
            channel_summary: self.channels.summary(),
            overlay: self.overlay(viewport),
            events: self
                .events
                .events()
                .map(|event| EventSnapshot {
                    id: event.id.to_string(),
                    category: event.category.as_str(),
                    label: event.category.label(),
                    timestamp: event.timestamp,
                })
                .collect(),
            counts: self.events.category_counts(),
        }
    }
}

impl Drop for LiveMonitor {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Serializable view of the panel state.
#[derive(Clone, Debug, Serialize)]
pub struct MonitorSnapshot {
    pub simulating: bool,
    pub camera_ready: bool,
    pub placeholder: Option<String>,
    pub channels: AlertChannels,
    pub channel_summary: String,
    pub overlay: Vec<OverlayRect>,
    pub events: Vec<EventSnapshot>,
    pub counts: Vec<CategoryCount>,
}

#[derive(Clone, Debug, Serialize)]
pub struct EventSnapshot {
    pub id: String,
    pub category: &'static str,
    pub label: &'static str,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::{CameraError, StubCamera};
    use crate::detect::DetectionCategory;
    use crate::notify::RecordingSink;
    use std::sync::atomic::Ordering;

    fn monitor(seed: u64) -> (LiveMonitor, RecordingSink) {
        let sink = RecordingSink::new();
        let m = LiveMonitor::new(DetectionSimulator::seeded(seed), MonitorSettings::default())
            .with_sink(sink.clone());
        (m, sink)
    }

    #[test]
    fn tick_feeds_boxes_events_and_sink() {
        let (mut m, sink) = monitor(1);
        let d = m.tick().expect("simulating by default");
        assert_eq!(m.box_count(), 1);
        assert_eq!(m.event_log().len(), 1);
        assert_eq!(m.event_log().latest().unwrap().id, d.id());
        assert_eq!(m.boxes().next().unwrap().id, d.id());
        assert_eq!(sink.len(), 1);
        assert_eq!(sink.last().unwrap().body, "Email, Slack");
    }

    #[test]
    fn poll_follows_interval() {
        let (mut m, _sink) = monitor(2);
        let t0 = Instant::now();
        m.activate(t0);
        assert!(m.poll(t0 + Duration::from_millis(3499)).is_none());
        assert!(m.poll(t0 + Duration::from_millis(3500)).is_some());
        assert!(m.poll(t0 + Duration::from_millis(3600)).is_none());
        assert!(m.poll(t0 + Duration::from_millis(7000)).is_some());
        assert_eq!(m.event_log().len(), 2);
    }

    #[test]
    fn disabled_simulation_generates_nothing() {
        let (mut m, sink) = monitor(3);
        let t0 = Instant::now();
        m.activate(t0);
        m.set_simulate(false, t0);
        assert!(m.tick().is_none());
        assert!(m.poll(t0 + Duration::from_secs(60)).is_none());
        assert!(m.event_log().is_empty());
        assert!(sink.is_empty());
        assert_eq!(m.time_until_next_tick(t0), None);

        let t1 = t0 + Duration::from_secs(61);
        m.set_simulate(true, t1);
        assert!(m.poll(t1 + Duration::from_millis(3499)).is_none());
        assert!(m.poll(t1 + Duration::from_millis(3500)).is_some());
    }

    #[test]
    fn camera_failure_keeps_simulating() {
        let (m, _sink) = monitor(4);
        let mut m = m.with_camera(StubCamera::failing("front", CameraError::PermissionDenied));
        m.activate(Instant::now());
        assert_eq!(
            m.camera_status(),
            &CameraStatus::Unavailable(CameraError::PermissionDenied)
        );
        assert!(!m.is_camera_ready());
        assert!(m.tick().is_some());
    }

    #[test]
    fn shutdown_releases_camera() {
        let camera = StubCamera::new("front");
        let active = camera.active_tracks();
        let (m, _sink) = monitor(5);
        let mut m = m.with_camera(camera);
        m.activate(Instant::now());
        assert!(m.is_camera_ready());
        assert_eq!(active.load(Ordering::SeqCst), 1);
        drop(m);
        assert_eq!(active.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn snapshot_reflects_state() {
        let (mut m, _sink) = monitor(6);
        m.tick();
        m.set_channel(AlertChannel::Email, false);
        let snap = m.snapshot(Viewport::default());
        assert!(snap.simulating);
        assert_eq!(snap.channel_summary, "Slack");
        assert_eq!(snap.overlay.len(), 1);
        assert_eq!(snap.events.len(), 1);
        let total: usize = snap.counts.iter().map(|c| c.count).sum();
        assert_eq!(total, 1);
        assert!(snap.placeholder.is_some());
        assert!(DetectionCategory::ALL
            .iter()
            .any(|c| c.as_str() == snap.events[0].category));
    }
}
