//! Optional camera stream for the live feed.
//!
//! The camera is cosmetic: detections are simulated whether or not a stream
//! is available. Acquisition is best effort, never retried automatically, and
//! the stream stops all of its tracks when dropped.
//!
//! Supported device URLs:
//! - `stub://<name>`: synthetic device that always grants a stream
//! - `denied://<name>`: synthetic device that refuses permission
//! - `none://`: no device present

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use thiserror::Error;

pub const PLACEHOLDER_MESSAGE: &str = "Connect a camera to view live feed. Demo overlays shown.";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacingMode {
    /// Front-facing camera.
    #[default]
    User,
    Environment,
}

/// Capability request sent to the device.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraConstraints {
    pub ideal_width: u32,
    pub ideal_height: u32,
    pub facing: FacingMode,
    pub audio: bool,
}

impl Default for CameraConstraints {
    fn default() -> Self {
        Self {
            ideal_width: 1280,
            ideal_height: 720,
            facing: FacingMode::User,
            audio: false,
        }
    }
}

/// Classified acquisition failure.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CameraError {
    #[error("camera permission denied")]
    PermissionDenied,
    #[error("no camera device found")]
    NotFound,
    #[error("camera error: {0}")]
    Other(String),
}

impl CameraError {
    /// User-facing guidance for each failure class.
    pub fn guidance(&self) -> &'static str {
        match self {
            CameraError::PermissionDenied => {
                "Camera access was blocked. Allow camera permission in your browser settings and retry."
            }
            CameraError::NotFound => "No camera was found. Connect a camera and retry.",
            CameraError::Other(_) => {
                "The camera could not be started. Close other apps using it and retry."
            }
        }
    }
}

/// Live tracks held by an acquired stream.
#[derive(Debug)]
struct Tracks {
    active: Arc<AtomicUsize>,
    count: usize,
}

/// Acquired camera stream. Dropping it stops every track.
#[derive(Debug)]
pub struct CameraStream {
    device: String,
    width: u32,
    height: u32,
    tracks: Option<Tracks>,
}

impl CameraStream {
    /// Build a stream; `active` is incremented by `track_count` and released on drop.
    pub fn new(
        device: &str,
        width: u32,
        height: u32,
        track_count: usize,
        active: Arc<AtomicUsize>,
    ) -> Self {
        active.fetch_add(track_count, Ordering::SeqCst);
        Self {
            device: device.to_string(),
            width,
            height,
            tracks: Some(Tracks {
                active,
                count: track_count,
            }),
        }
    }

    pub fn device(&self) -> &str {
        &self.device
    }

    pub fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn is_live(&self) -> bool {
        self.tracks.is_some()
    }

    /// Stop every track. Idempotent.
    pub fn stop(&mut self) {
        if let Some(tracks) = self.tracks.take() {
            tracks.active.fetch_sub(tracks.count, Ordering::SeqCst);
            log::info!("camera: stopped {} track(s) on {}", tracks.count, self.device);
        }
    }
}

impl Drop for CameraStream {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Camera device seam.
pub trait CameraDevice: Send {
    fn name(&self) -> &str;

    fn acquire(&mut self, constraints: &CameraConstraints) -> Result<CameraStream, CameraError>;
}

/// Synthetic device. Grants the ideal resolution and tracks live tracks so
/// callers can observe release.
#[derive(Debug)]
pub struct StubCamera {
    name: String,
    active_tracks: Arc<AtomicUsize>,
    failure: Option<CameraError>,
}

impl StubCamera {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            active_tracks: Arc::new(AtomicUsize::new(0)),
            failure: None,
        }
    }

    /// Device that fails every acquisition with `error`.
    pub fn failing(name: &str, error: CameraError) -> Self {
        Self {
            failure: Some(error),
            ..Self::new(name)
        }
    }

    /// Shared counter of tracks currently held by streams from this device.
    pub fn active_tracks(&self) -> Arc<AtomicUsize> {
        self.active_tracks.clone()
    }

    /// Make subsequent acquisitions succeed (or fail with `error`).
    pub fn set_failure(&mut self, error: Option<CameraError>) {
        self.failure = error;
    }
}

impl CameraDevice for StubCamera {
    fn name(&self) -> &str {
        &self.name
    }

    fn acquire(&mut self, constraints: &CameraConstraints) -> Result<CameraStream, CameraError> {
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        let tracks = if constraints.audio { 2 } else { 1 };
        log::info!(
            "camera: connected to {} (synthetic) {}x{}",
            self.name,
            constraints.ideal_width,
            constraints.ideal_height
        );
        Ok(CameraStream::new(
            &self.name,
            constraints.ideal_width,
            constraints.ideal_height,
            tracks,
            self.active_tracks.clone(),
        ))
    }
}

/// Open a device from a URL.
pub fn open_device(url: &str) -> Result<Box<dyn CameraDevice>> {
    if let Some(name) = url.strip_prefix("stub://") {
        Ok(Box::new(StubCamera::new(name)))
    } else if let Some(name) = url.strip_prefix("denied://") {
        Ok(Box::new(StubCamera::failing(name, CameraError::PermissionDenied)))
    } else if url.starts_with("none://") {
        Ok(Box::new(StubCamera::failing("none", CameraError::NotFound)))
    } else {
        Err(anyhow!(
            "unsupported camera url '{}' (expected stub://, denied:// or none://)",
            url
        ))
    }
}

/// Camera availability as seen by the panel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CameraStatus {
    /// Acquisition not attempted yet.
    Idle,
    Ready { device: String, width: u32, height: u32 },
    Unavailable(CameraError),
}

impl CameraStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, CameraStatus::Ready { .. })
    }

    /// Text shown in place of the video when there is no stream.
    pub fn placeholder(&self) -> Option<String> {
        match self {
            CameraStatus::Ready { .. } => None,
            CameraStatus::Idle => Some(PLACEHOLDER_MESSAGE.to_string()),
            CameraStatus::Unavailable(err) => {
                Some(format!("{} {}", PLACEHOLDER_MESSAGE, err.guidance()))
            }
        }
    }
}
