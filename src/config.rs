use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::alerts::{AlertChannel, AlertChannels};
use crate::camera::{CameraConstraints, FacingMode};
use crate::event_log::DEFAULT_EVENT_CAPACITY;
use crate::monitor::MonitorSettings;
use crate::overlay::{Viewport, DEFAULT_OVERLAY_CAPACITY};

const DEFAULT_INTERVAL_MS: u64 = 3500;
const DEFAULT_CAMERA_URL: &str = "stub://front_camera";
const DEFAULT_IDEAL_WIDTH: u32 = 1280;
const DEFAULT_IDEAL_HEIGHT: u32 = 720;

#[derive(Debug, Deserialize, Default)]
struct MonitorConfigFile {
    simulation: Option<SimulationConfigFile>,
    capacity: Option<CapacityConfigFile>,
    alerts: Option<AlertsConfigFile>,
    camera: Option<CameraConfigFile>,
    viewport: Option<ViewportConfigFile>,
}

#[derive(Debug, Deserialize, Default)]
struct SimulationConfigFile {
    interval_ms: Option<u64>,
    seed: Option<u64>,
    enabled: Option<bool>,
}

#[derive(Debug, Deserialize, Default)]
struct CapacityConfigFile {
    overlay_boxes: Option<usize>,
    events: Option<usize>,
}

#[derive(Debug, Deserialize, Default)]
struct AlertsConfigFile {
    email: Option<bool>,
    slack: Option<bool>,
    whatsapp: Option<bool>,
}

#[derive(Debug, Deserialize, Default)]
struct CameraConfigFile {
    url: Option<String>,
    ideal_width: Option<u32>,
    ideal_height: Option<u32>,
    facing: Option<FacingMode>,
}

#[derive(Debug, Deserialize, Default)]
struct ViewportConfigFile {
    width: Option<u32>,
    height: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub simulation: SimulationSettings,
    pub overlay_capacity: usize,
    pub event_capacity: usize,
    pub alerts: AlertChannels,
    pub camera: CameraSettings,
    pub viewport: Viewport,
}

#[derive(Debug, Clone)]
pub struct SimulationSettings {
    pub interval: Duration,
    pub seed: Option<u64>,
    pub enabled: bool,
}

#[derive(Debug, Clone)]
pub struct CameraSettings {
    pub url: String,
    pub constraints: CameraConstraints,
}

impl MonitorConfig {
    /// Load from `$MONITOR_CONFIG` (JSON, optional) and apply env overrides.
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("MONITOR_CONFIG").ok();
        let file_cfg = match config_path.as_deref() {
            Some(path) => Some(read_config_file(Path::new(path))?),
            None => None,
        };
        let mut cfg = Self::from_file(file_cfg.unwrap_or_default());
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse a JSON document, then validate. Env is not consulted.
    pub fn from_json(raw: &str) -> Result<Self> {
        let file: MonitorConfigFile =
            serde_json::from_str(raw).map_err(|e| anyhow!("invalid config: {}", e))?;
        let cfg = Self::from_file(file);
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: MonitorConfigFile) -> Self {
        let simulation = file.simulation.unwrap_or_default();
        let capacity = file.capacity.unwrap_or_default();
        let alerts = file.alerts.unwrap_or_default();
        let camera = file.camera.unwrap_or_default();
        let viewport = file.viewport.unwrap_or_default();
        let default_channels = AlertChannels::default();
        let default_viewport = Viewport::default();

        Self {
            simulation: SimulationSettings {
                interval: Duration::from_millis(
                    simulation.interval_ms.unwrap_or(DEFAULT_INTERVAL_MS),
                ),
                seed: simulation.seed,
                enabled: simulation.enabled.unwrap_or(true),
            },
            overlay_capacity: capacity.overlay_boxes.unwrap_or(DEFAULT_OVERLAY_CAPACITY),
            event_capacity: capacity.events.unwrap_or(DEFAULT_EVENT_CAPACITY),
            alerts: AlertChannels {
                email: alerts.email.unwrap_or(default_channels.email),
                slack: alerts.slack.unwrap_or(default_channels.slack),
                whatsapp: alerts.whatsapp.unwrap_or(default_channels.whatsapp),
            },
            camera: CameraSettings {
                url: camera.url.unwrap_or_else(|| DEFAULT_CAMERA_URL.to_string()),
                constraints: CameraConstraints {
                    ideal_width: camera.ideal_width.unwrap_or(DEFAULT_IDEAL_WIDTH),
                    ideal_height: camera.ideal_height.unwrap_or(DEFAULT_IDEAL_HEIGHT),
                    facing: camera.facing.unwrap_or_default(),
                    audio: false,
                },
            },
            viewport: Viewport {
                width: viewport.width.unwrap_or(default_viewport.width),
                height: viewport.height.unwrap_or(default_viewport.height),
            },
        }
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(interval) = std::env::var("MONITOR_INTERVAL_MS") {
            let ms: u64 = interval.parse().map_err(|_| {
                anyhow!("MONITOR_INTERVAL_MS must be an integer number of milliseconds")
            })?;
            self.simulation.interval = Duration::from_millis(ms);
        }
        if let Ok(seed) = std::env::var("MONITOR_SEED") {
            if !seed.trim().is_empty() {
                let seed: u64 = seed
                    .trim()
                    .parse()
                    .map_err(|_| anyhow!("MONITOR_SEED must be an unsigned integer"))?;
                self.simulation.seed = Some(seed);
            }
        }
        if let Ok(url) = std::env::var("MONITOR_CAMERA_URL") {
            if !url.trim().is_empty() {
                self.camera.url = url;
            }
        }
        if let Ok(channels) = std::env::var("MONITOR_ALERT_CHANNELS") {
            self.alerts = parse_channels(&channels)?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.simulation.interval.is_zero() {
            return Err(anyhow!("simulation interval must be greater than zero"));
        }
        if self.overlay_capacity == 0 || self.event_capacity == 0 {
            return Err(anyhow!("overlay and event capacities must be greater than zero"));
        }
        if self.overlay_capacity > self.event_capacity {
            return Err(anyhow!(
                "overlay capacity ({}) must not exceed event capacity ({})",
                self.overlay_capacity,
                self.event_capacity
            ));
        }
        if self.viewport.width == 0 || self.viewport.height == 0 {
            return Err(anyhow!("viewport dimensions must be greater than zero"));
        }
        Ok(())
    }

    pub fn monitor_settings(&self) -> MonitorSettings {
        MonitorSettings {
            interval: self.simulation.interval,
            overlay_capacity: self.overlay_capacity,
            event_capacity: self.event_capacity,
            channels: self.alerts,
            simulate: self.simulation.enabled,
            constraints: self.camera.constraints.clone(),
        }
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self::from_file(MonitorConfigFile::default())
    }
}

/// Parse a CSV of channel names. An empty list disables every channel.
pub fn parse_channels(value: &str) -> Result<AlertChannels> {
    let channels = split_csv(value)
        .iter()
        .map(|name| name.parse::<AlertChannel>())
        .collect::<Result<Vec<_>>>()?;
    Ok(AlertChannels::only(&channels))
}

fn read_config_file(path: &Path) -> Result<MonitorConfigFile> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read config file {}: {}", path.display(), e))?;
    let cfg = serde_json::from_str(&raw)
        .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?;
    Ok(cfg)
}

fn split_csv(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|entry| entry.trim())
        .filter(|entry| !entry.is_empty())
        .map(|entry| entry.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_panel() {
        let cfg = MonitorConfig::default();
        assert_eq!(cfg.simulation.interval, Duration::from_millis(3500));
        assert!(cfg.simulation.enabled);
        assert_eq!(cfg.overlay_capacity, 5);
        assert_eq!(cfg.event_capacity, 50);
        assert_eq!(cfg.alerts, AlertChannels::default());
        assert_eq!(cfg.camera.url, "stub://front_camera");
        assert_eq!(cfg.camera.constraints.facing, FacingMode::User);
    }

    #[test]
    fn rejects_overlay_larger_than_log() {
        let err = MonitorConfig::from_json(r#"{"capacity": {"overlay_boxes": 60}}"#).unwrap_err();
        assert!(err.to_string().contains("overlay capacity"));
    }

    #[test]
    fn rejects_zero_interval() {
        assert!(MonitorConfig::from_json(r#"{"simulation": {"interval_ms": 0}}"#).is_err());
    }

    #[test]
    fn validate_catches_overrides_applied_after_load() {
        let mut cfg = MonitorConfig::default();
        assert!(cfg.validate().is_ok());
        cfg.simulation.interval = Duration::ZERO;
        assert!(cfg.validate().is_err());

        let mut cfg = MonitorConfig::default();
        cfg.overlay_capacity = cfg.event_capacity + 1;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn disabled_simulation_reaches_monitor_settings() {
        let cfg = MonitorConfig::from_json(r#"{"simulation": {"enabled": false}}"#).unwrap();
        assert!(!cfg.simulation.enabled);
        assert!(!cfg.monitor_settings().simulate);
    }

    #[test]
    fn parses_channel_csv() {
        assert_eq!(parse_channels("").unwrap(), AlertChannels::none());
        let channels = parse_channels("whatsapp, email").unwrap();
        assert!(channels.email && channels.whatsapp && !channels.slack);
        assert!(parse_channels("email,pager").is_err());
    }
}
