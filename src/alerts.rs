//! Alert channel toggles and notification formatting.
//!
//! Channels are cosmetic: they only change the notification text. Nothing is
//! delivered anywhere.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::detect::DetectionCategory;

pub const NO_CHANNEL: &str = "no channel";
pub const DEMO_DISCLAIMER: &str = "This is a front-end demo. Connect a backend and a detection API to send real alerts and store incidents.";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertChannel {
    Email,
    Slack,
    WhatsApp,
}

impl AlertChannel {
    /// Display order used when joining channel names.
    pub const ALL: [AlertChannel; 3] = [
        AlertChannel::Email,
        AlertChannel::Slack,
        AlertChannel::WhatsApp,
    ];

    pub fn name(self) -> &'static str {
        match self {
            AlertChannel::Email => "Email",
            AlertChannel::Slack => "Slack",
            AlertChannel::WhatsApp => "WhatsApp",
        }
    }
}

impl fmt::Display for AlertChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AlertChannel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "email" => Ok(AlertChannel::Email),
            "slack" => Ok(AlertChannel::Slack),
            "whatsapp" => Ok(AlertChannel::WhatsApp),
            other => Err(anyhow!("unknown alert channel '{}'", other)),
        }
    }
}

/// Three independent channel flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertChannels {
    pub email: bool,
    pub slack: bool,
    pub whatsapp: bool,
}

impl Default for AlertChannels {
    fn default() -> Self {
        Self {
            email: true,
            slack: true,
            whatsapp: false,
        }
    }
}

impl AlertChannels {
    pub fn none() -> Self {
        Self {
            email: false,
            slack: false,
            whatsapp: false,
        }
    }

    /// Enable exactly the listed channels.
    pub fn only(channels: &[AlertChannel]) -> Self {
        let mut state = Self::none();
        for &channel in channels {
            state.set(channel, true);
        }
        state
    }

    fn flag_mut(&mut self, channel: AlertChannel) -> &mut bool {
        match channel {
            AlertChannel::Email => &mut self.email,
            AlertChannel::Slack => &mut self.slack,
            AlertChannel::WhatsApp => &mut self.whatsapp,
        }
    }

    pub fn is_enabled(&self, channel: AlertChannel) -> bool {
        match channel {
            AlertChannel::Email => self.email,
            AlertChannel::Slack => self.slack,
            AlertChannel::WhatsApp => self.whatsapp,
        }
    }

    pub fn set(&mut self, channel: AlertChannel, enabled: bool) {
        *self.flag_mut(channel) = enabled;
    }

    /// Flip one channel; returns its new state.
    pub fn toggle(&mut self, channel: AlertChannel) -> bool {
        let flag = self.flag_mut(channel);
        *flag = !*flag;
        *flag
    }

    pub fn enabled(&self) -> Vec<AlertChannel> {
        AlertChannel::ALL
            .into_iter()
            .filter(|&channel| self.is_enabled(channel))
            .collect()
    }

    pub fn enabled_names(&self) -> Vec<&'static str> {
        self.enabled().into_iter().map(AlertChannel::name).collect()
    }

    /// Comma-joined enabled channel names, or `"no channel"`.
    pub fn summary(&self) -> String {
        let names = self.enabled_names();
        if names.is_empty() {
            NO_CHANNEL.to_string()
        } else {
            names.join(", ")
        }
    }
}

/// Transient notification produced for every simulated detection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub category: DetectionCategory,
    /// e.g. "Missing Helmet detected"
    pub title: String,
    /// Channel summary: "Email, Slack" or "no channel".
    pub body: String,
}

impl Notification {
    pub fn for_detection(category: DetectionCategory, channels: &AlertChannels) -> Self {
        Self {
            category,
            title: format!("{} detected", category.label()),
            body: channels.summary(),
        }
    }

    /// Toast description line.
    pub fn description(&self) -> String {
        format!("Alert sent via {}", self.body)
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.description())
    }
}
