//! Daemon configuration.
//!
//! Supports loading from YAML files with environment variable overrides.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Daemon configuration loaded from YAML with environment overrides.
#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DaemonConfig {
    /// Report each paused track.
    /// Override: `EARSHOT_NOTIFY_ON_PAUSE`
    pub notify_on_pause: bool,

    /// Capacity of the pause request queue.
    /// Override: `EARSHOT_PAUSE_QUEUE_CAPACITY`
    pub pause_queue_capacity: usize,

    /// Also follow the multimedia-role default device.
    pub watch_multimedia_role: bool,

    /// Capacity of the event broadcast channel.
    pub event_channel_capacity: usize,

    /// Print every device/media event as a JSON line on stdout.
    /// Override: `EARSHOT_JSON_EVENTS`
    pub emit_json_events: bool,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        let core = earshot_core::Config::default();
        Self {
            notify_on_pause: true,
            pause_queue_capacity: core.pause_queue_capacity,
            watch_multimedia_role: core.watch_multimedia_role,
            event_channel_capacity: core.event_channel_capacity,
            emit_json_events: false,
        }
    }
}

impl DaemonConfig {
    /// Loads configuration from a YAML file, then applies environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = if let Some(path) = path {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?
        } else {
            Self::default()
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Applies environment variable overrides to the configuration.
    ///
    /// Unparseable values are ignored.
    fn apply_env_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("EARSHOT_NOTIFY_ON_PAUSE") {
            if let Ok(notify) = val.parse() {
                self.notify_on_pause = notify;
            }
        }

        if let Some(val) = var("EARSHOT_PAUSE_QUEUE_CAPACITY") {
            if let Ok(capacity) = val.parse() {
                self.pause_queue_capacity = capacity;
            }
        }

        if let Some(val) = var("EARSHOT_JSON_EVENTS") {
            if let Ok(json) = val.parse() {
                self.emit_json_events = json;
            }
        }
    }

    /// Converts to earshot-core's Config type.
    pub fn to_core_config(&self) -> earshot_core::Config {
        earshot_core::Config {
            pause_queue_capacity: self.pause_queue_capacity,
            watch_multimedia_role: self.watch_multimedia_role,
            event_channel_capacity: self.event_channel_capacity,
        }
    }
}
