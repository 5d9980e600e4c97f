//! Core configuration.

use serde::{Deserialize, Serialize};

use crate::error::{EarshotError, EarshotResult};

/// Configuration for the Earshot core services.
///
/// All fields have sensible defaults.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Capacity of the pause request queue between the observer and the worker.
    pub pause_queue_capacity: usize,

    /// Track multimedia-role default changes in addition to console-role ones.
    pub watch_multimedia_role: bool,

    /// Capacity of the broadcast channel for device and media events.
    pub event_channel_capacity: usize,
}

impl Config {
    /// Validates the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `EarshotError::Configuration` if a capacity is 0.
    pub fn validate(&self) -> EarshotResult<()> {
        if self.pause_queue_capacity == 0 {
            return Err(EarshotError::Configuration(
                "pause_queue_capacity must be >= 1".to_string(),
            ));
        }
        if self.event_channel_capacity == 0 {
            return Err(EarshotError::Configuration(
                "event_channel_capacity must be >= 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pause_queue_capacity: 8,
            watch_multimedia_role: true,
            event_channel_capacity: 64,
        }
    }
}
