//! Event system for reporting device and media activity.
//!
//! This module provides:
//! - [`EventEmitter`] trait for domain services to emit events
//! - [`BroadcastEventBridge`] for fan-out to any number of subscribers
//! - Event types for the device and media domains

mod bridge;
mod emitter;

pub use bridge::BroadcastEventBridge;
pub use emitter::{EventEmitter, LoggingEventEmitter, NoopEventEmitter};

use serde::Serialize;

use crate::device::DeviceId;
use crate::media::{PauseReason, PausedMedia};

/// Events broadcast to subscribers.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "category", rename_all = "camelCase")]
pub enum BroadcastEvent {
    /// Events from the audio endpoint topology.
    Device(DeviceEvent),

    /// Events from media session control.
    Media(MediaEvent),
}

/// Events related to the default render device.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DeviceEvent {
    /// The tracked default render device changed.
    DefaultChanged {
        /// Device that was default before, if any.
        previous: Option<DeviceId>,
        /// Device that is default now, if any.
        current: Option<DeviceId>,
        /// Unix timestamp in milliseconds.
        timestamp: u64,
    },
    /// The output in use was lost and a pause was requested.
    OutputLost {
        /// The lost device.
        #[serde(rename = "deviceId")]
        device_id: DeviceId,
        /// How the loss was detected.
        reason: PauseReason,
        /// Unix timestamp in milliseconds.
        timestamp: u64,
    },
}

/// Events related to media sessions.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum MediaEvent {
    /// A playing session was paused.
    Paused {
        /// What was paused.
        media: PausedMedia,
        /// Unix timestamp in milliseconds.
        timestamp: u64,
    },
    /// A session could not be paused or described.
    PauseFailed {
        /// Application owning the session.
        #[serde(rename = "sourceAppId")]
        source_app_id: String,
        /// Error message describing the failure.
        error: String,
        /// Unix timestamp in milliseconds.
        timestamp: u64,
    },
}

impl From<DeviceEvent> for BroadcastEvent {
    fn from(event: DeviceEvent) -> Self {
        BroadcastEvent::Device(event)
    }
}

impl From<MediaEvent> for BroadcastEvent {
    fn from(event: MediaEvent) -> Self {
        BroadcastEvent::Media(event)
    }
}
