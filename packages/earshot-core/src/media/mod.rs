//! System media session control.
//!
//! This module provides:
//! - [`MediaSessionManager`] / [`MediaSession`] traits over the OS media sessions
//! - [`PauseOrchestrator`], which pauses every playing session and reports it
//! - [`PauseTrigger`], the single action the device observer depends on

mod orchestrator;
pub mod traits;

pub use orchestrator::{PauseOrchestrator, PauseReport};
pub use traits::{MediaSession, MediaSessionManager};

use std::fmt;

use serde::Serialize;

use crate::device::DeviceId;

/// Playback status of a media session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PlaybackStatus {
    Closed,
    Opened,
    Changing,
    Stopped,
    Playing,
    Paused,
}

/// Metadata of the item a session is currently playing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MediaProperties {
    pub title: String,
    pub artist: String,
}

/// A session that was successfully paused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PausedMedia {
    pub title: String,
    pub artist: String,
    /// Identifier of the application owning the session (AUMID on Windows).
    pub source_app_id: String,
}

/// Why the device observer asked for media to be paused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PauseReason {
    /// The tracked default device reported the unplugged state.
    DefaultDeviceUnplugged {
        #[serde(rename = "deviceId")]
        device_id: DeviceId,
    },
    /// The default moved away from a device that is now unplugged.
    PreviousDefaultUnplugged {
        #[serde(rename = "deviceId")]
        device_id: DeviceId,
    },
    /// The default moved away from a device whose state could not be read.
    PreviousDefaultUnreachable {
        #[serde(rename = "deviceId")]
        device_id: DeviceId,
    },
}

impl PauseReason {
    pub fn device_id(&self) -> &DeviceId {
        match self {
            Self::DefaultDeviceUnplugged { device_id }
            | Self::PreviousDefaultUnplugged { device_id }
            | Self::PreviousDefaultUnreachable { device_id } => device_id,
        }
    }
}

impl fmt::Display for PauseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DefaultDeviceUnplugged { device_id } => {
                write!(f, "default device {} unplugged", device_id)
            }
            Self::PreviousDefaultUnplugged { device_id } => {
                write!(f, "previous default device {} unplugged", device_id)
            }
            Self::PreviousDefaultUnreachable { device_id } => {
                write!(f, "previous default device {} unreachable", device_id)
            }
        }
    }
}

/// The action the device observer invokes when the output in use is lost.
///
/// Called on OS notification threads, so implementations must return quickly.
pub trait PauseTrigger: Send + Sync {
    fn request_pause(&self, reason: PauseReason);
}

/// Receives one call per successfully paused media session.
pub trait MediaPausedHandler: Send + Sync {
    fn on_media_paused(&self, title: &str, artist: &str);
}

impl<F> MediaPausedHandler for F
where
    F: Fn(&str, &str) + Send + Sync,
{
    fn on_media_paused(&self, title: &str, artist: &str) {
        self(title, artist)
    }
}
