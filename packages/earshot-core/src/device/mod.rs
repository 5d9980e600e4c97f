//! Audio endpoint topology: identities, states, and change observation.
//!
//! This module provides:
//! - Value types mirroring the OS endpoint model ([`DeviceId`], [`DeviceState`],
//!   [`DataFlow`], [`Role`])
//! - The [`TopologySource`] and [`EndpointNotificationClient`] seams
//! - [`DeviceTopologyObserver`], which turns raw notifications into pause requests

mod observer;
mod subscription;
pub mod traits;

pub use observer::{DeviceAction, DeviceTopologyObserver};
pub use subscription::TopologySubscription;
pub use traits::{EndpointNotificationClient, RegistrationToken, TopologySource};

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque, stable identity of an audio endpoint.
///
/// Two distinct endpoints never share an identity, and an endpoint keeps the
/// same identity across plug/unplug cycles.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(String);

impl DeviceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DeviceId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for DeviceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// State of an audio endpoint as reported by the OS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DeviceState {
    Active,
    Disabled,
    NotPresent,
    /// The endpoint was physically or logically removed (jack unplugged).
    Unplugged,
    /// Any other raw state value. Never actionable.
    Other(u32),
}

impl DeviceState {
    /// Maps a raw `DEVICE_STATE_XXX` bit value to a state.
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            0x1 => Self::Active,
            0x2 => Self::Disabled,
            0x4 => Self::NotPresent,
            0x8 => Self::Unplugged,
            other => Self::Other(other),
        }
    }

    pub fn is_unplugged(self) -> bool {
        matches!(self, Self::Unplugged)
    }
}

/// Direction of audio flow for an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DataFlow {
    Render,
    Capture,
    All,
}

/// Default-device slot an endpoint occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    Console,
    Multimedia,
    Communications,
}
