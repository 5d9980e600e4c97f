//! Earshot Core - pauses system media when the default audio output disappears.
//!
//! When the default render device goes away (headphones unplugged, USB DAC
//! disconnected), every media session that is currently playing is paused and
//! the paused title/artist is reported to a caller-supplied callback.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`device`]: Endpoint topology types and the [`DeviceTopologyObserver`]
//! - [`media`]: Media session traits and the [`PauseOrchestrator`]
//! - [`services`]: The pause request queue and worker between the two
//! - [`events`]: Event system for device and media activity
//! - [`platform`]: WASAPI / WinRT bindings
//! - [`bootstrap`]: Composition root
//! - [`error`]: Centralized error types
//!
//! # Abstraction Traits
//!
//! - [`TopologySource`](device::TopologySource): default endpoint and device state lookups
//! - [`MediaSessionManager`](media::MediaSessionManager): media session snapshots
//! - [`PauseTrigger`](media::PauseTrigger): the observer's single outgoing action
//! - [`EventEmitter`](events::EventEmitter): emitting domain events
//! - [`TaskSpawner`](runtime::TaskSpawner): spawning background tasks
//!
//! OS notification handlers never block on media sessions: they enqueue a
//! pause request which a worker task turns into a pause attempt.

#![warn(clippy::all)]

pub mod bootstrap;
pub mod config;
pub mod device;
pub mod error;
pub mod events;
pub mod media;
pub mod platform;
pub mod runtime;
pub mod services;
pub mod utils;

#[cfg(test)]
mod test_support;

// Re-export commonly used types at the crate root
pub use bootstrap::{bootstrap_services, BootstrappedServices};
pub use config::Config;
pub use device::{
    DataFlow, DeviceAction, DeviceId, DeviceState, DeviceTopologyObserver,
    EndpointNotificationClient, Role, TopologySource, TopologySubscription,
};
pub use error::{DeviceError, EarshotError, EarshotResult, ErrorCode, MediaError};
pub use events::{
    BroadcastEvent, BroadcastEventBridge, DeviceEvent, EventEmitter, LoggingEventEmitter,
    MediaEvent, NoopEventEmitter,
};
pub use media::{
    MediaPausedHandler, MediaProperties, MediaSession, MediaSessionManager, PauseOrchestrator,
    PauseReason, PauseReport, PauseTrigger, PausedMedia, PlaybackStatus,
};
pub use platform::{default_backends, PlatformBackends};
pub use runtime::{TaskSpawner, TokioSpawner};
pub use services::{PauseRequester, PauseWorker};
pub use utils::now_millis;
