//! Event emitter abstraction for decoupling services from transport.
//!
//! Services depend on the [`EventEmitter`] trait rather than concrete broadcast
//! channels, enabling testing and alternative presentation layers.

use super::{DeviceEvent, MediaEvent};

/// Trait for emitting domain events without knowledge of transport.
///
/// Device events are emitted from OS notification threads, so implementations
/// must not block.
pub trait EventEmitter: Send + Sync {
    /// Emits a default render device event.
    fn emit_device(&self, event: DeviceEvent);

    /// Emits a media session event.
    fn emit_media(&self, event: MediaEvent);
}

/// No-op emitter for embedding or testing.
pub struct NoopEventEmitter;

impl EventEmitter for NoopEventEmitter {
    fn emit_device(&self, _event: DeviceEvent) {}

    fn emit_media(&self, _event: MediaEvent) {}
}

/// Logging emitter for debugging and development.
///
/// Logs all events at debug level.
pub struct LoggingEventEmitter;

impl EventEmitter for LoggingEventEmitter {
    fn emit_device(&self, event: DeviceEvent) {
        tracing::debug!(?event, "device_event");
    }

    fn emit_media(&self, event: MediaEvent) {
        tracing::debug!(?event, "media_event");
    }
}
