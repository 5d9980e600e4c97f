//! Trait abstractions for the OS audio endpoint topology.
//!
//! These traits enable dependency injection for testability: the observer
//! depends on [`TopologySource`] rather than on WASAPI directly, and the
//! platform binding forwards raw callbacks to an [`EndpointNotificationClient`].

use std::sync::Arc;

use super::{DataFlow, DeviceId, DeviceState, Role};
use crate::error::DeviceResult;

/// Handle identifying one notification registration with a [`TopologySource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegistrationToken(pub u64);

/// Receiver of endpoint change notifications.
///
/// Implementations are invoked synchronously on threads owned by the OS
/// notification subsystem. They must not block for long and must never panic.
pub trait EndpointNotificationClient: Send + Sync {
    /// A new endpoint was added to the topology.
    fn on_device_added(&self, _device_id: &DeviceId) {}

    /// An endpoint was removed from the topology.
    fn on_device_removed(&self, _device_id: &DeviceId) {}

    /// An endpoint changed state.
    fn on_device_state_changed(&self, device_id: &DeviceId, new_state: DeviceState);

    /// The default endpoint for `flow`/`role` changed. `None` means no
    /// endpoint is default any more.
    fn on_default_device_changed(&self, flow: DataFlow, role: Role, new_device_id: Option<&DeviceId>);

    /// A property of an endpoint changed.
    fn on_property_value_changed(&self, _device_id: &DeviceId) {}
}

/// Source of audio endpoint topology information.
///
/// Used by `DeviceTopologyObserver` to look up the default endpoint and the
/// state of a previously default endpoint, and to register for notifications.
pub trait TopologySource: Send + Sync {
    /// Returns the identity of the current default endpoint for `flow`/`role`.
    ///
    /// Fails with `DeviceError::NoDefaultDevice` if no endpoint is default.
    fn default_endpoint(&self, flow: DataFlow, role: Role) -> DeviceResult<DeviceId>;

    /// Returns the current state of an endpoint.
    ///
    /// Fails if the endpoint no longer exists in the topology.
    fn device_state(&self, device_id: &DeviceId) -> DeviceResult<DeviceState>;

    /// Registers `client` for endpoint notifications.
    fn register(&self, client: Arc<dyn EndpointNotificationClient>)
        -> DeviceResult<RegistrationToken>;

    /// Removes a registration created by [`register`](Self::register).
    fn unregister(&self, token: RegistrationToken) -> DeviceResult<()>;
}
