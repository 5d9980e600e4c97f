//! Default render device tracking and loss detection.
//!
//! Responsibilities:
//! - Tracking which endpoint is the current default render device
//! - Classifying every endpoint notification as a pause request or a no-op
//! - Emitting device events for the presentation layer
//!
//! Handlers run on OS notification threads. They never return errors and never
//! wait on media sessions: an actionable event only enqueues a pause request.

use std::sync::Arc;

use parking_lot::Mutex;

use super::subscription::TopologySubscription;
use super::{DataFlow, DeviceId, DeviceState, EndpointNotificationClient, Role, TopologySource};
use crate::error::DeviceResult;
use crate::events::{DeviceEvent, EventEmitter};
use crate::media::{PauseReason, PauseTrigger};
use crate::utils::now_millis;

/// Outcome of classifying a single endpoint notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceAction {
    /// The output in use was lost; media should be paused.
    Pause(PauseReason),
    /// Nothing to do.
    Ignore,
}

/// Observes the endpoint topology and requests a pause when the default
/// render device goes away.
pub struct DeviceTopologyObserver {
    topology: Arc<dyn TopologySource>,
    trigger: Arc<dyn PauseTrigger>,
    emitter: Arc<dyn EventEmitter>,
    /// Best known default render device. Only the default-changed handler writes it.
    current_default: Mutex<Option<DeviceId>>,
    /// Whether multimedia-role notifications update the tracked device.
    watch_multimedia_role: bool,
}

impl DeviceTopologyObserver {
    /// Creates an observer seeded with the current console default render device.
    ///
    /// A failed lookup (no output device, API error) leaves the observer with no
    /// tracked device; it starts tracking once a default-changed notification arrives.
    pub fn new(
        topology: Arc<dyn TopologySource>,
        trigger: Arc<dyn PauseTrigger>,
        emitter: Arc<dyn EventEmitter>,
        watch_multimedia_role: bool,
    ) -> Self {
        let current_default = match topology.default_endpoint(DataFlow::Render, Role::Console) {
            Ok(id) => {
                log::info!("[Observer] Default render device: {}", id);
                Some(id)
            }
            Err(e) => {
                log::warn!("[Observer] No default render device at startup: {}", e);
                None
            }
        };

        Self {
            topology,
            trigger,
            emitter,
            current_default: Mutex::new(current_default),
            watch_multimedia_role,
        }
    }

    /// Returns the currently tracked default render device.
    pub fn current_default(&self) -> Option<DeviceId> {
        self.current_default.lock().clone()
    }

    /// Registers this observer for endpoint notifications.
    ///
    /// The returned guard keeps the registration alive and removes it exactly once.
    pub fn subscribe(self: &Arc<Self>) -> DeviceResult<TopologySubscription> {
        let client: Arc<dyn EndpointNotificationClient> = Arc::clone(self) as _;
        let token = self.topology.register(client)?;
        log::info!("[Observer] Registered for endpoint notifications");
        Ok(TopologySubscription::new(Arc::clone(&self.topology), token))
    }

    /// Classifies a device state change against the tracked default device.
    pub fn classify_state_change(&self, device_id: &DeviceId, new_state: DeviceState) -> DeviceAction {
        if !new_state.is_unplugged() {
            return DeviceAction::Ignore;
        }

        let is_default = self.current_default.lock().as_ref() == Some(device_id);
        if is_default {
            DeviceAction::Pause(PauseReason::DefaultDeviceUnplugged {
                device_id: device_id.clone(),
            })
        } else {
            DeviceAction::Ignore
        }
    }

    /// Records a default device change and classifies it.
    ///
    /// Unlike [`classify_state_change`](Self::classify_state_change) this mutates
    /// the tracked device, so it must only be called once per notification.
    pub fn classify_default_change(
        &self,
        flow: DataFlow,
        role: Role,
        new_device_id: Option<&DeviceId>,
    ) -> DeviceAction {
        if !self.tracks(flow, role) {
            return DeviceAction::Ignore;
        }

        let previous = {
            let mut current = self.current_default.lock();
            if current.as_ref() == new_device_id {
                return DeviceAction::Ignore;
            }
            std::mem::replace(&mut *current, new_device_id.cloned())
        };

        log::info!(
            "[Observer] Default render device changed ({:?}): {} -> {}",
            role,
            previous.as_ref().map_or("<none>", DeviceId::as_str),
            new_device_id.map_or("<none>", DeviceId::as_str)
        );
        self.emitter.emit_device(DeviceEvent::DefaultChanged {
            previous: previous.clone(),
            current: new_device_id.cloned(),
            timestamp: now_millis(),
        });

        let Some(previous) = previous else {
            return DeviceAction::Ignore;
        };

        match self.topology.device_state(&previous) {
            Ok(DeviceState::Unplugged) => {
                DeviceAction::Pause(PauseReason::PreviousDefaultUnplugged { device_id: previous })
            }
            Ok(state) => {
                log::debug!(
                    "[Observer] Previous default {} still present ({:?}), not pausing",
                    previous,
                    state
                );
                DeviceAction::Ignore
            }
            Err(e) => {
                log::debug!("[Observer] Lookup of {} failed, assuming removed: {}", previous, e);
                DeviceAction::Pause(PauseReason::PreviousDefaultUnreachable { device_id: previous })
            }
        }
    }

    fn tracks(&self, flow: DataFlow, role: Role) -> bool {
        flow == DataFlow::Render
            && match role {
                Role::Console => true,
                Role::Multimedia => self.watch_multimedia_role,
                Role::Communications => false,
            }
    }

    fn act(&self, action: DeviceAction) {
        if let DeviceAction::Pause(reason) = action {
            log::info!("[Observer] Output lost: {}", reason);
            self.emitter.emit_device(DeviceEvent::OutputLost {
                device_id: reason.device_id().clone(),
                reason: reason.clone(),
                timestamp: now_millis(),
            });
            self.trigger.request_pause(reason);
        }
    }
}

impl EndpointNotificationClient for DeviceTopologyObserver {
    fn on_device_added(&self, device_id: &DeviceId) {
        log::trace!("[Observer] Device added: {}", device_id);
    }

    fn on_device_removed(&self, device_id: &DeviceId) {
        log::trace!("[Observer] Device removed: {}", device_id);
    }

    fn on_device_state_changed(&self, device_id: &DeviceId, new_state: DeviceState) {
        log::debug!("[Observer] Device state changed: {} -> {:?}", device_id, new_state);
        let action = self.classify_state_change(device_id, new_state);
        self.act(action);
    }

    fn on_default_device_changed(&self, flow: DataFlow, role: Role, new_device_id: Option<&DeviceId>) {
        let action = self.classify_default_change(flow, role, new_device_id);
        self.act(action);
    }

    fn on_property_value_changed(&self, device_id: &DeviceId) {
        log::trace!("[Observer] Property changed: {}", device_id);
    }
}
