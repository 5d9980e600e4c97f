//! Shared mocks for unit tests.
//!
//! Hand-written implementations of the topology and media session traits whose
//! behavior can be scripted per test and whose calls are recorded.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::device::{
    DataFlow, DeviceId, DeviceState, EndpointNotificationClient, RegistrationToken, Role,
    TopologySource,
};
use crate::error::{DeviceError, DeviceResult, MediaError, MediaResult};
use crate::events::{DeviceEvent, EventEmitter, MediaEvent};
use crate::media::{
    MediaPausedHandler, MediaProperties, MediaSession, MediaSessionManager, PauseReason,
    PauseTrigger, PlaybackStatus,
};

// ─────────────────────────────────────────────────────────────────────────────
// Topology
// ─────────────────────────────────────────────────────────────────────────────

/// Scriptable endpoint topology.
///
/// Devices without a scripted state report `DeviceError::NotFound`.
pub struct MockTopology {
    default: Mutex<DeviceResult<DeviceId>>,
    states: Mutex<HashMap<DeviceId, DeviceResult<DeviceState>>>,
    state_queries: Mutex<Vec<DeviceId>>,
    clients: Mutex<HashMap<u64, Arc<dyn EndpointNotificationClient>>>,
    next_token: AtomicU64,
    unregister_calls: AtomicUsize,
}

impl MockTopology {
    fn new(default: DeviceResult<DeviceId>) -> Self {
        Self {
            default: Mutex::new(default),
            states: Mutex::new(HashMap::new()),
            state_queries: Mutex::new(Vec::new()),
            clients: Mutex::new(HashMap::new()),
            next_token: AtomicU64::new(1),
            unregister_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_default(id: &str) -> Self {
        Self::new(Ok(id.into()))
    }

    pub fn without_default() -> Self {
        Self::new(Err(DeviceError::NoDefaultDevice))
    }

    pub fn set_state(&self, id: &str, state: DeviceState) {
        self.states.lock().insert(id.into(), Ok(state));
    }

    pub fn fail_state(&self, id: &str, error: DeviceError) {
        self.states.lock().insert(id.into(), Err(error));
    }

    /// Devices whose state was looked up, in call order.
    pub fn state_queries(&self) -> Vec<DeviceId> {
        self.state_queries.lock().clone()
    }

    pub fn active_registrations(&self) -> usize {
        self.clients.lock().len()
    }

    pub fn unregister_calls(&self) -> usize {
        self.unregister_calls.load(Ordering::SeqCst)
    }

    fn clients(&self) -> Vec<Arc<dyn EndpointNotificationClient>> {
        self.clients.lock().values().cloned().collect()
    }

    /// Delivers a state change to every registered client.
    pub fn notify_state_changed(&self, id: &str, state: DeviceState) {
        let id = DeviceId::from(id);
        for client in self.clients() {
            client.on_device_state_changed(&id, state);
        }
    }

    /// Delivers a default change to every registered client.
    pub fn notify_default_changed(&self, flow: DataFlow, role: Role, id: Option<&str>) {
        let id = id.map(DeviceId::from);
        for client in self.clients() {
            client.on_default_device_changed(flow, role, id.as_ref());
        }
    }
}

impl TopologySource for MockTopology {
    fn default_endpoint(&self, flow: DataFlow, role: Role) -> DeviceResult<DeviceId> {
        assert_eq!((flow, role), (DataFlow::Render, Role::Console));
        self.default.lock().clone()
    }

    fn device_state(&self, device_id: &DeviceId) -> DeviceResult<DeviceState> {
        self.state_queries.lock().push(device_id.clone());
        self.states
            .lock()
            .get(device_id)
            .cloned()
            .unwrap_or_else(|| Err(DeviceError::NotFound(device_id.to_string())))
    }

    fn register(
        &self,
        client: Arc<dyn EndpointNotificationClient>,
    ) -> DeviceResult<RegistrationToken> {
        let token = self.next_token.fetch_add(1, Ordering::SeqCst);
        self.clients.lock().insert(token, client);
        Ok(RegistrationToken(token))
    }

    fn unregister(&self, token: RegistrationToken) -> DeviceResult<()> {
        self.unregister_calls.fetch_add(1, Ordering::SeqCst);
        self.clients
            .lock()
            .remove(&token.0)
            .map(|_| ())
            .ok_or_else(|| DeviceError::Platform(format!("unknown registration {}", token.0)))
    }
}

/// Notification client that ignores everything.
pub struct NullClient;

impl EndpointNotificationClient for NullClient {
    fn on_device_state_changed(&self, _device_id: &DeviceId, _new_state: DeviceState) {}

    fn on_default_device_changed(&self, _flow: DataFlow, _role: Role, _id: Option<&DeviceId>) {}
}

/// Pause trigger that records every request.
#[derive(Default)]
pub struct CountingTrigger {
    reasons: Mutex<Vec<PauseReason>>,
}

impl CountingTrigger {
    pub fn count(&self) -> usize {
        self.reasons.lock().len()
    }

    pub fn reasons(&self) -> Vec<PauseReason> {
        self.reasons.lock().clone()
    }
}

impl PauseTrigger for CountingTrigger {
    fn request_pause(&self, reason: PauseReason) {
        self.reasons.lock().push(reason);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Media Sessions
// ─────────────────────────────────────────────────────────────────────────────

struct MockSessionInner {
    app_id: String,
    status: Mutex<MediaResult<PlaybackStatus>>,
    pause_result: Mutex<MediaResult<bool>>,
    properties: Mutex<MediaResult<MediaProperties>>,
    pause_calls: AtomicUsize,
    metadata_calls: AtomicUsize,
}

/// Scriptable media session. Clones share state and call counters.
#[derive(Clone)]
pub struct MockSession {
    inner: Arc<MockSessionInner>,
}

impl MockSession {
    pub fn with_status(app_id: &str, status: PlaybackStatus) -> Self {
        Self {
            inner: Arc::new(MockSessionInner {
                app_id: app_id.to_string(),
                status: Mutex::new(Ok(status)),
                pause_result: Mutex::new(Ok(true)),
                properties: Mutex::new(Ok(MediaProperties::default())),
                pause_calls: AtomicUsize::new(0),
                metadata_calls: AtomicUsize::new(0),
            }),
        }
    }

    pub fn playing(app_id: &str, title: &str, artist: &str) -> Self {
        let session = Self::with_status(app_id, PlaybackStatus::Playing);
        *session.inner.properties.lock() = Ok(MediaProperties {
            title: title.to_string(),
            artist: artist.to_string(),
        });
        session
    }

    pub fn failing_status(self, error: MediaError) -> Self {
        *self.inner.status.lock() = Err(error);
        self
    }

    pub fn failing_pause(self, error: MediaError) -> Self {
        *self.inner.pause_result.lock() = Err(error);
        self
    }

    pub fn declining_pause(self) -> Self {
        *self.inner.pause_result.lock() = Ok(false);
        self
    }

    pub fn failing_metadata(self, error: MediaError) -> Self {
        *self.inner.properties.lock() = Err(error);
        self
    }

    /// Puts the session back into `Playing`.
    pub fn resume(&self) {
        *self.inner.status.lock() = Ok(PlaybackStatus::Playing);
    }

    pub fn pause_calls(&self) -> usize {
        self.inner.pause_calls.load(Ordering::SeqCst)
    }

    pub fn metadata_calls(&self) -> usize {
        self.inner.metadata_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MediaSession for MockSession {
    fn source_app_id(&self) -> String {
        self.inner.app_id.clone()
    }

    fn playback_status(&self) -> MediaResult<PlaybackStatus> {
        self.inner.status.lock().clone()
    }

    async fn try_pause(&self) -> MediaResult<bool> {
        self.inner.pause_calls.fetch_add(1, Ordering::SeqCst);
        let result = self.inner.pause_result.lock().clone();
        if let Ok(true) = result {
            *self.inner.status.lock() = Ok(PlaybackStatus::Paused);
        }
        result
    }

    async fn media_properties(&self) -> MediaResult<MediaProperties> {
        self.inner.metadata_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.properties.lock().clone()
    }
}

/// Session manager returning a fixed set of sessions (or a fixed error).
pub struct MockSessionManager {
    sessions: MediaResult<Vec<MockSession>>,
    requests: Arc<AtomicUsize>,
}

impl MockSessionManager {
    pub fn new(sessions: Vec<MockSession>) -> Self {
        Self {
            sessions: Ok(sessions),
            requests: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing(error: MediaError) -> Self {
        Self {
            sessions: Err(error),
            requests: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Counter of snapshot requests, readable after the manager is moved.
    pub fn request_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.requests)
    }
}

#[async_trait]
impl MediaSessionManager for MockSessionManager {
    async fn sessions(&self) -> MediaResult<Vec<Arc<dyn MediaSession>>> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        match &self.sessions {
            Ok(sessions) => Ok(sessions
                .iter()
                .map(|s| Arc::new(s.clone()) as Arc<dyn MediaSession>)
                .collect()),
            Err(e) => Err(e.clone()),
        }
    }
}

/// Paused-media handler that records `(title, artist)` pairs.
#[derive(Default)]
pub struct RecordingHandler {
    calls: Mutex<Vec<(String, String)>>,
}

impl RecordingHandler {
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().clone()
    }
}

impl MediaPausedHandler for RecordingHandler {
    fn on_media_paused(&self, title: &str, artist: &str) {
        self.calls
            .lock()
            .push((title.to_string(), artist.to_string()));
    }
}

/// Emitter that keeps every media event in order.
#[derive(Default)]
pub struct RecordingEmitter {
    media: Mutex<Vec<MediaEvent>>,
}

impl RecordingEmitter {
    pub fn media_events(&self) -> Vec<MediaEvent> {
        self.media.lock().clone()
    }
}

impl EventEmitter for RecordingEmitter {
    fn emit_device(&self, _event: DeviceEvent) {}

    fn emit_media(&self, event: MediaEvent) {
        self.media.lock().push(event);
    }
}
