//! Application bootstrap and dependency wiring.
//!
//! This module contains the composition root - the single place where the
//! observer, worker, and orchestrator are instantiated and wired together.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::device::{DeviceTopologyObserver, TopologySubscription};
use crate::error::EarshotResult;
use crate::events::{BroadcastEventBridge, EventEmitter};
use crate::media::{MediaPausedHandler, PauseOrchestrator, PauseTrigger};
use crate::platform::PlatformBackends;
use crate::runtime::TokioSpawner;
use crate::services::{PauseRequester, PauseWorker};

/// Container for all bootstrapped services.
pub struct BootstrappedServices {
    /// Tracks the default render device and detects its loss.
    pub observer: Arc<DeviceTopologyObserver>,
    /// Pauses playing media sessions.
    pub orchestrator: Arc<PauseOrchestrator>,
    /// Enqueues pause requests for the worker.
    pub requester: PauseRequester,
    /// Event bridge for device and media events.
    pub event_bridge: Arc<BroadcastEventBridge>,
    /// Endpoint notification registration held for the services' lifetime.
    subscription: TopologySubscription,
    /// Cancellation token for the pause worker.
    pub cancel_token: CancellationToken,
}

impl BootstrappedServices {
    /// Stops listening for endpoint notifications and stops the pause worker.
    ///
    /// Safe to call more than once.
    pub fn shutdown(&self) {
        log::info!("[Bootstrap] Beginning shutdown...");

        if let Err(e) = self.subscription.unsubscribe() {
            log::warn!("[Bootstrap] Failed to unregister notifications: {}", e);
        }
        self.cancel_token.cancel();

        log::info!("[Bootstrap] Shutdown complete");
    }
}

/// Bootstraps all services with their dependencies.
///
/// The wiring order matters - services are created in dependency order:
///
/// 1. Event bridge
/// 2. Pause orchestrator (depends on media sessions, handler, event bridge)
/// 3. Pause worker and requester (depends on orchestrator)
/// 4. Device observer (depends on topology, requester, event bridge)
/// 5. Notification subscription, then the worker task
///
/// # Arguments
/// * `config` - Core configuration
/// * `backends` - Topology and media session bindings
/// * `handler` - Callback invoked for each paused media session
/// * `spawner` - Spawner the pause worker runs on
///
/// # Errors
///
/// Returns an error if the configuration is invalid or notification
/// registration fails.
pub fn bootstrap_services(
    config: &Config,
    backends: PlatformBackends,
    handler: Arc<dyn MediaPausedHandler>,
    spawner: &TokioSpawner,
) -> EarshotResult<BootstrappedServices> {
    config.validate()?;

    let event_bridge = Arc::new(BroadcastEventBridge::new(config.event_channel_capacity));
    let cancel_token = CancellationToken::new();

    let orchestrator = Arc::new(PauseOrchestrator::new(
        backends.sessions,
        handler,
        Arc::clone(&event_bridge) as Arc<dyn EventEmitter>,
    ));

    let (worker, requester) = PauseWorker::new(
        Arc::clone(&orchestrator),
        config.pause_queue_capacity,
        cancel_token.clone(),
    );

    let observer = Arc::new(DeviceTopologyObserver::new(
        backends.topology,
        Arc::new(requester.clone()) as Arc<dyn PauseTrigger>,
        Arc::clone(&event_bridge) as Arc<dyn EventEmitter>,
        config.watch_multimedia_role,
    ));

    let subscription = observer.subscribe()?;
    worker.start(spawner);

    Ok(BootstrappedServices {
        observer,
        orchestrator,
        requester,
        event_bridge,
        subscription,
        cancel_token,
    })
}
