//! Pause request queue and worker.
//!
//! Responsibilities:
//! - Accepting pause requests from OS notification threads without blocking
//! - Running pause attempts one at a time on the async runtime
//! - Stopping on cancellation or when every requester is gone
//!
//! The queue is bounded. When it is full a new request is dropped: any request
//! still waiting in the queue will pause everything that is playing once it
//! runs, so no pause intent is lost.

use std::sync::Arc;

use tokio::sync::mpsc::{self, error::TrySendError};
use tokio_util::sync::CancellationToken;

use crate::media::{PauseOrchestrator, PauseReason, PauseTrigger};
use crate::runtime::TaskSpawner;

/// Cheap, cloneable handle that enqueues pause requests.
#[derive(Clone)]
pub struct PauseRequester {
    tx: mpsc::Sender<PauseReason>,
}

impl PauseTrigger for PauseRequester {
    fn request_pause(&self, reason: PauseReason) {
        match self.tx.try_send(reason) {
            Ok(()) => log::debug!("[PauseWorker] Pause request queued"),
            Err(TrySendError::Full(reason)) => {
                log::debug!(
                    "[PauseWorker] Queue full, pending request covers: {}",
                    reason
                );
            }
            Err(TrySendError::Closed(reason)) => {
                log::warn!("[PauseWorker] Worker stopped, dropping request: {}", reason);
            }
        }
    }
}

/// Consumes pause requests and drives the [`PauseOrchestrator`].
pub struct PauseWorker {
    orchestrator: Arc<PauseOrchestrator>,
    rx: mpsc::Receiver<PauseReason>,
    cancel_token: CancellationToken,
}

impl PauseWorker {
    /// Creates a worker and the requester that feeds it.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0 (validated by `Config::validate`).
    pub fn new(
        orchestrator: Arc<PauseOrchestrator>,
        capacity: usize,
        cancel_token: CancellationToken,
    ) -> (Self, PauseRequester) {
        let (tx, rx) = mpsc::channel(capacity);
        let worker = Self {
            orchestrator,
            rx,
            cancel_token,
        };
        (worker, PauseRequester { tx })
    }

    /// Spawns the worker loop as a background task.
    pub fn start<S: TaskSpawner>(self, spawner: &S) {
        spawner.spawn(self.run());
    }

    /// Processes requests until cancelled or until every requester is dropped.
    pub async fn run(mut self) {
        log::info!("[PauseWorker] Started");
        loop {
            let reason = tokio::select! {
                _ = self.cancel_token.cancelled() => {
                    log::info!("[PauseWorker] Cancelled");
                    break;
                }
                reason = self.rx.recv() => match reason {
                    Some(reason) => reason,
                    None => {
                        log::info!("[PauseWorker] All requesters dropped");
                        break;
                    }
                },
            };

            log::info!("[PauseWorker] Pausing media: {}", reason);
            let report = self.orchestrator.attempt_pause_now().await;
            if report.paused.is_empty() {
                log::info!("[PauseWorker] Nothing was paused");
            }
        }
    }
}
