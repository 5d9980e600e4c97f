//! Pausing of playing media sessions.
//!
//! Responsibilities:
//! - Taking a fresh snapshot of the system's media sessions
//! - Pausing every session that is currently playing
//! - Reporting each successfully paused session to the [`MediaPausedHandler`]
//!
//! A pause attempt never fails as a whole. Errors, including a panicking
//! handler, are contained to the session they occurred in, logged, and counted
//! in the returned [`PauseReport`].

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use serde::Serialize;

use super::{MediaPausedHandler, MediaSession, MediaSessionManager, PausedMedia, PlaybackStatus};
use crate::error::MediaResult;
use crate::events::{EventEmitter, MediaEvent};
use crate::utils::now_millis;

/// Outcome of one pause attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PauseReport {
    /// Sessions in the snapshot.
    pub sessions_seen: usize,
    /// Pause requests issued (one per playing session).
    pub pause_requests: usize,
    /// Sessions that paused and were reported.
    pub paused: Vec<PausedMedia>,
    /// Sessions that errored, plus 1 if the snapshot itself failed.
    pub failures: usize,
}

/// Pauses all playing media sessions and reports what was paused.
///
/// Holds no mutable state, so overlapping calls are independent of each other.
pub struct PauseOrchestrator {
    sessions: Arc<dyn MediaSessionManager>,
    handler: Arc<dyn MediaPausedHandler>,
    emitter: Arc<dyn EventEmitter>,
}

impl PauseOrchestrator {
    /// Creates a new PauseOrchestrator.
    ///
    /// # Arguments
    /// * `sessions` - Source of media session snapshots
    /// * `handler` - Callback invoked once per successfully paused session
    /// * `emitter` - Event emitter for pause events
    pub fn new(
        sessions: Arc<dyn MediaSessionManager>,
        handler: Arc<dyn MediaPausedHandler>,
        emitter: Arc<dyn EventEmitter>,
    ) -> Self {
        Self {
            sessions,
            handler,
            emitter,
        }
    }

    /// Pauses every currently playing session.
    pub async fn attempt_pause_now(&self) -> PauseReport {
        let mut report = PauseReport::default();

        let sessions = match self.sessions.sessions().await {
            Ok(sessions) => sessions,
            Err(e) => {
                log::warn!("[Orchestrator] Could not enumerate media sessions: {}", e);
                report.failures += 1;
                return report;
            }
        };
        report.sessions_seen = sessions.len();

        for session in &sessions {
            let app_id = session.source_app_id();
            match self.pause_session(session.as_ref(), &mut report).await {
                Ok(Some(paused)) => {
                    log::info!(
                        "[Orchestrator] Paused {}: {} by {}",
                        app_id,
                        paused.title,
                        paused.artist
                    );
                    let handler = self.handler.as_ref();
                    if catch_unwind(AssertUnwindSafe(|| {
                        handler.on_media_paused(&paused.title, &paused.artist)
                    }))
                    .is_err()
                    {
                        log::error!("[Orchestrator] Paused handler panicked for {}", app_id);
                        report.failures += 1;
                        self.emitter.emit_media(MediaEvent::PauseFailed {
                            source_app_id: app_id,
                            error: "paused handler panicked".to_string(),
                            timestamp: now_millis(),
                        });
                        continue;
                    }
                    self.emitter.emit_media(MediaEvent::Paused {
                        media: paused.clone(),
                        timestamp: now_millis(),
                    });
                    report.paused.push(paused);
                }
                Ok(None) => {}
                Err(e) => {
                    log::warn!("[Orchestrator] Session {} failed: {}", app_id, e);
                    report.failures += 1;
                    self.emitter.emit_media(MediaEvent::PauseFailed {
                        source_app_id: app_id,
                        error: e.to_string(),
                        timestamp: now_millis(),
                    });
                }
            }
        }

        log::debug!(
            "[Orchestrator] Pause attempt done: {} session(s), {} request(s), {} paused, {} failure(s)",
            report.sessions_seen,
            report.pause_requests,
            report.paused.len(),
            report.failures
        );
        report
    }

    /// Pauses one session if it is playing.
    ///
    /// Returns `Ok(None)` for sessions that are not playing or declined to pause.
    async fn pause_session(
        &self,
        session: &dyn MediaSession,
        report: &mut PauseReport,
    ) -> MediaResult<Option<PausedMedia>> {
        if session.playback_status()? != PlaybackStatus::Playing {
            return Ok(None);
        }

        report.pause_requests += 1;
        if !session.try_pause().await? {
            log::debug!(
                "[Orchestrator] Session {} declined to pause",
                session.source_app_id()
            );
            return Ok(None);
        }

        let props = session.media_properties().await?;
        Ok(Some(PausedMedia {
            title: props.title,
            artist: props.artist,
            source_app_id: session.source_app_id(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MediaError;
    use crate::events::NoopEventEmitter;
    use crate::test_support::{MockSession, MockSessionManager, RecordingEmitter, RecordingHandler};

    fn orchestrator(
        manager: MockSessionManager,
    ) -> (PauseOrchestrator, Arc<RecordingHandler>) {
        let handler = Arc::new(RecordingHandler::default());
        let orchestrator = PauseOrchestrator::new(
            Arc::new(manager),
            Arc::clone(&handler) as Arc<dyn MediaPausedHandler>,
            Arc::new(NoopEventEmitter),
        );
        (orchestrator, handler)
    }

    #[tokio::test]
    async fn pauses_only_playing_sessions() {
        let s1 = MockSession::playing("spotify", "Song A", "Artist A");
        let s2 = MockSession::with_status("vlc", PlaybackStatus::Paused);
        let s3 = MockSession::playing("chrome", "Song C", "Artist C");
        let manager = MockSessionManager::new(vec![s1.clone(), s2.clone(), s3.clone()]);
        let (orchestrator, handler) = orchestrator(manager);

        let report = orchestrator.attempt_pause_now().await;

        assert_eq!(s1.pause_calls(), 1);
        assert_eq!(s2.pause_calls(), 0);
        assert_eq!(s3.pause_calls(), 1);
        assert_eq!(
            handler.calls(),
            vec![
                ("Song A".to_string(), "Artist A".to_string()),
                ("Song C".to_string(), "Artist C".to_string()),
            ]
        );
        assert_eq!(report.sessions_seen, 3);
        assert_eq!(report.pause_requests, 2);
        assert_eq!(report.paused.len(), 2);
        assert_eq!(report.paused[1].source_app_id, "chrome");
        assert_eq!(report.failures, 0);
    }

    #[tokio::test]
    async fn pause_error_does_not_block_other_sessions() {
        let s1 = MockSession::playing("spotify", "Song A", "Artist A")
            .failing_pause(MediaError::Session("RPC_E_DISCONNECTED".into()));
        let s3 = MockSession::playing("chrome", "Song C", "Artist C");
        let manager = MockSessionManager::new(vec![s1.clone(), s3.clone()]);
        let (orchestrator, handler) = orchestrator(manager);

        let report = orchestrator.attempt_pause_now().await;

        assert_eq!(s1.pause_calls(), 1);
        assert_eq!(s3.pause_calls(), 1);
        assert_eq!(
            handler.calls(),
            vec![("Song C".to_string(), "Artist C".to_string())]
        );
        assert_eq!(report.failures, 1);
    }

    #[tokio::test]
    async fn declined_pause_is_not_reported() {
        let s1 = MockSession::playing("spotify", "Song A", "Artist A").declining_pause();
        let manager = MockSessionManager::new(vec![s1.clone()]);
        let (orchestrator, handler) = orchestrator(manager);

        let report = orchestrator.attempt_pause_now().await;

        assert_eq!(s1.pause_calls(), 1);
        assert!(handler.calls().is_empty());
        assert_eq!(report.pause_requests, 1);
        assert_eq!(report.failures, 0);
        assert_eq!(s1.metadata_calls(), 0);
    }

    #[tokio::test]
    async fn metadata_failure_skips_report_for_that_session() {
        let s1 = MockSession::playing("spotify", "Song A", "Artist A")
            .failing_metadata(MediaError::Session("no properties".into()));
        let s2 = MockSession::playing("chrome", "Song B", "Artist B");
        let manager = MockSessionManager::new(vec![s1.clone(), s2]);
        let (orchestrator, handler) = orchestrator(manager);

        let report = orchestrator.attempt_pause_now().await;

        assert_eq!(
            handler.calls(),
            vec![("Song B".to_string(), "Artist B".to_string())]
        );
        assert_eq!(report.failures, 1);
    }

    #[tokio::test]
    async fn status_failure_skips_session_without_pausing() {
        let s1 = MockSession::playing("spotify", "Song A", "Artist A")
            .failing_status(MediaError::Session("gone".into()));
        let manager = MockSessionManager::new(vec![s1.clone()]);
        let (orchestrator, handler) = orchestrator(manager);

        let report = orchestrator.attempt_pause_now().await;

        assert_eq!(s1.pause_calls(), 0);
        assert!(handler.calls().is_empty());
        assert_eq!(report.failures, 1);
    }

    #[tokio::test]
    async fn enumeration_failure_is_swallowed() {
        let manager = MockSessionManager::failing(MediaError::ManagerUnavailable(
            "access denied".into(),
        ));
        let (orchestrator, handler) = orchestrator(manager);

        let report = orchestrator.attempt_pause_now().await;

        assert!(handler.calls().is_empty());
        assert_eq!(report.sessions_seen, 0);
        assert_eq!(report.failures, 1);
    }

    #[tokio::test]
    async fn snapshot_is_requeried_every_attempt() {
        let manager = MockSessionManager::new(vec![]);
        let requests = manager.request_counter();
        let (orchestrator, _) = orchestrator(manager);

        orchestrator.attempt_pause_now().await;
        orchestrator.attempt_pause_now().await;

        assert_eq!(requests.load(std::sync::atomic::Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn panicking_handler_does_not_stop_other_sessions() {
        let s1 = MockSession::playing("spotify", "Song A", "Artist A");
        let s2 = MockSession::playing("chrome", "Song B", "Artist B");
        let manager = MockSessionManager::new(vec![s1.clone(), s2.clone()]);
        let emitter = Arc::new(RecordingEmitter::default());
        let reported = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let handler = {
            let reported = Arc::clone(&reported);
            move |title: &str, _artist: &str| {
                if title == "Song A" {
                    panic!("handler failure");
                }
                reported.lock().push(title.to_string());
            }
        };
        let orchestrator = PauseOrchestrator::new(
            Arc::new(manager),
            Arc::new(handler),
            Arc::clone(&emitter) as Arc<dyn EventEmitter>,
        );

        let report = orchestrator.attempt_pause_now().await;

        assert_eq!(s1.pause_calls(), 1);
        assert_eq!(s2.pause_calls(), 1);
        assert_eq!(*reported.lock(), vec!["Song B".to_string()]);
        assert_eq!(report.failures, 1);
        assert_eq!(report.paused.len(), 1);
        assert_eq!(report.paused[0].source_app_id, "chrome");

        let events = emitter.media_events();
        assert!(matches!(
            &events[0],
            MediaEvent::PauseFailed { source_app_id, .. } if source_app_id == "spotify"
        ));
        assert!(matches!(&events[1], MediaEvent::Paused { media, .. } if media.title == "Song B"));
    }

    #[tokio::test]
    async fn overlapping_attempts_are_independent() {
        let s1 = MockSession::playing("spotify", "Song A", "Artist A");
        let s2 = MockSession::playing("chrome", "Song B", "Artist B");
        let manager = MockSessionManager::new(vec![s1.clone(), s2.clone()]);
        let requests = manager.request_counter();
        let (orchestrator, handler) = orchestrator(manager);

        let (first, second) = tokio::join!(
            orchestrator.attempt_pause_now(),
            orchestrator.attempt_pause_now()
        );

        // Each attempt takes its own snapshot; a session may be reported twice.
        assert_eq!(requests.load(std::sync::atomic::Ordering::SeqCst), 2);
        assert!(s1.pause_calls() >= 1);
        assert!(s2.pause_calls() >= 1);
        let reported = first.paused.len() + second.paused.len();
        assert!((2..=4).contains(&reported));
        assert_eq!(handler.calls().len(), reported);
        assert_eq!(first.failures + second.failures, 0);
    }
}
