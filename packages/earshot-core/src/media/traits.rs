//! Trait abstractions for system media sessions.
//!
//! The orchestrator depends on these traits rather than on the WinRT
//! `GlobalSystemMediaTransportControls` API so that session snapshots can be
//! scripted in tests.

use std::sync::Arc;

use async_trait::async_trait;

use super::{MediaProperties, PlaybackStatus};
use crate::error::MediaResult;

/// A single application's media session.
#[async_trait]
pub trait MediaSession: Send + Sync {
    /// Identifier of the owning application, for logs and events.
    fn source_app_id(&self) -> String;

    /// Current playback status.
    fn playback_status(&self) -> MediaResult<PlaybackStatus>;

    /// Asks the session to pause.
    ///
    /// Returns `Ok(false)` when the session declined the request.
    async fn try_pause(&self) -> MediaResult<bool>;

    /// Metadata of the item currently loaded in the session.
    async fn media_properties(&self) -> MediaResult<MediaProperties>;
}

/// Provides snapshots of the system's active media sessions.
#[async_trait]
pub trait MediaSessionManager: Send + Sync {
    /// Obtains the session manager and returns the sessions active right now.
    ///
    /// Every call produces a fresh snapshot; nothing is cached between calls.
    async fn sessions(&self) -> MediaResult<Vec<Arc<dyn MediaSession>>>;
}
