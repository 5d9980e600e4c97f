//! WinRT media session binding (`GlobalSystemMediaTransportControls`).

use std::sync::Arc;

use async_trait::async_trait;
use windows::Media::Control::{
    GlobalSystemMediaTransportControlsSession as GsmtcSession,
    GlobalSystemMediaTransportControlsSessionManager as GsmtcManager,
    GlobalSystemMediaTransportControlsSessionPlaybackStatus as GsmtcStatus,
};

use crate::error::{MediaError, MediaResult};
use crate::media::{MediaProperties, MediaSession, MediaSessionManager, PlaybackStatus};

fn session_error(e: windows::core::Error) -> MediaError {
    MediaError::Session(e.to_string())
}

fn manager_error(e: windows::core::Error) -> MediaError {
    MediaError::ManagerUnavailable(e.to_string())
}

/// Session manager that requests a fresh `GlobalSystemMediaTransportControlsSessionManager`
/// for every snapshot.
pub struct GsmtcSessionManager;

#[async_trait]
impl MediaSessionManager for GsmtcSessionManager {
    async fn sessions(&self) -> MediaResult<Vec<Arc<dyn MediaSession>>> {
        let manager = GsmtcManager::RequestAsync()
            .map_err(manager_error)?
            .await
            .map_err(manager_error)?;
        let sessions = manager.GetSessions().map_err(manager_error)?;
        log::debug!("[Gsmtc] {} active session(s)", sessions.Size().unwrap_or(0));

        Ok(sessions
            .into_iter()
            .map(|session| Arc::new(GsmtcMediaSession { session }) as Arc<dyn MediaSession>)
            .collect())
    }
}

struct GsmtcMediaSession {
    session: GsmtcSession,
}

#[async_trait]
impl MediaSession for GsmtcMediaSession {
    fn source_app_id(&self) -> String {
        self.session
            .SourceAppUserModelId()
            .map(|id| id.to_string())
            .unwrap_or_default()
    }

    fn playback_status(&self) -> MediaResult<PlaybackStatus> {
        let status = self
            .session
            .GetPlaybackInfo()
            .and_then(|info| info.PlaybackStatus())
            .map_err(session_error)?;

        Ok(match status {
            GsmtcStatus::Playing => PlaybackStatus::Playing,
            GsmtcStatus::Paused => PlaybackStatus::Paused,
            GsmtcStatus::Stopped => PlaybackStatus::Stopped,
            GsmtcStatus::Changing => PlaybackStatus::Changing,
            GsmtcStatus::Opened => PlaybackStatus::Opened,
            _ => PlaybackStatus::Closed,
        })
    }

    async fn try_pause(&self) -> MediaResult<bool> {
        self.session
            .TryPauseAsync()
            .map_err(session_error)?
            .await
            .map_err(session_error)
    }

    async fn media_properties(&self) -> MediaResult<MediaProperties> {
        let props = self
            .session
            .TryGetMediaPropertiesAsync()
            .map_err(session_error)?
            .await
            .map_err(session_error)?;

        Ok(MediaProperties {
            title: props.Title().map_err(session_error)?.to_string(),
            artist: props.Artist().map_err(session_error)?.to_string(),
        })
    }
}
