//! Platform bindings for the topology and media session traits.
//!
//! - **Windows**: WASAPI `IMMDeviceEnumerator` endpoint notifications and the
//!   WinRT `GlobalSystemMediaTransportControlsSessionManager`.
//! - **Other platforms**: not supported; [`default_backends`] returns
//!   `EarshotError::Unsupported` so callers can report it cleanly.

#[cfg(windows)]
mod gsmtc;
#[cfg(windows)]
mod wasapi;

#[cfg(windows)]
pub use gsmtc::GsmtcSessionManager;
#[cfg(windows)]
pub use wasapi::WasapiTopology;

use std::sync::Arc;

use crate::device::TopologySource;
use crate::error::EarshotResult;
use crate::media::MediaSessionManager;

/// The OS bindings the services are wired against.
#[derive(Clone)]
pub struct PlatformBackends {
    pub topology: Arc<dyn TopologySource>,
    pub sessions: Arc<dyn MediaSessionManager>,
}

/// Creates the bindings for the current platform.
///
/// # Errors
///
/// Returns an error if the OS audio API cannot be initialized, or
/// `EarshotError::Unsupported` on platforms without a binding.
#[cfg(windows)]
pub fn default_backends() -> EarshotResult<PlatformBackends> {
    Ok(PlatformBackends {
        topology: Arc::new(WasapiTopology::new()?),
        sessions: Arc::new(GsmtcSessionManager),
    })
}

/// Creates the bindings for the current platform.
///
/// # Errors
///
/// Always returns `EarshotError::Unsupported` on this platform.
#[cfg(not(windows))]
pub fn default_backends() -> EarshotResult<PlatformBackends> {
    Err(crate::error::EarshotError::Unsupported(format!(
        "no audio endpoint binding for {}",
        std::env::consts::OS
    )))
}
