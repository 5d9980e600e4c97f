//! Centralized error types for the Earshot core library.
//!
//! This module provides a unified error handling system that:
//! - Defines structured error types per concern using `thiserror`
//! - Maps errors to stable machine-readable codes
//! - Converts concern-specific errors into the application-wide [`EarshotError`]
//!
//! Note that none of these errors ever escape a notification handler. They exist
//! so that every OS-facing call site returns an explicit `Result` which the
//! observer and orchestrator then fold into their conservative branches.

use serde::Serialize;
use thiserror::Error;

/// Trait for error types that provide machine-readable error codes.
pub trait ErrorCode {
    /// Returns a machine-readable error code for logs and event payloads.
    fn code(&self) -> &'static str;
}

/// Failures reported by an audio endpoint topology source.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeviceError {
    /// No endpoint is currently the default for the requested flow and role.
    #[error("no default audio endpoint")]
    NoDefaultDevice,

    /// The device is no longer part of the endpoint topology.
    #[error("audio endpoint not found: {0}")]
    NotFound(String),

    /// The platform API returned an error.
    #[error("platform audio API error: {0}")]
    Platform(String),
}

impl ErrorCode for DeviceError {
    fn code(&self) -> &'static str {
        match self {
            Self::NoDefaultDevice => "no_default_device",
            Self::NotFound(_) => "device_not_found",
            Self::Platform(_) => "device_platform_error",
        }
    }
}

/// Failures reported by a media session manager or one of its sessions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MediaError {
    /// The system media session manager could not be obtained.
    #[error("media session manager unavailable: {0}")]
    ManagerUnavailable(String),

    /// A call against a single session failed.
    #[error("media session error: {0}")]
    Session(String),
}

impl ErrorCode for MediaError {
    fn code(&self) -> &'static str {
        match self {
            Self::ManagerUnavailable(_) => "media_manager_unavailable",
            Self::Session(_) => "media_session_error",
        }
    }
}

/// Application-wide error type for Earshot.
#[derive(Debug, Error, Serialize)]
#[serde(tag = "type", content = "details")]
pub enum EarshotError {
    /// Endpoint topology operation failed (registration, lookup).
    #[error("Device error: {0}")]
    Device(String),

    /// Media session operation failed.
    #[error("Media error: {0}")]
    Media(String),

    /// Invalid configuration value.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The current platform has no audio endpoint or media session binding.
    #[error("Unsupported platform: {0}")]
    Unsupported(String),
}

impl EarshotError {
    /// Returns a machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Device(_) => "device_error",
            Self::Media(_) => "media_error",
            Self::Configuration(_) => "configuration_error",
            Self::Unsupported(_) => "unsupported_platform",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Result Type Aliases
// ─────────────────────────────────────────────────────────────────────────────

/// Result of a topology source call.
pub type DeviceResult<T> = Result<T, DeviceError>;

/// Result of a media session call.
pub type MediaResult<T> = Result<T, MediaError>;

/// Convenient Result alias for application-wide operations.
pub type EarshotResult<T> = Result<T, EarshotError>;

impl From<DeviceError> for EarshotError {
    fn from(err: DeviceError) -> Self {
        Self::Device(err.to_string())
    }
}

impl From<MediaError> for EarshotError {
    fn from(err: MediaError) -> Self {
        Self::Media(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_error_converts_with_message() {
        let err: EarshotError = DeviceError::NotFound("{0.0.0.00000000}.{abc}".into()).into();
        assert_eq!(err.code(), "device_error");
        assert!(err.to_string().contains("{abc}"));
    }

    #[test]
    fn concern_errors_have_distinct_codes() {
        assert_eq!(DeviceError::NoDefaultDevice.code(), "no_default_device");
        assert_eq!(
            MediaError::ManagerUnavailable("denied".into()).code(),
            "media_manager_unavailable"
        );
        assert_ne!(
            MediaError::Session("x".into()).code(),
            DeviceError::Platform("x".into()).code()
        );
    }

    #[test]
    fn serializes_with_type_tag() {
        let err = EarshotError::Configuration("pause_queue_capacity must be >= 1".into());
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["type"], "Configuration");
        assert_eq!(json["details"], "pause_queue_capacity must be >= 1");
    }
}
