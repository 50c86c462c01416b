//! Alert dispatch error types.
//!
//! This module defines the error types for notification and haptic
//! dispatch. Completion alerts swallow these after logging; only the
//! user-initiated test notification surfaces them.

use thiserror::Error;

use crate::sound::SoundError;

/// Errors that can occur while dispatching an alert.
#[derive(Debug, Error)]
pub enum AlertError {
    /// Notification permission was denied by the user.
    #[error("notification permission denied")]
    PermissionDenied,

    /// Failed to deliver a notification.
    #[error("failed to send notification: {0}")]
    SendFailed(String),

    /// Failed to trigger the haptic pulse.
    #[error("failed to trigger haptic pulse: {0}")]
    HapticFailed(String),

    /// Failed to play the alert sound.
    #[error(transparent)]
    Sound(#[from] SoundError),
}

impl AlertError {
    /// Returns true if this error is related to permissions.
    #[must_use]
    pub fn is_permission_error(&self) -> bool {
        matches!(self, Self::PermissionDenied)
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::PermissionDenied => "Allow notifications for this terminal",
            Self::SendFailed(_) => "Check that the terminal is writable",
            Self::HapticFailed(_) => "Disable vibration in settings",
            Self::Sound(e) => e.suggestion(),
        }
    }
}
