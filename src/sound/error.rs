//! Sound system error types.

use thiserror::Error;

/// Errors that can occur while playing an alert sound.
#[derive(Debug, Error)]
pub enum SoundError {
    /// Audio device is not available (e.g., no speakers connected).
    #[error("audio device is not available: {0}")]
    DeviceNotAvailable(String),

    /// Failed to create the audio output stream.
    #[error("failed to create audio stream: {0}")]
    StreamError(String),

    /// Failed to write to the terminal.
    #[error("failed to ring terminal bell: {0}")]
    TerminalError(String),

    /// Generic sound playback error.
    #[error("sound playback error: {0}")]
    PlaybackError(String),
}

impl SoundError {
    /// Returns true if this error is related to device availability.
    #[must_use]
    pub fn is_device_error(&self) -> bool {
        matches!(self, Self::DeviceNotAvailable(_) | Self::StreamError(_))
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::DeviceNotAvailable(_) => "Connect an audio output device",
            Self::StreamError(_) => "Check the system audio configuration",
            Self::TerminalError(_) => "Check that stdout is attached to a terminal",
            Self::PlaybackError(_) => "Disable sound alerts in settings",
        }
    }
}
