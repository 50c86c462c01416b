//! Settings persistence error types.
//!
//! None of these reach the caller of a settings mutation: reads fall back to
//! defaults and writes are dropped after logging.

use thiserror::Error;

/// Errors that can occur while reading or writing persisted settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Failed to read a stored value.
    #[error("failed to read settings: {0}")]
    ReadFailed(String),

    /// Failed to write a stored value.
    #[error("failed to write settings: {0}")]
    WriteFailed(String),

    /// The stored value could not be decoded.
    #[error("stored settings are corrupt: {0}")]
    Corrupt(String),

    /// The background persistence task panicked or was cancelled.
    #[error("settings task failed: {0}")]
    TaskFailed(String),

    /// No directory could be determined for the settings file.
    #[error("could not determine a settings directory")]
    NoDataDirectory,
}

impl SettingsError {
    /// Returns true if reading failed and defaults should be used.
    #[must_use]
    pub fn falls_back_to_defaults(&self) -> bool {
        matches!(self, Self::ReadFailed(_) | Self::Corrupt(_))
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::ReadFailed(_) => "Check permissions on the settings directory",
            Self::WriteFailed(_) => "Check free disk space and directory permissions",
            Self::Corrupt(_) => "Delete the settings file to restore defaults",
            Self::TaskFailed(_) => "Restart the application",
            Self::NoDataDirectory => "Pass --data-dir or set TIMEFLEX_DATA_DIR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SettingsError::WriteFailed("disk full".to_string());
        assert!(err.to_string().contains("disk full"));
    }

    #[test]
    fn test_falls_back_to_defaults() {
        assert!(SettingsError::ReadFailed("x".into()).falls_back_to_defaults());
        assert!(SettingsError::Corrupt("x".into()).falls_back_to_defaults());
        assert!(!SettingsError::WriteFailed("x".into()).falls_back_to_defaults());
    }

    #[test]
    fn test_suggestion() {
        assert!(SettingsError::NoDataDirectory
            .suggestion()
            .contains("TIMEFLEX_DATA_DIR"));
    }
}
