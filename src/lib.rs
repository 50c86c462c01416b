//! TimeFlex Library
//!
//! This library provides the core functionality for the TimeFlex CLI.
//! It includes:
//! - Timer engine for countdown and stopwatch sessions
//! - Completion alerts gated by user settings
//! - Persisted settings with an in-memory mirror
//! - Sound playback for alerts
//! - CLI command parsing and display utilities
//! - Type definitions for sessions and settings

pub mod alert;
pub mod cli;
pub mod engine;
pub mod format;
pub mod settings;
pub mod sound;
pub mod types;

// Re-export commonly used types for convenience
pub use types::{
    DurationPreset, Settings, SettingsField, Theme, TickOutcome, TimerMode, TimerSession,
    TimerStatus, DURATION_PRESETS,
};

// Re-export engine types
pub use engine::{TickHandle, TimerController, TimerEngine, TimerEvent, TICK_PERIOD};

// Re-export alert types
pub use alert::{
    AlertDispatcher, AlertError, CompletionAlert, ConsoleNotifier, Haptics, MockHaptics,
    MockNotifier, NotificationContent, Notifier, RecordingAlert, TerminalHaptics,
};

// Re-export settings types
pub use settings::{
    FileKeyValueStore, KeyValueStore, MemoryKeyValueStore, PersistHandle, SettingsError,
    SettingsStore, SETTINGS_KEY,
};

// Re-export sound types
pub use sound::{default_player, MockSoundPlayer, SoundError, SoundPlayer, TerminalBellPlayer};
#[cfg(feature = "audio")]
pub use sound::RodioSoundPlayer;

pub use format::{format_time, parse_time_input};
