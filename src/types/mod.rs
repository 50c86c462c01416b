//! Core data types for TimeFlex.
//!
//! This module defines the data structures used for:
//! - The live timer session and its state transitions
//! - Persisted user settings (sound, vibration, theme)
//! - Duration presets offered by the countdown view

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

// ============================================================================
// TimerMode
// ============================================================================

/// Counting mode of a timer session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerMode {
    /// Counts up toward a target duration and completes on reaching it
    #[default]
    Countdown,
    /// Counts up without bound until reset
    Stopwatch,
}

impl TimerMode {
    /// Returns the string representation of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerMode::Countdown => "countdown",
            TimerMode::Stopwatch => "stopwatch",
        }
    }
}

impl fmt::Display for TimerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// TimerStatus
// ============================================================================

/// Derived state of a session, computed from its flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerStatus {
    /// Not started, or reset
    Idle,
    /// Actively ticking
    Running,
    /// Halted, resumable
    Paused,
    /// Countdown reached its target
    Completed,
}

impl TimerStatus {
    /// Returns the string representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerStatus::Idle => "idle",
            TimerStatus::Running => "running",
            TimerStatus::Paused => "paused",
            TimerStatus::Completed => "completed",
        }
    }
}

// ============================================================================
// TimerSession
// ============================================================================

/// Result of delivering one tick to a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The session was not ticking; nothing changed
    Ignored,
    /// Elapsed time advanced by one second
    Advanced,
    /// The countdown reached its target on this tick
    Completed,
}

/// The single live timer session.
///
/// All mutation goes through the transition methods below, which keep the
/// invariants: `is_paused` implies `is_running`, and in countdown mode
/// `elapsed_in_seconds` never exceeds `duration_in_seconds`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSession {
    /// Opaque identifier, stable for the session's lifetime
    pub id: String,
    /// Counting mode
    pub mode: TimerMode,
    /// Countdown target; 0 means unset
    pub duration_in_seconds: u32,
    /// Seconds counted so far in the current run
    pub elapsed_in_seconds: u32,
    /// True once started and not yet reset or completed
    pub is_running: bool,
    /// True while a running session is halted
    pub is_paused: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl TimerSession {
    /// Creates an idle countdown session with the given target duration.
    pub fn new(duration_in_seconds: u32) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            mode: TimerMode::Countdown,
            duration_in_seconds,
            elapsed_in_seconds: 0,
            is_running: false,
            is_paused: false,
            created_at: Utc::now(),
        }
    }

    /// Starts (or restarts) ticking.
    pub fn start(&mut self) {
        self.is_running = true;
        self.is_paused = false;
    }

    /// Halts a running session. Has no effect unless running.
    pub fn pause(&mut self) {
        if self.is_running {
            self.is_paused = true;
        }
    }

    /// Continues a paused session.
    pub fn resume(&mut self) {
        self.is_paused = false;
    }

    /// Returns to idle, keeping mode and duration.
    pub fn reset(&mut self) {
        self.elapsed_in_seconds = 0;
        self.stop();
    }

    /// Sets the countdown target, cancelling any in-flight run.
    pub fn set_duration(&mut self, seconds: u32) {
        self.duration_in_seconds = seconds;
        self.reset();
    }

    /// Switches the counting mode, cancelling any in-flight run.
    pub fn set_mode(&mut self, mode: TimerMode) {
        self.mode = mode;
        self.reset();
    }

    /// Advances the session by one second.
    ///
    /// Completion clamps elapsed time to the target and clears both flags, so
    /// later ticks are ignored until the session is started again.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.is_ticking() {
            return TickOutcome::Ignored;
        }

        let elapsed = self.elapsed_in_seconds.saturating_add(1);

        if self.mode == TimerMode::Countdown && elapsed >= self.duration_in_seconds {
            self.elapsed_in_seconds = self.duration_in_seconds;
            self.stop();
            return TickOutcome::Completed;
        }

        self.elapsed_in_seconds = elapsed;
        TickOutcome::Advanced
    }

    /// Returns true while the session should receive ticks.
    pub fn is_ticking(&self) -> bool {
        self.is_running && !self.is_paused
    }

    /// Returns the derived state of the session.
    pub fn status(&self) -> TimerStatus {
        match (self.is_running, self.is_paused) {
            (true, false) => TimerStatus::Running,
            (true, true) => TimerStatus::Paused,
            _ if self.is_completed() => TimerStatus::Completed,
            _ => TimerStatus::Idle,
        }
    }

    /// Returns true if a countdown reached its (non-zero) target.
    pub fn is_completed(&self) -> bool {
        self.mode == TimerMode::Countdown
            && !self.is_running
            && self.duration_in_seconds > 0
            && self.elapsed_in_seconds >= self.duration_in_seconds
    }

    /// Seconds left in a countdown; 0 in stopwatch mode.
    pub fn remaining_seconds(&self) -> u32 {
        match self.mode {
            TimerMode::Countdown => self
                .duration_in_seconds
                .saturating_sub(self.elapsed_in_seconds),
            TimerMode::Stopwatch => 0,
        }
    }

    /// Fraction of the countdown already elapsed, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        if self.mode != TimerMode::Countdown || self.duration_in_seconds == 0 {
            return 0.0;
        }
        (f64::from(self.elapsed_in_seconds) / f64::from(self.duration_in_seconds)).min(1.0)
    }

    fn stop(&mut self) {
        self.is_running = false;
        self.is_paused = false;
    }
}

impl Default for TimerSession {
    fn default() -> Self {
        Self::new(0)
    }
}

// ============================================================================
// DurationPreset
// ============================================================================

/// A one-tap countdown duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationPreset {
    /// Button label
    pub label: &'static str,
    /// Duration in seconds
    pub seconds: u32,
}

/// Presets offered by the countdown view.
pub const DURATION_PRESETS: [DurationPreset; 4] = [
    DurationPreset { label: "5 min", seconds: 300 },
    DurationPreset { label: "10 min", seconds: 600 },
    DurationPreset { label: "15 min", seconds: 900 },
    DurationPreset { label: "25 min", seconds: 1500 },
];

/// Looks up a preset by its length in minutes.
pub fn find_preset(minutes: u32) -> Option<DurationPreset> {
    let seconds = minutes.checked_mul(60)?;
    DURATION_PRESETS
        .iter()
        .copied()
        .find(|preset| preset.seconds == seconds)
}

// ============================================================================
// Settings
// ============================================================================

/// Color theme of the views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    /// Returns the string representation of the theme.
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Returns the other theme.
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn is_dark(&self) -> bool {
        *self == Theme::Dark
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme '{other}' (expected light or dark)")),
        }
    }
}

/// Persisted user preferences.
///
/// Missing fields fall back to their defaults so older records without
/// `theme` still load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Play a sound with alerts
    pub sound_enabled: bool,
    /// Pulse on alerts
    pub vibration_enabled: bool,
    /// View theme; an unreadable value falls back to the default alone
    #[serde(deserialize_with = "theme_or_default")]
    pub theme: Theme,
}

fn theme_or_default<'de, D>(deserializer: D) -> Result<Theme, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            vibration_enabled: true,
            theme: Theme::Dark,
        }
    }
}

/// A toggleable settings field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsField {
    Sound,
    Vibration,
    Theme,
}

impl SettingsField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingsField::Sound => "sound",
            SettingsField::Vibration => "vibration",
            SettingsField::Theme => "theme",
        }
    }
}

impl FromStr for SettingsField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sound" => Ok(SettingsField::Sound),
            "vibration" => Ok(SettingsField::Vibration),
            "theme" => Ok(SettingsField::Theme),
            other => Err(format!(
                "unknown setting '{other}' (expected sound, vibration or theme)"
            )),
        }
    }
}

impl Settings {
    /// Flips one field in place.
    pub fn toggle(&mut self, field: SettingsField) {
        match field {
            SettingsField::Sound => self.sound_enabled = !self.sound_enabled,
            SettingsField::Vibration => self.vibration_enabled = !self.vibration_enabled,
            SettingsField::Theme => self.theme = self.theme.toggled(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
