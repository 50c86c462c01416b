//! Display utilities for the TimeFlex CLI.
//!
//! This module renders:
//! - The countdown and stopwatch views
//! - Which controls are currently enabled
//! - Settings and presets listings
//! - Error messages

use std::io::Write;

use tracing::debug;

use crate::format::{format_time, progress_bar};
use crate::types::{Settings, Theme, TimerMode, TimerSession, TimerStatus, DURATION_PRESETS};

/// Width of the countdown progress bar.
const PROGRESS_WIDTH: usize = 24;

const RESET: &str = "\x1b[0m";

// ============================================================================
// Controls
// ============================================================================

/// Which user intents are currently allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub can_start: bool,
    pub can_pause: bool,
    pub can_resume: bool,
    pub can_reset: bool,
    /// Presets and the picker
    pub can_configure: bool,
}

impl Controls {
    /// Computes the enabled controls for a session.
    pub fn for_session(session: &TimerSession) -> Self {
        let idle = !session.is_running && !session.is_paused;
        let has_target = match session.mode {
            TimerMode::Countdown => session.duration_in_seconds > 0 && !session.is_completed(),
            TimerMode::Stopwatch => true,
        };

        Self {
            can_start: idle && has_target,
            can_pause: session.is_ticking(),
            can_resume: session.is_paused,
            can_reset: !idle || session.elapsed_in_seconds > 0,
            can_configure: idle,
        }
    }
}

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    /// Renders the countdown view as a single line.
    pub fn render_countdown(session: &TimerSession, theme: Theme) -> String {
        let mut line = format!(
            "{}{}{}",
            accent(theme),
            format_time(session.remaining_seconds()),
            RESET
        );

        match session.status() {
            TimerStatus::Completed => line.push_str("  Time's Up!"),
            TimerStatus::Running | TimerStatus::Paused => {
                line.push_str("  ");
                line.push_str(&progress_bar(session.progress(), PROGRESS_WIDTH));
                if session.is_paused {
                    line.push_str("  Paused");
                }
            }
            TimerStatus::Idle => {}
        }

        line
    }

    /// Renders the stopwatch view as a single line.
    pub fn render_stopwatch(session: &TimerSession, theme: Theme) -> String {
        let mut line = format!(
            "{}{}{}",
            accent(theme),
            format_time(session.elapsed_in_seconds),
            RESET
        );

        if let Some(label) = stopwatch_label(session) {
            line.push_str("  ");
            line.push_str(label);
        }

        line
    }

    /// Renders the view matching the session's mode.
    pub fn render_session(session: &TimerSession, theme: Theme) -> String {
        match session.mode {
            TimerMode::Countdown => Self::render_countdown(session, theme),
            TimerMode::Stopwatch => Self::render_stopwatch(session, theme),
        }
    }

    /// Renders the hint line listing enabled controls.
    pub fn render_controls(session: &TimerSession) -> String {
        let controls = Controls::for_session(session);
        let mut hints = Vec::new();

        if controls.can_start {
            hints.push("[s]tart");
        }
        if controls.can_pause {
            hints.push("[p]ause");
        }
        if controls.can_resume {
            hints.push("[r]esume");
        }
        if controls.can_reset {
            hints.push("[x] reset");
        }
        if controls.can_configure && session.mode == TimerMode::Countdown {
            hints.push("[d <time>] duration");
            hints.push("[5|10|15|25] preset");
        }
        hints.push("[q]uit");

        hints.join("  ")
    }

    /// Redraws the session line in place.
    pub fn show_session(session: &TimerSession, theme: Theme) {
        let mut stdout = std::io::stdout().lock();
        let line = Self::render_session(session, theme);
        if let Err(e) = write!(stdout, "\r{}\x1b[K", line).and_then(|()| stdout.flush()) {
            debug!("Failed to redraw session line: {}", e);
        }
    }

    /// Shows the controls on their own line.
    pub fn show_controls(session: &TimerSession) {
        println!("\r\n{}", Self::render_controls(session));
    }

    /// Shows the current settings.
    pub fn show_settings(settings: &Settings) {
        println!("TimeFlex settings");
        println!("─────────────────");
        println!("Sound alerts: {}", on_off(settings.sound_enabled));
        println!("Vibration:    {}", on_off(settings.vibration_enabled));
        println!("Theme:        {}", settings.theme.as_str());
    }

    /// Shows the duration presets.
    pub fn show_presets() {
        for preset in DURATION_PRESETS {
            println!("{:>6}  {}", preset.label, format_time(preset.seconds));
        }
    }

    /// Shows the result of the test notification.
    pub fn show_test_notification_success() {
        println!("* Test notification sent!");
    }

    /// Shows a notice about an intent that is currently disabled.
    pub fn show_notice(message: &str) {
        println!("\r\n{}", message);
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("Error: {}", message);
    }
}

fn stopwatch_label(session: &TimerSession) -> Option<&'static str> {
    match (session.is_running, session.is_paused) {
        (true, false) => Some("Running"),
        (true, true) => Some("Paused"),
        _ if session.elapsed_in_seconds > 0 => Some("Stopped"),
        _ => None,
    }
}

fn accent(theme: Theme) -> &'static str {
    match theme {
        Theme::Dark => "\x1b[1;97m",
        Theme::Light => "\x1b[1;30m",
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "on"
    } else {
        "off"
    }
}

// ============================================================================
// Tests
// ============================================================================
