//! Interactive foreground session.
//!
//! Reads one intent per stdin line, forwards it to the [`TimerController`]
//! if the current controls allow it, and redraws on every timer event.

use std::sync::Arc;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info};

use super::display::{Controls, Display};
use super::picker::TimePicker;
use crate::engine::{TimerController, TimerEvent};
use crate::format::parse_time_input;
use crate::settings::SettingsStore;
use crate::types::{find_preset, TimerMode, TimerSession};

// ============================================================================
// Intent
// ============================================================================

/// A user intent typed at the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Start,
    Pause,
    Resume,
    /// Start, pause or resume depending on state (empty line)
    Toggle,
    Reset,
    /// Set a countdown duration in seconds (zero is rejected when applied)
    SetDuration(u32),
    Quit,
}

/// Parses one input line.
pub fn parse_intent(line: &str) -> Result<Intent, String> {
    let line = line.trim();
    let (word, rest) = line.split_once(' ').unwrap_or((line, ""));

    match word.to_ascii_lowercase().as_str() {
        "" => Ok(Intent::Toggle),
        "s" | "start" => Ok(Intent::Start),
        "p" | "pause" => Ok(Intent::Pause),
        "r" | "resume" => Ok(Intent::Resume),
        "x" | "reset" => Ok(Intent::Reset),
        "q" | "quit" | "exit" => Ok(Intent::Quit),
        "d" | "duration" => Ok(Intent::SetDuration(parse_time_input(rest))),
        other => match other.parse::<u32>().ok().and_then(find_preset) {
            Some(preset) => Ok(Intent::SetDuration(preset.seconds)),
            None => Err(format!("unknown command '{line}'")),
        },
    }
}

/// Resolves an intent against the enabled controls.
///
/// Returns `Err` with a notice when the intent is currently disabled.
pub fn gate(intent: Intent, session: &TimerSession) -> Result<Intent, &'static str> {
    let controls = Controls::for_session(session);

    match intent {
        Intent::Toggle if controls.can_pause => Ok(Intent::Pause),
        Intent::Toggle if controls.can_resume => Ok(Intent::Resume),
        Intent::Toggle | Intent::Start if controls.can_start => Ok(Intent::Start),
        Intent::Toggle | Intent::Start => match session.mode {
            TimerMode::Countdown if session.is_completed() => Err("Reset before starting again"),
            TimerMode::Countdown => Err("Set a duration first"),
            TimerMode::Stopwatch => Err("Already running"),
        },
        Intent::Pause if controls.can_pause => Ok(intent),
        Intent::Pause => Err("Nothing to pause"),
        Intent::Resume if controls.can_resume => Ok(intent),
        Intent::Resume => Err("Not paused"),
        Intent::Reset if controls.can_reset => Ok(intent),
        Intent::Reset => Err("Nothing to reset"),
        Intent::SetDuration(_) if session.mode == TimerMode::Stopwatch => {
            Err("The stopwatch has no duration")
        }
        Intent::SetDuration(_) if !controls.can_configure => Err("Reset before changing duration"),
        Intent::SetDuration(seconds) => {
            // zero check only; the typed value is not clamped
            let picker = TimePicker::with_values(seconds / 3600, seconds / 60 % 60, seconds % 60);
            if picker.can_confirm() {
                Ok(intent)
            } else {
                Err("Duration must be greater than zero")
            }
        }
        Intent::Quit => Ok(intent),
    }
}

// ============================================================================
// Runner
// ============================================================================

/// Runs a session in the foreground until quit, Ctrl-C or end of input.
pub async fn run_interactive(
    mut controller: TimerController,
    mut events: mpsc::UnboundedReceiver<TimerEvent>,
    settings: Arc<SettingsStore>,
    mode: TimerMode,
    duration: Option<u32>,
) -> Result<()> {
    controller.set_mode(mode).await;
    if let Some(seconds) = duration {
        controller.set_duration(seconds).await;
    }

    let session = controller.session().await;
    Display::show_controls(&session);
    Display::show_session(&session, settings.get().theme);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    debug!("stdin closed");
                    break;
                };
                if !handle_line(&mut controller, &line).await {
                    break;
                }
                let session = controller.session().await;
                Display::show_controls(&session);
                Display::show_session(&session, settings.get().theme);
            }
            Some(event) = events.recv() => {
                let session = controller.session().await;
                if let TimerEvent::Completed { duration_seconds } = event {
                    info!("Completed {}s countdown", duration_seconds);
                }
                if changes_controls(&event) {
                    Display::show_controls(&session);
                }
                Display::show_session(&session, settings.get().theme);
            }
            _ = tokio::signal::ctrl_c() => {
                debug!("Interrupted");
                break;
            }
        }
    }

    controller.shutdown();
    println!();
    Ok(())
}

/// Returns true if the event changes which controls are enabled.
///
/// Intents typed at the prompt redraw the controls themselves, so only
/// events raised by the tick task count here.
fn changes_controls(event: &TimerEvent) -> bool {
    matches!(event, TimerEvent::Completed { .. })
}

/// Applies one input line. Returns false on quit.
async fn handle_line(controller: &mut TimerController, line: &str) -> bool {
    let intent = match parse_intent(line) {
        Ok(intent) => intent,
        Err(message) => {
            Display::show_notice(&message);
            return true;
        }
    };

    let session = controller.session().await;
    let intent = match gate(intent, &session) {
        Ok(intent) => intent,
        Err(notice) => {
            Display::show_notice(notice);
            return true;
        }
    };

    match intent {
        Intent::Start => controller.start().await,
        Intent::Pause => controller.pause().await,
        Intent::Resume => controller.resume().await,
        Intent::Reset => controller.reset().await,
        Intent::SetDuration(seconds) => controller.set_duration(seconds).await,
        Intent::Toggle => {}
        Intent::Quit => return false,
    }
    true
}
