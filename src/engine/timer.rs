//! Timer engine for TimeFlex.
//!
//! This module owns the single [`TimerSession`] and applies user intents to
//! it:
//! - State transitions (idle → running ⇄ paused → completed/idle)
//! - One-second ticks delivered by the tick task
//! - Event publishing for views
//! - Exactly one completion alert per finished countdown

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::alert::{CompletionAlert, COMPLETION_MESSAGE};
use crate::types::{TickOutcome, TimerMode, TimerSession};

// ============================================================================
// TimerEvent
// ============================================================================

/// Timer events for views and external integrations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerEvent {
    /// Session started ticking
    Started,
    /// Session paused
    Paused,
    /// Session resumed
    Resumed,
    /// Session returned to idle
    Reset,
    /// Countdown target changed
    DurationSet {
        /// New target in seconds
        seconds: u32,
    },
    /// Counting mode changed
    ModeChanged {
        /// New mode
        mode: TimerMode,
    },
    /// One second elapsed
    Tick {
        /// Elapsed seconds after this tick
        elapsed_seconds: u32,
    },
    /// Countdown reached its target
    Completed {
        /// Target that was reached
        duration_seconds: u32,
    },
}

// ============================================================================
// TimerEngine
// ============================================================================

/// Timer engine that manages the session state and events.
///
/// None of the operations can fail. The engine does not schedule ticks
/// itself; see [`TickHandle`](super::TickHandle).
pub struct TimerEngine {
    /// The live session
    session: TimerSession,
    /// Event sender channel
    event_tx: mpsc::UnboundedSender<TimerEvent>,
    /// Completion side effects
    alerts: Arc<dyn CompletionAlert>,
}

impl TimerEngine {
    /// Creates an engine with an idle countdown session of zero duration.
    pub fn new(
        event_tx: mpsc::UnboundedSender<TimerEvent>,
        alerts: Arc<dyn CompletionAlert>,
    ) -> Self {
        let session = TimerSession::default();
        debug!("Created timer session {}", session.id);
        Self {
            session,
            event_tx,
            alerts,
        }
    }

    /// Starts ticking.
    ///
    /// Callers gate zero-duration countdowns; the engine accepts them and
    /// completes on the first tick.
    pub fn start(&mut self) {
        self.session.start();
        self.emit(TimerEvent::Started);
    }

    /// Pauses a running session. Ignored when not running.
    pub fn pause(&mut self) {
        if !self.session.is_running {
            debug!("Pause ignored: session is not running");
            return;
        }
        self.session.pause();
        self.emit(TimerEvent::Paused);
    }

    /// Resumes a paused session.
    pub fn resume(&mut self) {
        self.session.resume();
        self.emit(TimerEvent::Resumed);
    }

    /// Returns to idle, keeping mode and duration.
    pub fn reset(&mut self) {
        self.session.reset();
        self.emit(TimerEvent::Reset);
    }

    /// Sets the countdown target. Cancels any run in progress.
    pub fn set_duration(&mut self, seconds: u32) {
        self.session.set_duration(seconds);
        self.emit(TimerEvent::DurationSet { seconds });
    }

    /// Switches the counting mode. Cancels any run in progress.
    pub fn set_mode(&mut self, mode: TimerMode) {
        self.session.set_mode(mode);
        self.emit(TimerEvent::ModeChanged { mode });
    }

    /// Delivers one tick.
    ///
    /// On completion the session is already stopped when the alert fires, so
    /// a slow or failing alert cannot roll it back or trigger a second one.
    pub fn tick(&mut self) -> TickOutcome {
        let outcome = self.session.tick();

        match outcome {
            TickOutcome::Ignored => {}
            TickOutcome::Advanced => {
                self.emit(TimerEvent::Tick {
                    elapsed_seconds: self.session.elapsed_in_seconds,
                });
            }
            TickOutcome::Completed => {
                let duration_seconds = self.session.duration_in_seconds;
                info!("Countdown of {}s completed", duration_seconds);
                self.emit(TimerEvent::Tick {
                    elapsed_seconds: self.session.elapsed_in_seconds,
                });
                self.emit(TimerEvent::Completed { duration_seconds });
                self.alerts.notify_completion(COMPLETION_MESSAGE);
            }
        }

        outcome
    }

    /// Returns a reference to the current session.
    pub fn session(&self) -> &TimerSession {
        &self.session
    }

    fn emit(&self, event: TimerEvent) {
        if self.event_tx.send(event).is_err() {
            debug!("Timer event dropped: no listener");
        }
    }
}

impl std::fmt::Debug for TimerEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerEngine")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::RecordingAlert;
    use crate::types::TimerStatus;

    fn create_engine() -> (
        TimerEngine,
        mpsc::UnboundedReceiver<TimerEvent>,
        Arc<RecordingAlert>,
    ) {
        let (tx, rx) = mpsc::unbounded_channel();
        let alerts = Arc::new(RecordingAlert::new());
        let engine = TimerEngine::new(tx, alerts.clone());
        (engine, rx, alerts)
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<TimerEvent>) -> Vec<TimerEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[test]
    fn test_new_engine() {
        let (engine, _rx, _alerts) = create_engine();
        let session = engine.session();

        assert_eq!(session.mode, TimerMode::Countdown);
        assert_eq!(session.duration_in_seconds, 0);
        assert_eq!(session.status(), TimerStatus::Idle);
    }

    #[test]
    fn test_start_pause_resume_events() {
        let (mut engine, mut rx, _alerts) = create_engine();
        engine.set_duration(60);
        engine.start();
        engine.pause();
        engine.resume();

        assert_eq!(
            drain(&mut rx),
            vec![
                TimerEvent::DurationSet { seconds: 60 },
                TimerEvent::Started,
                TimerEvent::Paused,
                TimerEvent::Resumed,
            ]
        );
        assert_eq!(engine.session().status(), TimerStatus::Running);
    }

    #[test]
    fn test_pause_when_idle_is_ignored() {
        let (mut engine, mut rx, _alerts) = create_engine();
        engine.pause();

        assert!(drain(&mut rx).is_empty());
        assert!(!engine.session().is_paused);
    }

    #[test]
    fn test_two_second_countdown_completes_once() {
        let (mut engine, mut rx, alerts) = create_engine();
        engine.set_duration(2);
        engine.start();
        let _ = drain(&mut rx);

        assert_eq!(engine.tick(), TickOutcome::Advanced);
        assert_eq!(engine.tick(), TickOutcome::Completed);

        let session = engine.session();
        assert_eq!(session.elapsed_in_seconds, 2);
        assert_eq!(session.duration_in_seconds, 2);
        assert!(!session.is_running);
        assert!(!session.is_paused);
        assert_eq!(alerts.messages(), vec!["Time's Up!".to_string()]);

        assert_eq!(
            drain(&mut rx),
            vec![
                TimerEvent::Tick { elapsed_seconds: 1 },
                TimerEvent::Tick { elapsed_seconds: 2 },
                TimerEvent::Completed { duration_seconds: 2 },
            ]
        );
    }

    #[test]
    fn test_ticks_after_completion_do_not_alert_again() {
        let (mut engine, _rx, alerts) = create_engine();
        engine.set_duration(1);
        engine.start();

        engine.tick();
        engine.tick();
        engine.tick();

        assert_eq!(alerts.count(), 1);
    }

    #[test]
    fn test_restart_after_completion_is_a_new_run() {
        let (mut engine, _rx, alerts) = create_engine();
        engine.set_duration(1);
        engine.start();
        engine.tick();
        engine.reset();
        engine.start();
        engine.tick();

        assert_eq!(alerts.count(), 2);
    }

    #[test]
    fn test_paused_session_ignores_ticks() {
        let (mut engine, mut rx, _alerts) = create_engine();
        engine.set_mode(TimerMode::Stopwatch);
        engine.start();
        engine.tick();
        engine.pause();
        let _ = drain(&mut rx);

        for _ in 0..3 {
            assert_eq!(engine.tick(), TickOutcome::Ignored);
        }

        assert_eq!(engine.session().elapsed_in_seconds, 1);
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn test_set_duration_mid_run_returns_to_idle() {
        let (mut engine, _rx, alerts) = create_engine();
        engine.set_duration(10);
        engine.start();
        engine.tick();

        engine.set_duration(5);

        let session = engine.session();
        assert_eq!(session.elapsed_in_seconds, 0);
        assert_eq!(session.status(), TimerStatus::Idle);
        assert_eq!(engine.tick(), TickOutcome::Ignored);
        assert_eq!(alerts.count(), 0);
    }

    #[test]
    fn test_set_mode_mid_run_returns_to_idle() {
        let (mut engine, mut rx, _alerts) = create_engine();
        engine.set_duration(10);
        engine.start();
        engine.tick();
        let _ = drain(&mut rx);

        engine.set_mode(TimerMode::Stopwatch);

        assert_eq!(engine.session().elapsed_in_seconds, 0);
        assert_eq!(engine.session().status(), TimerStatus::Idle);
        assert_eq!(
            drain(&mut rx),
            vec![TimerEvent::ModeChanged {
                mode: TimerMode::Stopwatch
            }]
        );
    }

    #[test]
    fn test_closed_event_channel_does_not_affect_state() {
        let (mut engine, rx, alerts) = create_engine();
        drop(rx);

        engine.set_duration(1);
        engine.start();
        assert_eq!(engine.tick(), TickOutcome::Completed);
        assert_eq!(alerts.count(), 1);
    }

    #[test]
    fn test_zero_duration_completes_on_first_tick() {
        let (mut engine, _rx, alerts) = create_engine();
        engine.start();

        assert_eq!(engine.tick(), TickOutcome::Completed);
        assert_eq!(alerts.count(), 1);
    }
}
