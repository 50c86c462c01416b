//! Async facade over the engine and its tick task.
//!
//! Every intent locks the engine, applies the transition, then arms or
//! disarms the tick task to match the new state. This keeps the pairing
//! exact: the task is alive iff the session is running and not paused
//! (up to a task that is finishing after completion).

use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};

use super::ticker::TickHandle;
use super::timer::{TimerEngine, TimerEvent};
use crate::alert::CompletionAlert;
use crate::types::{TimerMode, TimerSession};

/// Drives a [`TimerEngine`] from user intents.
#[derive(Debug)]
pub struct TimerController {
    engine: Arc<Mutex<TimerEngine>>,
    ticker: TickHandle,
}

impl TimerController {
    /// Wraps an existing engine.
    pub fn new(engine: TimerEngine) -> Self {
        Self::with_ticker(engine, TickHandle::new())
    }

    /// Wraps an engine with a custom tick handle.
    pub fn with_ticker(engine: TimerEngine, ticker: TickHandle) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
            ticker,
        }
    }

    /// Builds an engine and returns the controller with its event receiver.
    pub fn create(
        alerts: Arc<dyn CompletionAlert>,
    ) -> (Self, mpsc::UnboundedReceiver<TimerEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(TimerEngine::new(tx, alerts)), rx)
    }

    pub async fn start(&mut self) {
        self.apply(TimerEngine::start).await;
    }

    pub async fn pause(&mut self) {
        self.apply(TimerEngine::pause).await;
    }

    pub async fn resume(&mut self) {
        self.apply(TimerEngine::resume).await;
    }

    pub async fn reset(&mut self) {
        self.apply(TimerEngine::reset).await;
    }

    pub async fn set_duration(&mut self, seconds: u32) {
        self.apply(|engine| engine.set_duration(seconds)).await;
    }

    pub async fn set_mode(&mut self, mode: TimerMode) {
        self.apply(|engine| engine.set_mode(mode)).await;
    }

    /// Returns a snapshot of the session.
    pub async fn session(&self) -> TimerSession {
        self.engine.lock().await.session().clone()
    }

    /// Returns the shared engine.
    pub fn engine(&self) -> Arc<Mutex<TimerEngine>> {
        Arc::clone(&self.engine)
    }

    /// Returns true while the tick task is alive.
    pub fn is_ticking(&self) -> bool {
        self.ticker.is_armed()
    }

    /// Stops the tick task without touching the session.
    pub fn shutdown(&mut self) {
        self.ticker.disarm();
    }

    async fn apply(&mut self, transition: impl FnOnce(&mut TimerEngine)) {
        let mut engine = self.engine.lock().await;
        transition(&mut *engine);

        if engine.session().is_ticking() {
            self.ticker.arm(Arc::clone(&self.engine));
        } else {
            self.ticker.disarm();
        }
    }
}
