//! The periodic tick task.
//!
//! A [`TickHandle`] owns at most one spawned task that ticks the engine once
//! per period. Arming an armed handle is a no-op, disarming is idempotent,
//! and dropping the handle disarms it.
//!
//! A task marks itself finished while it still holds the engine lock, so a
//! caller holding that lock always sees an accurate [`TickHandle::is_armed`]
//! on any runtime flavor.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Duration, Instant, MissedTickBehavior};
use tracing::debug;

use super::timer::TimerEngine;

/// Wall time between ticks.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Explicit handle to the tick task.
#[derive(Debug)]
pub struct TickHandle {
    period: Duration,
    task: Option<TickTask>,
}

#[derive(Debug)]
struct TickTask {
    handle: JoinHandle<()>,
    /// Set by the task before it releases the engine lock for the last time
    finished: Arc<AtomicBool>,
}

impl TickHandle {
    /// Creates a disarmed handle ticking every [`TICK_PERIOD`].
    pub fn new() -> Self {
        Self::with_period(TICK_PERIOD)
    }

    /// Creates a disarmed handle with a custom period.
    pub fn with_period(period: Duration) -> Self {
        Self { period, task: None }
    }

    /// Returns true while a tick task is alive.
    pub fn is_armed(&self) -> bool {
        self.task.as_ref().is_some_and(|task| {
            !task.finished.load(Ordering::SeqCst) && !task.handle.is_finished()
        })
    }

    /// Spawns the tick task unless one is already alive.
    ///
    /// The first tick lands one full period after arming. The task ends by
    /// itself once the session stops ticking (completion).
    ///
    /// Must be called from within a tokio runtime.
    pub fn arm(&mut self, engine: Arc<Mutex<TimerEngine>>) {
        if self.is_armed() {
            return;
        }

        let period = self.period;
        let finished = Arc::new(AtomicBool::new(false));
        let done = Arc::clone(&finished);
        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            // late ticks are delivered late, never doubled up
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;

                let mut engine = engine.lock().await;
                engine.tick();
                if !engine.session().is_ticking() {
                    done.store(true, Ordering::SeqCst);
                    debug!("Tick task finished");
                    break;
                }
            }
        });
        self.task = Some(TickTask { handle, finished });
        debug!("Tick task armed");
    }

    /// Stops the tick task. Safe to call when already disarmed.
    pub fn disarm(&mut self) {
        if let Some(task) = self.task.take() {
            task.handle.abort();
            debug!("Tick task disarmed");
        }
    }
}

impl Default for TickHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TickHandle {
    fn drop(&mut self) {
        self.disarm();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::RecordingAlert;
    use crate::types::TimerMode;
    use tokio::sync::mpsc;

    fn shared_engine() -> Arc<Mutex<TimerEngine>> {
        let (tx, _rx) = mpsc::unbounded_channel();
        Arc::new(Mutex::new(TimerEngine::new(
            tx,
            Arc::new(RecordingAlert::new()),
        )))
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_handle_is_disarmed() {
        let handle = TickHandle::new();
        assert!(!handle.is_armed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_disarm_is_idempotent() {
        let mut handle = TickHandle::new();
        handle.disarm();
        handle.disarm();
        assert!(!handle.is_armed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_once_per_period() {
        let engine = shared_engine();
        {
            let mut engine = engine.lock().await;
            engine.set_mode(TimerMode::Stopwatch);
            engine.start();
        }

        let mut handle = TickHandle::new();
        handle.arm(engine.clone());
        tokio::time::sleep(Duration::from_millis(3500)).await;

        assert_eq!(engine.lock().await.session().elapsed_in_seconds, 3);
        assert!(handle.is_armed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_double_arm_keeps_single_source() {
        let engine = shared_engine();
        {
            let mut engine = engine.lock().await;
            engine.set_mode(TimerMode::Stopwatch);
            engine.start();
        }

        let mut handle = TickHandle::new();
        handle.arm(engine.clone());
        handle.arm(engine.clone());
        tokio::time::sleep(Duration::from_millis(2500)).await;

        assert_eq!(engine.lock().await.session().elapsed_in_seconds, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_task_ends_on_completion() {
        let engine = shared_engine();
        {
            let mut engine = engine.lock().await;
            engine.set_duration(1);
            engine.start();
        }

        let mut handle = TickHandle::new();
        handle.arm(engine.clone());
        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert!(!handle.is_armed());
        assert!(!engine.lock().await.session().is_running);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_completed_task_is_disarmed_once_lock_is_free() {
        let engine = shared_engine();
        {
            let mut engine = engine.lock().await;
            engine.set_duration(1);
            engine.start();
        }

        let mut handle = TickHandle::with_period(Duration::from_millis(5));
        handle.arm(engine.clone());

        loop {
            let guard = engine.lock().await;
            if !guard.session().is_running {
                assert!(!handle.is_armed());
                break;
            }
            drop(guard);
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_disarms() {
        let engine = shared_engine();
        {
            let mut engine = engine.lock().await;
            engine.set_mode(TimerMode::Stopwatch);
            engine.start();
        }

        let mut handle = TickHandle::new();
        handle.arm(engine.clone());
        drop(handle);
        tokio::time::sleep(Duration::from_millis(2500)).await;

        assert_eq!(engine.lock().await.session().elapsed_in_seconds, 0);
    }
}
