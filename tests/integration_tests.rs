//! Integration tests for the timer engine, alerts and settings together.
//!
//! These tests wire a [`TimerController`] to a real [`AlertDispatcher`]
//! backed by mocks and drive it with a paused clock.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::time::{sleep, Duration};

use timeflex::alert::{AlertDispatcher, MockHaptics, MockNotifier, TEST_MESSAGE};
use timeflex::engine::{TimerController, TimerEvent};
use timeflex::settings::{MemoryKeyValueStore, SettingsStore};
use timeflex::sound::MockSoundPlayer;
use timeflex::types::{SettingsField, TimerMode, TimerStatus};

// ============================================================================
// Test Helpers
// ============================================================================

struct Harness {
    controller: TimerController,
    events: mpsc::UnboundedReceiver<TimerEvent>,
    store: Arc<SettingsStore>,
    dispatcher: Arc<AlertDispatcher>,
    notifier: Arc<MockNotifier>,
    haptics: Arc<MockHaptics>,
    sound: Arc<MockSoundPlayer>,
}

fn harness() -> Harness {
    let store = Arc::new(SettingsStore::new(Arc::new(MemoryKeyValueStore::new())));
    let notifier = Arc::new(MockNotifier::new());
    let haptics = Arc::new(MockHaptics::new());
    let sound = Arc::new(MockSoundPlayer::new());
    let dispatcher = Arc::new(AlertDispatcher::new(
        store.subscribe(),
        notifier.clone(),
        haptics.clone(),
        sound.clone(),
    ));
    let (controller, events) = TimerController::create(dispatcher.clone());

    Harness {
        controller,
        events,
        store,
        dispatcher,
        notifier,
        haptics,
        sound,
    }
}

fn drain(events: &mut mpsc::UnboundedReceiver<TimerEvent>) -> Vec<TimerEvent> {
    let mut out = Vec::new();
    while let Ok(event) = events.try_recv() {
        out.push(event);
    }
    out
}

// ============================================================================
// Countdown
// ============================================================================

mod countdown_flow {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn countdown_completes_and_alerts_once() {
        let mut h = harness();

        h.controller.set_duration(2).await;
        h.controller.start().await;
        sleep(Duration::from_secs(10)).await;

        let session = h.controller.session().await;
        assert_eq!(session.status(), TimerStatus::Completed);
        assert_eq!(session.elapsed_in_seconds, 2);

        assert_eq!(h.notifier.send_count(), 1);
        assert_eq!(h.notifier.sent()[0].body, "Time's Up!");
        assert_eq!(h.haptics.pulse_count(), 1);
        assert_eq!(h.sound.play_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn countdown_event_sequence() {
        let mut h = harness();

        h.controller.set_duration(2).await;
        h.controller.start().await;
        sleep(Duration::from_millis(2500)).await;

        assert_eq!(
            drain(&mut h.events),
            vec![
                TimerEvent::DurationSet { seconds: 2 },
                TimerEvent::Started,
                TimerEvent::Tick { elapsed_seconds: 1 },
                TimerEvent::Tick { elapsed_seconds: 2 },
                TimerEvent::Completed { duration_seconds: 2 },
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn paused_countdown_does_not_complete() {
        let mut h = harness();

        h.controller.set_duration(3).await;
        h.controller.start().await;
        sleep(Duration::from_millis(1500)).await;
        h.controller.pause().await;
        sleep(Duration::from_secs(10)).await;

        let session = h.controller.session().await;
        assert_eq!(session.elapsed_in_seconds, 1);
        assert_eq!(session.status(), TimerStatus::Paused);
        assert_eq!(h.notifier.send_count(), 0);

        h.controller.resume().await;
        sleep(Duration::from_millis(2500)).await;
        assert_eq!(h.controller.session().await.status(), TimerStatus::Completed);
        assert_eq!(h.notifier.send_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_after_completion_allows_another_run() {
        let mut h = harness();

        h.controller.set_duration(1).await;
        h.controller.start().await;
        sleep(Duration::from_millis(1500)).await;
        h.controller.reset().await;

        let session = h.controller.session().await;
        assert_eq!(session.status(), TimerStatus::Idle);
        assert_eq!(session.duration_in_seconds, 1);

        h.controller.start().await;
        sleep(Duration::from_millis(1500)).await;
        assert_eq!(h.notifier.send_count(), 2);
    }
}

// ============================================================================
// Stopwatch
// ============================================================================

mod stopwatch_flow {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn stopwatch_never_alerts() {
        let mut h = harness();

        h.controller.set_mode(TimerMode::Stopwatch).await;
        h.controller.start().await;
        sleep(Duration::from_millis(90_500)).await;

        let session = h.controller.session().await;
        assert_eq!(session.elapsed_in_seconds, 90);
        assert!(session.is_running);
        assert_eq!(h.notifier.send_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn switching_mode_discards_progress() {
        let mut h = harness();

        h.controller.set_mode(TimerMode::Stopwatch).await;
        h.controller.start().await;
        sleep(Duration::from_millis(4500)).await;
        h.controller.set_mode(TimerMode::Countdown).await;

        let session = h.controller.session().await;
        assert_eq!(session.mode, TimerMode::Countdown);
        assert_eq!(session.elapsed_in_seconds, 0);
        assert!(!session.is_running);
        assert!(!h.controller.is_ticking());
    }
}

// ============================================================================
// Settings gating
// ============================================================================

mod settings_gating {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn disabled_sound_and_vibration_only_notify() {
        let mut h = harness();
        h.store.toggle(SettingsField::Sound).await.unwrap();
        h.store.toggle(SettingsField::Vibration).await.unwrap();

        h.controller.set_duration(1).await;
        h.controller.start().await;
        sleep(Duration::from_millis(1500)).await;

        assert_eq!(h.notifier.send_count(), 1);
        assert!(!h.notifier.sent()[0].sound);
        assert_eq!(h.haptics.pulse_count(), 0);
        assert_eq!(h.sound.play_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn settings_change_mid_run_applies_at_completion() {
        let mut h = harness();

        h.controller.set_duration(2).await;
        h.controller.start().await;
        sleep(Duration::from_millis(1500)).await;
        // the in-memory mirror changes immediately; the write runs detached
        drop(h.store.set_sound_enabled(false));
        sleep(Duration::from_secs(1)).await;

        assert_eq!(h.notifier.send_count(), 1);
        assert_eq!(h.sound.play_count(), 0);
        assert_eq!(h.haptics.pulse_count(), 1);
    }

    #[tokio::test]
    async fn failing_backends_do_not_break_completion() {
        let mut h = harness();
        h.notifier.set_should_fail(true);
        h.haptics.set_should_fail(true);
        h.sound.set_should_fail(true);

        h.controller.set_duration(1).await;
        let engine = h.controller.engine();
        engine.lock().await.start();
        engine.lock().await.tick();

        assert_eq!(h.controller.session().await.status(), TimerStatus::Completed);
    }

    #[tokio::test]
    async fn test_notification_reports_first_failure() {
        let h = harness();
        assert!(h.dispatcher.send_test_notification().is_ok());
        assert_eq!(h.notifier.sent()[0].body, TEST_MESSAGE);

        h.haptics.set_should_fail(true);
        let err = h.dispatcher.send_test_notification().unwrap_err();
        assert!(!err.suggestion().is_empty());
        // later steps still ran
        assert_eq!(h.notifier.send_count(), 2);
    }
}
