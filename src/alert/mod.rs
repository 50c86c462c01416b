//! Completion alerts.
//!
//! The [`AlertDispatcher`] turns a completion message into side effects:
//!
//! - a haptic pulse, if vibration is enabled
//! - a local notification titled with the application name
//! - the alert sound, if sound is enabled
//!
//! Settings are read at dispatch time through a `watch` receiver, so toggles
//! take effect on the next alert without rebuilding the dispatcher.
//!
//! # Error Handling
//!
//! Every step runs even if an earlier one failed. Failures are logged; the
//! completion path discards them while [`AlertDispatcher::send_test_notification`]
//! returns the first one so a user-initiated action can report it.

mod content;
pub mod error;

use std::io::Write;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, warn};

pub use self::content::{
    sanitize_body, NotificationContent, NotificationContentBuilder, APP_NAME,
    COMPLETION_MESSAGE, TEST_MESSAGE,
};
pub use self::error::AlertError;

use crate::sound::SoundPlayer;
use crate::types::Settings;

// ============================================================================
// Seams
// ============================================================================

/// Delivers a local notification immediately.
pub trait Notifier: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the notification could not be delivered.
    fn send(&self, content: &NotificationContent) -> Result<(), AlertError>;
}

/// Receives countdown completions from the timer engine.
///
/// Implementations must not fail back into the engine.
pub trait CompletionAlert: Send + Sync {
    fn notify_completion(&self, message: &str);
}

/// Triggers a single haptic pulse.
pub trait Haptics: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the pulse could not be triggered.
    fn pulse(&self) -> Result<(), AlertError>;
}

// ============================================================================
// AlertDispatcher
// ============================================================================

/// Dispatches completion alerts gated by the current settings.
pub struct AlertDispatcher {
    settings: watch::Receiver<Settings>,
    notifier: Arc<dyn Notifier>,
    haptics: Arc<dyn Haptics>,
    sound: Arc<dyn SoundPlayer>,
}

impl AlertDispatcher {
    /// Creates a dispatcher reading settings from `settings`.
    pub fn new(
        settings: watch::Receiver<Settings>,
        notifier: Arc<dyn Notifier>,
        haptics: Arc<dyn Haptics>,
        sound: Arc<dyn SoundPlayer>,
    ) -> Self {
        Self {
            settings,
            notifier,
            haptics,
            sound,
        }
    }

    /// Alerts that a countdown finished. Never fails.
    pub fn notify_completion(&self, message: &str) {
        if let Err(e) = self.dispatch(message) {
            debug!("Completion alert finished with error: {}", e);
        }
    }

    /// Sends the test notification from the settings screen.
    ///
    /// # Errors
    ///
    /// Returns the first dispatch failure.
    pub fn send_test_notification(&self) -> Result<(), AlertError> {
        self.dispatch(TEST_MESSAGE)
    }

    /// Runs every alert step, returning the first failure.
    fn dispatch(&self, message: &str) -> Result<(), AlertError> {
        let settings = *self.settings.borrow();
        let mut first_error = None;

        if settings.vibration_enabled {
            if let Err(e) = self.haptics.pulse() {
                warn!("Haptic pulse failed: {}", e);
                first_error.get_or_insert(e);
            }
        }

        let content = NotificationContentBuilder::new()
            .body(message)
            .sound(settings.sound_enabled)
            .build();

        if let Err(e) = self.notifier.send(&content) {
            warn!("Notification failed: {}", e);
            first_error.get_or_insert(e);
        }

        if content.sound {
            if let Err(e) = self.sound.play() {
                warn!("Alert sound via {} failed: {}", self.sound.name(), e);
                first_error.get_or_insert(e.into());
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl CompletionAlert for AlertDispatcher {
    fn notify_completion(&self, message: &str) {
        AlertDispatcher::notify_completion(self, message);
    }
}

impl std::fmt::Debug for AlertDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlertDispatcher")
            .field("settings", &*self.settings.borrow())
            .field("sound", &self.sound.name())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Terminal backends
// ============================================================================

/// Prints notifications as a banner line on stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn send(&self, content: &NotificationContent) -> Result<(), AlertError> {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "\r\n[{}] {}", content.title, content.body)
            .and_then(|()| stdout.flush())
            .map_err(|e| AlertError::SendFailed(e.to_string()))
    }
}

/// Flashes the terminal (visual bell) as the closest thing to a vibration.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalHaptics;

/// How long the screen stays inverted.
const FLASH_DURATION_MS: u64 = 150;

impl Haptics for TerminalHaptics {
    fn pulse(&self) -> Result<(), AlertError> {
        write_stdout(b"\x1b[?5h")?;
        thread::Builder::new()
            .name("timeflex-flash".to_string())
            .spawn(|| {
                thread::sleep(Duration::from_millis(FLASH_DURATION_MS));
                if let Err(e) = write_stdout(b"\x1b[?5l") {
                    warn!("Failed to restore screen after flash: {}", e);
                }
            })
            .map_err(|e| AlertError::HapticFailed(e.to_string()))?;
        Ok(())
    }
}

fn write_stdout(bytes: &[u8]) -> Result<(), AlertError> {
    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(bytes)
        .and_then(|()| stdout.flush())
        .map_err(|e| AlertError::HapticFailed(e.to_string()))
}

// ============================================================================
// Mocks
// ============================================================================

/// Mock notifier for testing.
#[derive(Debug, Default)]
pub struct MockNotifier {
    sent: Mutex<Vec<NotificationContent>>,
    should_fail: AtomicBool,
}

impl MockNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    #[must_use]
    pub fn sent(&self) -> Vec<NotificationContent> {
        self.sent.lock().unwrap().clone()
    }

    #[must_use]
    pub fn send_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

impl Notifier for MockNotifier {
    fn send(&self, content: &NotificationContent) -> Result<(), AlertError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(AlertError::PermissionDenied);
        }
        self.sent.lock().unwrap().push(content.clone());
        Ok(())
    }
}

/// Records completion messages for testing.
#[derive(Debug, Default)]
pub struct RecordingAlert {
    messages: Mutex<Vec<String>>,
}

impl RecordingAlert {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.messages.lock().unwrap().len()
    }
}

impl CompletionAlert for RecordingAlert {
    fn notify_completion(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}

/// Mock haptics for testing.
#[derive(Debug, Default)]
pub struct MockHaptics {
    pulses: AtomicUsize,
    should_fail: AtomicBool,
}

impl MockHaptics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    #[must_use]
    pub fn pulse_count(&self) -> usize {
        self.pulses.load(Ordering::SeqCst)
    }
}

impl Haptics for MockHaptics {
    fn pulse(&self) -> Result<(), AlertError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(AlertError::HapticFailed("Mock failure".to_string()));
        }
        self.pulses.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
