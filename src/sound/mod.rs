//! Sound playback for TimeFlex alerts.
//!
//! This module provides the audible half of a completion alert:
//!
//! - A terminal bell player that works everywhere
//! - A rodio chime player behind the `audio` feature
//! - A mock player for tests
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │   SoundPlayer    │ ← used by the AlertDispatcher
//! └────────┬─────────┘
//!          │
//!          ├──────────▶ RodioSoundPlayer  (feature "audio")
//!          │
//!          └──────────▶ TerminalBellPlayer (fallback)
//! ```

mod error;
#[cfg(feature = "audio")]
mod player;

use std::io::Write;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

pub use error::SoundError;
#[cfg(feature = "audio")]
pub use player::{try_create_player, RodioSoundPlayer};

/// Trait for sound playback implementations.
pub trait SoundPlayer: Send + Sync {
    /// Plays the alert sound.
    ///
    /// This method should be non-blocking; the sound plays in the background.
    ///
    /// # Errors
    ///
    /// Returns an error if playback could not be started.
    fn play(&self) -> Result<(), SoundError>;

    /// Returns a short name for logging.
    fn name(&self) -> &'static str;
}

#[cfg(feature = "audio")]
impl SoundPlayer for RodioSoundPlayer {
    fn play(&self) -> Result<(), SoundError> {
        RodioSoundPlayer::play(self)
    }

    fn name(&self) -> &'static str {
        "rodio"
    }
}

/// Rings the terminal bell (BEL, `0x07`) on stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalBellPlayer;

impl SoundPlayer for TerminalBellPlayer {
    fn play(&self) -> Result<(), SoundError> {
        let mut stdout = std::io::stdout().lock();
        stdout
            .write_all(b"\x07")
            .and_then(|()| stdout.flush())
            .map_err(|e| SoundError::TerminalError(e.to_string()))
    }

    fn name(&self) -> &'static str {
        "terminal-bell"
    }
}

/// Returns the best available player.
///
/// With the `audio` feature this probes for an output device and falls back
/// to the terminal bell when none is found.
pub fn default_player() -> Arc<dyn SoundPlayer> {
    #[cfg(feature = "audio")]
    if let Some(player) = try_create_player() {
        return Arc::new(player);
    }
    Arc::new(TerminalBellPlayer)
}

/// Mock sound player for testing.
#[derive(Debug, Default)]
pub struct MockSoundPlayer {
    play_count: AtomicUsize,
    should_fail: AtomicBool,
}

impl MockSoundPlayer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    #[must_use]
    pub fn play_count(&self) -> usize {
        self.play_count.load(Ordering::SeqCst)
    }
}

impl SoundPlayer for MockSoundPlayer {
    fn play(&self) -> Result<(), SoundError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(SoundError::PlaybackError("Mock failure".to_string()));
        }
        self.play_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
