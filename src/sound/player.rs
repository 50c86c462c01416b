//! Sound player implementation using rodio.
//!
//! This module provides the `RodioSoundPlayer` which uses the rodio v0.20
//! audio library for cross-platform playback of the alert chime.

use std::thread;
use std::time::Duration;

use rodio::source::SineWave;
use rodio::{OutputStream, Sink, Source};
use tracing::{debug, warn};

use super::error::SoundError;

/// Chime pitch in Hz.
const CHIME_FREQUENCY: f32 = 880.0;

/// Chime length in milliseconds.
const CHIME_DURATION_MS: u64 = 400;

/// Chime volume multiplier.
const CHIME_VOLUME: f32 = 0.25;

/// A sound player that uses rodio for audio playback.
///
/// The output stream is opened on a short-lived background thread for each
/// chime, so the player itself stays `Send + Sync` and `play` never blocks.
#[derive(Debug)]
pub struct RodioSoundPlayer {
    _private: (),
}

impl RodioSoundPlayer {
    /// Creates a new sound player after probing for an output device.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::DeviceNotAvailable` if no audio output device
    /// is available.
    pub fn new() -> Result<Self, SoundError> {
        OutputStream::try_default().map_err(|e| SoundError::DeviceNotAvailable(e.to_string()))?;

        debug!("Audio output device detected");

        Ok(Self { _private: () })
    }

    /// Plays the alert chime in the background.
    ///
    /// # Errors
    ///
    /// Returns an error if the playback thread cannot be spawned. Device
    /// failures on the background thread are logged.
    pub fn play(&self) -> Result<(), SoundError> {
        thread::Builder::new()
            .name("timeflex-chime".to_string())
            .spawn(|| {
                if let Err(e) = play_chime() {
                    warn!("Failed to play alert chime: {}", e);
                }
            })
            .map_err(|e| SoundError::PlaybackError(e.to_string()))?;

        debug!("Sound playback started (detached)");
        Ok(())
    }
}

/// Opens the default output and plays the chime to completion.
fn play_chime() -> Result<(), SoundError> {
    let (_stream, handle) =
        OutputStream::try_default().map_err(|e| SoundError::DeviceNotAvailable(e.to_string()))?;
    let sink = Sink::try_new(&handle).map_err(|e| SoundError::StreamError(e.to_string()))?;

    let chime = SineWave::new(CHIME_FREQUENCY)
        .take_duration(Duration::from_millis(CHIME_DURATION_MS))
        .amplify(CHIME_VOLUME);
    sink.append(chime);
    sink.sleep_until_end();
    Ok(())
}

/// Creates a sound player, returning None if audio is unavailable.
#[must_use]
pub fn try_create_player() -> Option<RodioSoundPlayer> {
    match RodioSoundPlayer::new() {
        Ok(player) => Some(player),
        Err(e) => {
            warn!("Audio not available, falling back to terminal bell: {}", e);
            None
        }
    }
}
