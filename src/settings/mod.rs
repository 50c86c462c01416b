//! Persisted user settings.
//!
//! [`SettingsStore`] keeps the current [`Settings`] in a `watch` channel so
//! views and the alert dispatcher always read the latest value, and mirrors
//! every change to a [`KeyValueStore`] in the background.
//!
//! # Consistency
//!
//! Mutations update memory synchronously; reads right after a toggle see the
//! new value before anything reaches disk. Each persist writes the newest
//! snapshot under a write lock, so the last write to land always carries the
//! latest state even if tasks finish out of order.

mod backend;
pub mod error;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

pub use self::backend::{
    FailingKeyValueStore, FileKeyValueStore, KeyValueStore, MemoryKeyValueStore,
};
pub use self::error::SettingsError;

use crate::types::{Settings, SettingsField, Theme};

/// Key of the persisted settings record.
pub const SETTINGS_KEY: &str = "@timeflex_settings";

/// Handle to a background persist. Callers may await or drop it.
pub type PersistHandle = JoinHandle<()>;

/// Process-wide settings with background persistence.
pub struct SettingsStore {
    backend: Arc<dyn KeyValueStore>,
    state: watch::Sender<Settings>,
    loaded: AtomicBool,
    write_lock: Arc<Mutex<()>>,
}

impl SettingsStore {
    /// Creates a store holding defaults until [`load`](Self::load) runs.
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        let (state, _) = watch::channel(Settings::default());
        Self {
            backend,
            state,
            loaded: AtomicBool::new(false),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Reads the persisted record, falling back to defaults if it is missing
    /// or unreadable, and marks the store as loaded.
    pub async fn load(&self) -> Settings {
        let backend = Arc::clone(&self.backend);
        let read = tokio::task::spawn_blocking(move || backend.get(SETTINGS_KEY))
            .await
            .map_err(|e| SettingsError::TaskFailed(e.to_string()))
            .and_then(|result| result);

        let settings = match read {
            Ok(Some(raw)) => decode(&raw).unwrap_or_else(|e| {
                warn!("{}; using defaults", e);
                Settings::default()
            }),
            Ok(None) => {
                debug!("No stored settings; using defaults");
                Settings::default()
            }
            Err(e) => {
                warn!("{}; using defaults", e);
                Settings::default()
            }
        };

        self.state.send_replace(settings);
        self.loaded.store(true, Ordering::SeqCst);
        settings
    }

    /// Returns true once [`load`](Self::load) has completed.
    pub fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::SeqCst)
    }

    /// Returns the current in-memory settings.
    pub fn get(&self) -> Settings {
        *self.state.borrow()
    }

    /// Returns a receiver notified on every change.
    pub fn subscribe(&self) -> watch::Receiver<Settings> {
        self.state.subscribe()
    }

    /// Flips one field.
    pub fn toggle(&self, field: SettingsField) -> PersistHandle {
        self.update(|settings| settings.toggle(field))
    }

    pub fn set_sound_enabled(&self, enabled: bool) -> PersistHandle {
        self.update(|settings| settings.sound_enabled = enabled)
    }

    pub fn set_vibration_enabled(&self, enabled: bool) -> PersistHandle {
        self.update(|settings| settings.vibration_enabled = enabled)
    }

    pub fn set_theme(&self, theme: Theme) -> PersistHandle {
        self.update(|settings| settings.theme = theme)
    }

    /// Applies `change` in memory and schedules a persist.
    ///
    /// Must be called from within a tokio runtime.
    pub fn update(&self, change: impl FnOnce(&mut Settings)) -> PersistHandle {
        self.state.send_modify(change);
        debug!("Settings changed: {:?}", self.get());
        self.persist()
    }

    fn persist(&self) -> PersistHandle {
        let backend = Arc::clone(&self.backend);
        let write_lock = Arc::clone(&self.write_lock);
        let latest = self.state.subscribe();

        tokio::task::spawn_blocking(move || {
            let _guard = write_lock.lock().unwrap_or_else(|e| e.into_inner());
            let snapshot = *latest.borrow();
            let result = serde_json::to_string_pretty(&snapshot)
                .map_err(|e| SettingsError::WriteFailed(e.to_string()))
                .and_then(|json| backend.set(SETTINGS_KEY, &json));

            if let Err(e) = result {
                warn!("Dropping settings write: {}", e);
            }
        })
    }
}

impl std::fmt::Debug for SettingsStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsStore")
            .field("settings", &self.get())
            .field("loaded", &self.is_loaded())
            .finish_non_exhaustive()
    }
}

fn decode(raw: &str) -> Result<Settings, SettingsError> {
    serde_json::from_str(raw).map_err(|e| SettingsError::Corrupt(e.to_string()))
}
