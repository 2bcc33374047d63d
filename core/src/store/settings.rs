//! Persistent storage for shell settings.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::error::ShellError;
use crate::fs::atomic_write;

use super::Result;

/// Settings that survive restarts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Images directory picked through `choose-images-folder`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images_dir: Option<PathBuf>,
}

/// JSON file holding [`Settings`]; writes go through a temp file and are serialised.
#[derive(Debug)]
pub struct SettingsStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), lock: Mutex::new(()) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load settings. A missing file yields defaults; so does a corrupt one, after a warning.
    pub fn load(&self) -> Settings {
        let _guard = self.lock.lock();
        self.load_unlocked()
    }

    pub fn save(&self, settings: &Settings) -> Result<()> {
        let _guard = self.lock.lock();
        self.save_unlocked(settings)
    }

    /// Read-modify-write under one lock, so concurrent updates never lose each other's fields.
    pub fn update<F>(&self, apply: F) -> Result<Settings>
    where
        F: FnOnce(&mut Settings),
    {
        let _guard = self.lock.lock();
        let mut settings = self.load_unlocked();
        apply(&mut settings);
        self.save_unlocked(&settings)?;
        Ok(settings)
    }

    fn load_unlocked(&self) -> Settings {
        match self.read_file() {
            Ok(settings) => settings,
            Err(err) => {
                tracing::warn!(
                    target: "store::settings",
                    path = %self.path.display(),
                    error = %err,
                    "ignoring unreadable settings"
                );
                Settings::default()
            }
        }
    }

    fn save_unlocked(&self, settings: &Settings) -> Result<()> {
        let data = serde_json::to_vec_pretty(settings)
            .map_err(|err| ShellError::Settings(err.to_string()))?;
        atomic_write(&self.path, &data)
    }

    fn read_file(&self) -> Result<Settings> {
        match fs::read(&self.path) {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|err| ShellError::Settings(format!("parsing settings: {err}"))),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Settings::default()),
            Err(err) => Err(ShellError::io_at("reading settings", &self.path, err)),
        }
    }
}
