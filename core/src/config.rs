//! Startup configuration: where images and settings live.

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::store::Settings;

pub const IMAGES_DIR_ENV: &str = "OAKHART_IMAGES_DIR";
pub const STORAGE_MODE_ENV: &str = "OAKHART_STORAGE_MODE";
pub const SETTINGS_PATH_ENV: &str = "OAKHART_SETTINGS_PATH";

const APP_QUALIFIER: &str = "com";
const APP_ORGANISATION: &str = "Oakhart";
const APP_NAME: &str = "oakhart-dm-tools";
const IMAGES_DIR_NAME: &str = "images";

/// Default placement of the images directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StorageMode {
    /// Next to the running executable.
    #[default]
    Portable,
    /// Under the per-user application data directory.
    UserData,
}

impl StorageMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "portable" => Some(StorageMode::Portable),
            "user-data" | "userdata" | "user_data" => Some(StorageMode::UserData),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ShellConfig {
    pub storage_mode: StorageMode,
    /// Explicit directory that wins over both settings and the storage mode.
    pub images_dir_override: Option<PathBuf>,
    pub settings_path: PathBuf,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            storage_mode: StorageMode::default(),
            images_dir_override: None,
            settings_path: default_settings_path(),
        }
    }
}

impl ShellConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source (tests inject a map here).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(raw) = non_empty(STORAGE_MODE_ENV) {
            match StorageMode::parse(&raw) {
                Some(mode) => config.storage_mode = mode,
                None => tracing::warn!(
                    target: "config",
                    value = %raw,
                    "unknown storage mode, keeping portable"
                ),
            }
        }
        config.images_dir_override = non_empty(IMAGES_DIR_ENV).map(PathBuf::from);
        if let Some(path) = non_empty(SETTINGS_PATH_ENV) {
            config.settings_path = PathBuf::from(path);
        }
        config
    }

    /// Resolve the images directory: override, then the persisted choice, then the mode default.
    pub fn resolve_images_dir(&self, settings: &Settings) -> PathBuf {
        if let Some(dir) = &self.images_dir_override {
            return dir.clone();
        }
        if let Some(dir) = &settings.images_dir {
            return dir.clone();
        }
        match self.storage_mode {
            StorageMode::Portable => portable_images_dir().unwrap_or_else(|| {
                tracing::warn!(target: "config", "no executable path, using the user data dir");
                user_data_images_dir()
            }),
            StorageMode::UserData => user_data_images_dir(),
        }
    }
}

fn portable_images_dir() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    exe.parent().map(|dir| dir.join(IMAGES_DIR_NAME))
}

fn user_data_images_dir() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().join(IMAGES_DIR_NAME))
        .unwrap_or_else(|| std::env::temp_dir().join("oakhart-dm-tools").join(IMAGES_DIR_NAME))
}

fn default_settings_path() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.config_dir().join("settings.json"))
        .unwrap_or_else(|| std::env::temp_dir().join("oakhart-dm-tools").join("settings.json"))
}

pub(crate) fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORGANISATION, APP_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn parses_storage_modes() {
        assert_eq!(StorageMode::parse("Portable"), Some(StorageMode::Portable));
        assert_eq!(StorageMode::parse(" user-data "), Some(StorageMode::UserData));
        assert_eq!(StorageMode::parse("cloud"), None);
    }

    #[test]
    fn reads_variables_and_ignores_blank_values() {
        let config = ShellConfig::from_lookup(lookup(&[
            (STORAGE_MODE_ENV, "user-data"),
            (IMAGES_DIR_ENV, "  "),
            (SETTINGS_PATH_ENV, "/tmp/oakhart/settings.json"),
        ]));
        assert_eq!(config.storage_mode, StorageMode::UserData);
        assert!(config.images_dir_override.is_none());
        assert_eq!(config.settings_path, PathBuf::from("/tmp/oakhart/settings.json"));
    }

    #[test]
    fn override_beats_settings_which_beat_the_mode_default() {
        let chosen = Settings { images_dir: Some(PathBuf::from("/chosen")) };

        let pinned = ShellConfig::from_lookup(lookup(&[(IMAGES_DIR_ENV, "/pinned")]));
        assert_eq!(pinned.resolve_images_dir(&chosen), PathBuf::from("/pinned"));

        let plain = ShellConfig::from_lookup(lookup(&[]));
        assert_eq!(plain.resolve_images_dir(&chosen), PathBuf::from("/chosen"));

        let portable = plain.resolve_images_dir(&Settings::default());
        assert!(portable.ends_with(IMAGES_DIR_NAME));
    }
}
