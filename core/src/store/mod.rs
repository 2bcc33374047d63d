//! Persistent shell state and user-chosen data files.

pub mod data_file;
pub mod settings;

pub use settings::{Settings, SettingsStore};

pub type Result<T> = crate::Result<T>;
