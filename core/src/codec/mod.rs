//! Encoding helpers for payloads that cross the bridge.

pub mod data_url;

pub use data_url::{DataUrl, mime_subtype_for_file};

pub type Result<T> = crate::Result<T>;
