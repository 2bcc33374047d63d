//! Host-side core of the Oakhart DM Tools desktop shell.
//!
//! The window shell forwards a closed set of bridge commands to [`bridge::AppContext`], which
//! manages a single images directory and user-chosen export files.

#![deny(missing_debug_implementations)]

pub mod bridge;
pub mod codec;
pub mod config;
pub mod error;
pub mod fs;
pub mod log;
pub mod store;

pub type Result<T> = std::result::Result<T, error::ShellError>;

pub use bridge::{AppContext, Command, NativeShell, Picked, Reply, Response};
pub use config::{ShellConfig, StorageMode};
pub use error::{ErrorCode, ShellError};

/// Returns the version of the core crate for diagnostics.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
