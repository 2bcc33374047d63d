//! The closed set of operations the front end may invoke, and the host that serves them.

pub mod command;
pub mod context;
pub mod reply;

pub use command::Command;
pub use context::{AppContext, NativeShell, Picked};
pub use reply::{
    AppInfo, Empty, ImageData, ImageList, LoadedData, Reply, Response, SavedImage, SavedPath,
};
