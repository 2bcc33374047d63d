//! File system access layer: the managed images directory and atomic writes.

pub mod images;
mod util;

pub use images::{ImageStore, RELATIVE_DIR};
pub use util::{
    IMAGE_EXTENSIONS, atomic_write, has_image_extension, image_extension, sanitize_file_name,
};

/// Shared result type for fs operations.
pub type Result<T> = crate::Result<T>;
