//! Error taxonomy shared by every host-side operation.

use std::io;
use std::path::Path;

use serde::Serialize;

/// Failure raised while servicing a bridge request.
///
/// Nothing here is fatal to the host: handlers convert every variant into a structured reply.
#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    /// The requested file is absent from the images directory.
    #[error("File not found")]
    NotFound { name: String },
    #[error("invalid file name {0:?}")]
    InvalidName(String),
    #[error("invalid image data: {0}")]
    InvalidImageData(String),
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
    #[error("native dialog failed: {0}")]
    Dialog(String),
    #[error("settings error: {0}")]
    Settings(String),
}

/// Machine readable classification sent alongside the human readable message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorCode {
    NotFound,
    InvalidInput,
    Io,
    Dialog,
}

impl ShellError {
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io { context: context.into(), source }
    }

    /// Builds an I/O error whose context names the action and the path it touched.
    pub fn io_at(action: &str, path: &Path, source: io::Error) -> Self {
        Self::io(format!("{action} {}", path.display()), source)
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            ShellError::NotFound { .. } => ErrorCode::NotFound,
            ShellError::InvalidName(_) | ShellError::InvalidImageData(_) => ErrorCode::InvalidInput,
            ShellError::Io { .. } | ShellError::Settings(_) => ErrorCode::Io,
            ShellError::Dialog(_) => ErrorCode::Dialog,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ShellError::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_uses_fixed_message() {
        let err = ShellError::NotFound { name: "dragon.png".into() };
        assert_eq!(err.to_string(), "File not found");
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert!(err.is_not_found());
    }

    #[test]
    fn io_errors_carry_context() {
        let err = ShellError::io_at(
            "writing image",
            Path::new("/tmp/x.png"),
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().starts_with("writing image /tmp/x.png"));
        assert_eq!(err.code(), ErrorCode::Io);
        assert!(!err.is_not_found());
    }
}
