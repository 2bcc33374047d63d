//! Plain-text export/import files chosen by the user.
//!
//! Content is passed through verbatim; no schema is enforced at this layer.

use std::fs;
use std::path::Path;

use crate::error::ShellError;
use crate::fs::atomic_write;

use super::Result;

/// Extensions offered by the save/open dialogs.
pub const DATA_FILE_FILTER: (&str, &[&str]) = ("JSON", &["json"]);

pub fn write_text(path: &Path, data: &str) -> Result<()> {
    atomic_write(path, data.as_bytes())?;
    tracing::info!(
        target: "store::data_file",
        path = %path.display(),
        bytes = data.len(),
        "data file written"
    );
    Ok(())
}

pub fn read_text(path: &Path) -> Result<String> {
    let data = fs::read_to_string(path).map_err(|err| ShellError::io_at("reading", path, err))?;
    tracing::info!(
        target: "store::data_file",
        path = %path.display(),
        bytes = data.len(),
        "data file read"
    );
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn text_survives_a_write_read_cycle() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("backup.json");
        let payload = "{\"npcs\":[{\"name\":\"Ölga\"}]}\n";

        write_text(&path, payload).unwrap();
        assert_eq!(read_text(&path).unwrap(), payload);
    }

    #[test]
    fn reading_non_utf8_is_an_io_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("binary.json");
        fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();

        let err = read_text(&path).unwrap_err();
        assert!(matches!(err, ShellError::Io { .. }));
    }
}
