//! The single managed directory of image files.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::codec::DataUrl;
use crate::error::ShellError;

use super::{Result, util};

/// Prefix of the logical paths handed to the front end (`images/<file name>`).
pub const RELATIVE_DIR: &str = "images";

/// Flat store of image files rooted at one directory.
///
/// Every name coming from the front end goes through [`util::sanitize_file_name`] before it is
/// joined to `root`, so no operation can reach outside the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the directory if it does not exist yet.
    pub fn ensure_root(&self) -> Result<&Path> {
        fs::create_dir_all(&self.root)
            .map_err(|err| ShellError::io_at("creating images directory", &self.root, err))?;
        Ok(&self.root)
    }

    /// Store decoded image bytes and return the logical path of the new file.
    ///
    /// The stored name always ends in an extension matching the declared type: a missing one is
    /// appended and a contradicting image extension is replaced (`map.png` holding JPEG data is
    /// stored as `map.jpg`).
    pub fn save(&self, file_name: &str, image: &DataUrl) -> Result<String> {
        let name = util::sanitize_file_name(file_name)?;
        let ext = image.file_extension().ok_or_else(|| {
            let subtype = image.subtype();
            ShellError::InvalidImageData(format!("unsupported image type {subtype:?}"))
        })?;
        let name = match util::image_extension(&name) {
            Some(current) if same_image_type(current, ext) => name,
            Some(current) => format!("{}{ext}", &name[..name.len() - current.len()]),
            None => format!("{name}.{ext}"),
        };

        let path = self.contained(&name)?;
        self.ensure_root()?;
        util::atomic_write(&path, image.bytes())?;
        tracing::debug!(
            target: "fs::images",
            file = %name,
            bytes = image.bytes().len(),
            "image stored"
        );
        Ok(logical_path(&name))
    }

    /// Read a stored file back as a data URL tagged from its extension.
    pub fn read(&self, relative_path: &str) -> Result<DataUrl> {
        let (name, path) = self.resolve(relative_path)?;
        self.ensure_root()?;
        if path.is_dir() {
            return Err(ShellError::NotFound { name });
        }
        match fs::read(&path) {
            Ok(bytes) => Ok(DataUrl::for_file(&name, bytes)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Err(ShellError::NotFound { name }),
            Err(err) => Err(ShellError::io_at("reading image", &path, err)),
        }
    }

    /// File names of recognised images, sorted case-insensitively.
    pub fn list(&self) -> Result<Vec<String>> {
        self.ensure_root()?;
        let read_err = |err| ShellError::io_at("reading images directory", &self.root, err);

        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root).map_err(read_err)? {
            let entry = entry.map_err(read_err)?;
            if !entry.file_type().map(|kind| kind.is_file()).unwrap_or(false) {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if util::has_image_extension(&name) {
                names.push(name);
            }
        }

        names.sort_by(|a, b| a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b)));
        Ok(names)
    }

    pub fn delete(&self, relative_path: &str) -> Result<()> {
        let (name, path) = self.resolve(relative_path)?;
        self.ensure_root()?;
        if path.is_dir() {
            return Err(ShellError::NotFound { name });
        }
        match fs::remove_file(&path) {
            Ok(()) => {
                tracing::debug!(target: "fs::images", file = %name, "image deleted");
                Ok(())
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Err(ShellError::NotFound { name }),
            Err(err) => Err(ShellError::io_at("deleting image", &path, err)),
        }
    }

    fn resolve(&self, relative_path: &str) -> Result<(String, PathBuf)> {
        let name = util::sanitize_file_name(relative_path)?;
        let path = self.contained(&name)?;
        Ok((name, path))
    }

    fn contained(&self, name: &str) -> Result<PathBuf> {
        let path = self.root.join(name);
        if path.parent() != Some(self.root.as_path()) {
            return Err(ShellError::InvalidName(name.to_string()));
        }
        Ok(path)
    }
}

fn same_image_type(current: &str, declared: &str) -> bool {
    fn normalize(ext: &str) -> &str {
        if ext == "jpeg" { "jpg" } else { ext }
    }
    normalize(current) == normalize(declared)
}

fn logical_path(name: &str) -> String {
    format!("{RELATIVE_DIR}/{name}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn png(bytes: &[u8]) -> DataUrl {
        DataUrl::new("png", bytes.to_vec())
    }

    #[test]
    fn creates_directory_lazily() {
        let dir = tempdir().unwrap();
        let store = ImageStore::new(dir.path().join("images"));
        assert!(!store.root().exists());

        assert!(store.list().unwrap().is_empty());
        assert!(store.root().is_dir());
    }

    #[test]
    fn appends_extension_for_declared_type() {
        let dir = tempdir().unwrap();
        let store = ImageStore::new(dir.path());

        let path = store.save("portrait", &DataUrl::new("jpeg", vec![9, 9])).unwrap();
        assert_eq!(path, "images/portrait.jpg");
        assert_eq!(fs::read(dir.path().join("portrait.jpg")).unwrap(), vec![9, 9]);

        let err = store.save("vector", &DataUrl::new("svg+xml", vec![1])).unwrap_err();
        assert!(matches!(err, ShellError::InvalidImageData(_)));
    }

    #[test]
    fn keeps_names_that_already_carry_an_image_extension() {
        let dir = tempdir().unwrap();
        let store = ImageStore::new(dir.path());
        let path = store.save("Map.PNG", &png(b"x")).unwrap();
        assert_eq!(path, "images/Map.PNG");
        assert_eq!(store.read(&path).unwrap().subtype(), "png");
    }

    #[test]
    fn replaces_extensions_that_contradict_the_declared_type() {
        let dir = tempdir().unwrap();
        let store = ImageStore::new(dir.path());

        let path = store.save("map.png", &DataUrl::new("jpeg", vec![0xff, 0xd8])).unwrap();
        assert_eq!(path, "images/map.jpg");
        assert!(!dir.path().join("map.png").exists());
        assert_eq!(store.read(&path).unwrap().subtype(), "jpeg");

        let path = store.save("Token.JPEG", &DataUrl::new("jpeg", vec![1])).unwrap();
        assert_eq!(path, "images/Token.JPEG");

        let err = store.save("icon.png", &DataUrl::new("svg+xml", vec![1])).unwrap_err();
        assert!(matches!(err, ShellError::InvalidImageData(_)));
    }

    #[test]
    fn drive_relative_names_stay_inside_the_root() {
        let dir = tempdir().unwrap();
        let store = ImageStore::new(dir.path().join("images"));

        let path = store.save("C:evil.png", &png(b"x")).unwrap();
        assert_eq!(path, "images/evil.png");
        assert!(store.root().join("evil.png").is_file());
        assert!(store.read("C:..\\evil.png").is_ok());
        store.delete("C:evil.png").unwrap();
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn read_and_delete_report_missing_files_as_not_found() {
        let dir = tempdir().unwrap();
        let store = ImageStore::new(dir.path());

        assert!(store.read("images/ghost.png").unwrap_err().is_not_found());
        assert!(store.delete("images/ghost.png").unwrap_err().is_not_found());

        fs::create_dir(dir.path().join("folder.png")).unwrap();
        assert!(store.read("folder.png").unwrap_err().is_not_found());
        assert!(store.delete("folder.png").unwrap_err().is_not_found());
    }

    #[test]
    fn overwrites_existing_file_with_same_name() {
        let dir = tempdir().unwrap();
        let store = ImageStore::new(dir.path());
        store.save("a.png", &png(b"old")).unwrap();
        store.save("a.png", &png(b"new")).unwrap();
        assert_eq!(store.read("a.png").unwrap().bytes(), b"new");
        assert_eq!(store.list().unwrap(), vec!["a.png"]);
    }
}
