//! Host-side application context: owns the images directory and serves every bridge command.

use std::path::{Path, PathBuf};

use parking_lot::RwLock;

use crate::codec::DataUrl;
use crate::config::ShellConfig;
use crate::fs::ImageStore;
use crate::store::{SettingsStore, data_file};

use super::command::Command;
use super::reply::{
    AppInfo, Empty, ImageData, ImageList, LoadedData, Reply, Response, SavedImage, SavedPath,
};

/// Outcome of an interaction the user may abandon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Picked<T> {
    Chosen(T),
    Canceled,
}

/// Native capabilities the host borrows from the window shell.
///
/// Dialog methods return `Ok(None)` when the user dismisses the dialog.
pub trait NativeShell {
    fn choose_save_path(&self, default_name: &str) -> crate::Result<Option<PathBuf>>;
    fn choose_open_path(&self) -> crate::Result<Option<PathBuf>>;
    fn choose_folder(&self, start: &Path) -> crate::Result<Option<PathBuf>>;
    fn reveal_folder(&self, dir: &Path) -> crate::Result<()>;
}

/// Single owned instance of host state, held by the window shell for the app's lifetime.
#[derive(Debug)]
pub struct AppContext {
    version: String,
    images: RwLock<ImageStore>,
    settings: SettingsStore,
}

impl AppContext {
    /// Resolve directories from `config` and persisted settings.
    pub fn new(version: impl Into<String>, config: &ShellConfig) -> Self {
        let settings = SettingsStore::new(&config.settings_path);
        let images_dir = config.resolve_images_dir(&settings.load());
        let context = Self::from_parts(version, ImageStore::new(images_dir), settings);

        // Failing here is not fatal; each operation retries the creation.
        if let Err(err) = context.images.read().ensure_root() {
            tracing::warn!(target: "bridge", error = %err, "images directory not ready");
        }
        tracing::info!(
            target: "bridge",
            images = %context.images_dir().display(),
            settings = %context.settings.path().display(),
            "host context ready"
        );
        context
    }

    pub fn from_parts(
        version: impl Into<String>,
        images: ImageStore,
        settings: SettingsStore,
    ) -> Self {
        Self { version: version.into(), images: RwLock::new(images), settings }
    }

    pub fn images_dir(&self) -> PathBuf {
        self.images.read().root().to_path_buf()
    }

    pub fn save_image(&self, file_name: &str, data_url: &str) -> crate::Result<SavedImage> {
        let image = DataUrl::parse(data_url)?;
        let path = self.images.read().save(file_name, &image)?;
        tracing::info!(
            target: "bridge::save_image",
            path = %path,
            bytes = image.bytes().len(),
            "image saved"
        );
        Ok(SavedImage { path })
    }

    pub fn read_image(&self, relative_path: &str) -> crate::Result<ImageData> {
        let image = self.images.read().read(relative_path)?;
        tracing::debug!(
            target: "bridge::read_image",
            path = %relative_path,
            bytes = image.bytes().len(),
            "image read"
        );
        Ok(ImageData { data_url: image.encode() })
    }

    pub fn list_images(&self) -> crate::Result<ImageList> {
        let files = self.images.read().list()?;
        tracing::debug!(target: "bridge::list_images", count = files.len(), "images listed");
        Ok(ImageList { files })
    }

    pub fn delete_image(&self, relative_path: &str) -> crate::Result<Empty> {
        self.images.read().delete(relative_path)?;
        tracing::info!(target: "bridge::delete_image", path = %relative_path, "image deleted");
        Ok(Empty {})
    }

    pub fn app_info(&self) -> AppInfo {
        let images = self.images.read();
        if let Err(err) = images.ensure_root() {
            tracing::warn!(target: "bridge::get_app_info", error = %err, "images dir not ready");
        }
        AppInfo { version: self.version.clone(), images_path: images.root().display().to_string() }
    }

    pub fn save_data_file(
        &self,
        desktop: &dyn NativeShell,
        default_name: &str,
        data: &str,
    ) -> crate::Result<Picked<SavedPath>> {
        let Some(path) = desktop.choose_save_path(default_name)? else {
            tracing::debug!(target: "bridge::save_data_file", "save dialog canceled");
            return Ok(Picked::Canceled);
        };
        data_file::write_text(&path, data)?;
        Ok(Picked::Chosen(SavedPath { path: path.display().to_string() }))
    }

    pub fn load_data_file(&self, desktop: &dyn NativeShell) -> crate::Result<Picked<LoadedData>> {
        let Some(path) = desktop.choose_open_path()? else {
            tracing::debug!(target: "bridge::load_data_file", "open dialog canceled");
            return Ok(Picked::Canceled);
        };
        let data = data_file::read_text(&path)?;
        Ok(Picked::Chosen(LoadedData { data }))
    }

    pub fn open_images_folder(&self, desktop: &dyn NativeShell) -> crate::Result<Empty> {
        let root = {
            let images = self.images.read();
            images.ensure_root()?.to_path_buf()
        };
        desktop.reveal_folder(&root)?;
        tracing::debug!(target: "bridge::open_images_folder", path = %root.display(), "revealed");
        Ok(Empty {})
    }

    /// Let the user relocate the images directory. Existing files stay where they are.
    pub fn choose_images_folder(
        &self,
        desktop: &dyn NativeShell,
    ) -> crate::Result<Picked<SavedPath>> {
        let current = self.images_dir();
        let Some(chosen) = desktop.choose_folder(&current)? else {
            tracing::debug!(target: "bridge::choose_images_folder", "folder dialog canceled");
            return Ok(Picked::Canceled);
        };

        let store = ImageStore::new(&chosen);
        store.ensure_root()?;
        self.settings.update(|settings| settings.images_dir = Some(chosen.clone()))?;
        *self.images.write() = store;

        tracing::info!(
            target: "bridge::choose_images_folder",
            from = %current.display(),
            to = %chosen.display(),
            "images directory relocated"
        );
        Ok(Picked::Chosen(SavedPath { path: chosen.display().to_string() }))
    }

    /// Route a validated command to its handler and wrap the outcome.
    pub fn dispatch(&self, command: Command, desktop: &dyn NativeShell) -> Response {
        let name = command.name();
        let response = match command {
            Command::SaveImage { file_name, data_url } => {
                Response::SaveImage(Reply::from_result(self.save_image(&file_name, &data_url)))
            }
            Command::ReadImage { relative_path } => {
                Response::ReadImage(Reply::from_result(self.read_image(&relative_path)))
            }
            Command::ListImages => Response::ListImages(Reply::from_result(self.list_images())),
            Command::DeleteImage { relative_path } => {
                Response::DeleteImage(Reply::from_result(self.delete_image(&relative_path)))
            }
            Command::GetAppInfo => Response::AppInfo(self.app_info()),
            Command::SaveDataFile { default_name, data } => Response::SaveDataFile(
                Reply::from_picked(self.save_data_file(desktop, &default_name, &data)),
            ),
            Command::LoadDataFile => {
                Response::LoadDataFile(Reply::from_picked(self.load_data_file(desktop)))
            }
            Command::OpenImagesFolder => {
                Response::OpenImagesFolder(Reply::from_result(self.open_images_folder(desktop)))
            }
            Command::ChooseImagesFolder => {
                Response::ChooseImagesFolder(Reply::from_picked(self.choose_images_folder(desktop)))
            }
        };

        match response.error() {
            Some(error) => {
                tracing::warn!(target: "bridge", command = name, error = %error, "command failed")
            }
            None => tracing::debug!(
                target: "bridge",
                command = name,
                success = response.success(),
                "command handled"
            ),
        }
        response
    }
}
