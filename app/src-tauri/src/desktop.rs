//! Native dialogs and the platform file browser, exposed to the core through `NativeShell`.

use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread::{self, JoinHandle};

use oakhart_core::store::data_file::DATA_FILE_FILTER;
use oakhart_core::{NativeShell, ShellError};
use tauri::{AppHandle, Manager, Runtime};
use tauri_plugin_dialog::{DialogExt, FileDialogBuilder, FilePath};

use crate::MAIN_WINDOW;

pub struct TauriDesktop<'a, R: Runtime> {
    app: &'a AppHandle<R>,
}

impl<'a, R: Runtime> TauriDesktop<'a, R> {
    pub fn new(app: &'a AppHandle<R>) -> Self {
        Self { app }
    }

    /// File dialog attached to the main window when it exists.
    fn file_dialog(&self) -> FileDialogBuilder<R> {
        let builder = self.app.dialog().file();
        match self.app.get_webview_window(MAIN_WINDOW) {
            Some(window) => builder.set_parent(&window),
            None => builder,
        }
    }
}

impl<R: Runtime> NativeShell for TauriDesktop<'_, R> {
    fn choose_save_path(&self, default_name: &str) -> oakhart_core::Result<Option<PathBuf>> {
        let (filter_name, extensions) = DATA_FILE_FILTER;
        let picked = self
            .file_dialog()
            .set_file_name(default_name)
            .add_filter(filter_name, extensions)
            .blocking_save_file();
        into_local_path(picked)
    }

    fn choose_open_path(&self) -> oakhart_core::Result<Option<PathBuf>> {
        let (filter_name, extensions) = DATA_FILE_FILTER;
        let picked = self.file_dialog().add_filter(filter_name, extensions).blocking_pick_file();
        into_local_path(picked)
    }

    fn choose_folder(&self, start: &Path) -> oakhart_core::Result<Option<PathBuf>> {
        let picked = self.file_dialog().set_directory(start).blocking_pick_folder();
        into_local_path(picked)
    }

    fn reveal_folder(&self, dir: &Path) -> oakhart_core::Result<()> {
        open_with_file_browser(dir)
    }
}

fn into_local_path(picked: Option<FilePath>) -> oakhart_core::Result<Option<PathBuf>> {
    picked
        .map(|file| file.into_path().map_err(|err| ShellError::Dialog(err.to_string())))
        .transpose()
}

fn spawn_detached(program: &str, dir: &Path) -> oakhart_core::Result<()> {
    let child = Command::new(program)
        .arg(dir)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|err| ShellError::io(format!("failed to run '{program}'"), err))?;

    if let Err(err) = reap_in_background(program, child) {
        tracing::warn!(target: "desktop", error = %err, "could not start reaper thread");
    }
    Ok(())
}

/// Wait on the launcher off-thread so it does not linger as a zombie.
fn reap_in_background(program: &str, mut child: Child) -> std::io::Result<JoinHandle<()>> {
    let program = program.to_string();
    thread::Builder::new().name("file-browser-reaper".into()).spawn(move || {
        // explorer.exe exits non-zero even when the window opened.
        match child.wait() {
            Ok(status) => tracing::debug!(target: "desktop", program = %program, %status, "exited"),
            Err(err) => {
                tracing::warn!(target: "desktop", program = %program, error = %err, "wait failed")
            }
        }
    })
}

#[cfg(target_os = "macos")]
fn open_with_file_browser(dir: &Path) -> oakhart_core::Result<()> {
    spawn_detached("open", dir)
}

#[cfg(target_os = "windows")]
fn open_with_file_browser(dir: &Path) -> oakhart_core::Result<()> {
    spawn_detached("explorer", dir)
}

#[cfg(all(unix, not(target_os = "macos")))]
fn open_with_file_browser(dir: &Path) -> oakhart_core::Result<()> {
    spawn_detached("xdg-open", dir)
}

#[cfg(not(any(target_os = "macos", target_os = "windows", unix)))]
fn open_with_file_browser(dir: &Path) -> oakhart_core::Result<()> {
    Err(ShellError::io(
        format!("opening {}", dir.display()),
        std::io::Error::new(std::io::ErrorKind::Unsupported, "no file browser on this platform"),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_launcher_is_an_io_error() {
        let err = spawn_detached("oakhart-no-such-launcher", Path::new(".")).unwrap_err();
        assert_eq!(err.code(), oakhart_core::ErrorCode::Io);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn exited_launchers_are_reaped() {
        let child = Command::new("true").spawn().unwrap();
        let proc_entry = std::path::PathBuf::from(format!("/proc/{}", child.id()));

        reap_in_background("true", child).unwrap().join().unwrap();
        assert!(!proc_entry.exists());
    }
}
