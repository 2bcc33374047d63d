use oakhart_core::{AppContext, Command, Response, ShellConfig};
use tauri::{AppHandle, Manager, Runtime};

use crate::desktop::TauriDesktop;

#[tauri::command]
pub fn is_desktop_runtime() -> bool {
    true
}

/// Single entry point of the bridge. `request` is validated against the closed `Command` set
/// during argument deserialization; unknown names never reach the host.
#[tauri::command]
pub async fn bridge_invoke<R: Runtime>(
    app_handle: AppHandle<R>,
    request: Command,
) -> Result<Response, String> {
    let name = request.name();
    tracing::debug!(target: "commands::bridge_invoke", command = name, "bridge request");

    // Dialogs block until the user answers, so keep them off the async workers.
    tauri::async_runtime::spawn_blocking(move || {
        let context = app_handle.state::<AppContext>();
        let desktop = TauriDesktop::new(&app_handle);
        context.dispatch(request, &desktop)
    })
    .await
    .map_err(|err| {
        tracing::error!(
            target: "commands::bridge_invoke",
            command = name,
            error = %err,
            "handler aborted"
        );
        format!("{name} did not complete: {err}")
    })
}

pub fn register<R: Runtime>(builder: tauri::Builder<R>, config: &ShellConfig) -> tauri::Builder<R> {
    let context = AppContext::new(env!("CARGO_PKG_VERSION"), config);
    builder
        .manage(context)
        .invoke_handler(tauri::generate_handler![is_desktop_runtime, bridge_invoke])
}
