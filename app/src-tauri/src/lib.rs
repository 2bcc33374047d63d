mod commands;
mod desktop;

use tauri::webview::PageLoadEvent;

pub(crate) const MAIN_WINDOW: &str = "main";

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    let mut log_config = oakhart_core::log::LogConfig::default();
    if cfg!(debug_assertions) {
        log_config.console_level = oakhart_core::log::LogLevel::DEBUG;
    }

    match oakhart_core::log::init(log_config) {
        Ok(handle) => tracing::info!(path = %handle.directory().display(), "logging ready"),
        Err(err) => eprintln!("failed to initialise logging: {err:#}"),
    }

    let config = oakhart_core::ShellConfig::from_env();

    let builder = tauri::Builder::default();
    let builder = builder.plugin(tauri_plugin_dialog::init());
    let builder = commands::register(builder, &config);

    builder
        .on_page_load(|webview, payload| {
            // The window starts hidden; reveal it once content is ready to avoid a blank flash.
            if let PageLoadEvent::Finished = payload.event() {
                let window = webview.window();
                if window.label() == MAIN_WINDOW && !window.is_visible().unwrap_or(false) {
                    if let Err(err) = window.show() {
                        tracing::warn!(error = %err, "failed to show main window");
                    }
                }
            }
        })
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
