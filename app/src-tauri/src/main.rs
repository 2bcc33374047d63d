#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

fn main() {
    oakhart_desktop_lib::run();
}
