//! System tray
//!
//! The tray keeps the app reachable while the main window is hidden: one
//! entry per workload, plus show and quit. Menu events surface through the
//! shared menu event channel and are forwarded onto the event loop by the
//! caller.

use crate::icons;
use crate::launcher::ALL_WORKLOADS;
use tray_icon::menu::{Menu, MenuItem, PredefinedMenuItem};
use tray_icon::{TrayIcon, TrayIconBuilder};

pub const SHOW_ID: &str = "tray-show";
pub const QUIT_ID: &str = "tray-quit";

/// Build the tray icon with its workload menu.
///
/// `None` means the platform refused a tray icon; the app still works, it
/// just quits on window close instead of hiding.
pub fn build() -> Option<TrayIcon> {
    let menu = Menu::new();

    let append = menu.append_items(&[
        &MenuItem::with_id(SHOW_ID, "Show Microsoft 365", true, None),
        &PredefinedMenuItem::separator(),
    ]);
    if let Err(e) = append {
        log::warn!("Failed to build tray menu: {}", e);
        return None;
    }

    for workload in ALL_WORKLOADS {
        let item = MenuItem::with_id(workload.menu_id(), workload.label(), true, None);
        if let Err(e) = menu.append(&item) {
            log::warn!("Failed to add tray entry for {}: {}", workload.label(), e);
        }
    }

    let _ = menu.append_items(&[
        &PredefinedMenuItem::separator(),
        &MenuItem::with_id(QUIT_ID, "Quit", true, None),
    ]);

    let mut builder = TrayIconBuilder::new()
        .with_menu(Box::new(menu))
        .with_tooltip("Microsoft 365");
    if let Some(icon) = icons::tray_app_icon() {
        builder = builder.with_icon(icon);
    }

    match builder.build() {
        Ok(tray) => Some(tray),
        Err(e) => {
            log::warn!("Tray icon unavailable: {}", e);
            None
        }
    }
}
