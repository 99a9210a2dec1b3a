//! Application menu bar
//!
//! A `Settings` menu of check items, one per persisted toggle. Items carry
//! the settings key as their menu id, so dispatching an event is a straight
//! key lookup.

use m365_settings::{keys, SettingsStore};
use muda::{CheckMenuItem, Menu, MenuEvent, MenuItem, PredefinedMenuItem, Submenu};

pub const QUIT_ID: &str = "menu-quit";
pub const CHECK_UPDATES_ID: &str = "menu-check-updates";

/// Account-mode check item id; checked means work/school (`?auth=2`)
pub const WORK_ACCOUNT_ID: &str = "menu-work-account";

const TOGGLES: &[(&str, &str)] = &[
    (keys::EXTERNAL_LINKS, "Allow external links"),
    (keys::WEBSITES_IN_NEW_WINDOW, "Open links in a new window"),
    (keys::BLOCK_ADS_AND_TRACKERS, "Block ads and trackers"),
    (keys::PRESENCE_STATUS, "Share activity status"),
    (keys::DYNAMIC_ICONS, "Dynamic window icon"),
    (keys::AUTO_UPDATER, "Check for updates at startup"),
    (keys::AUTOHIDE_MENUBAR, "Auto-hide the menu bar"),
];

/// Defaults for toggles when the key is missing from the store
fn toggle_default(key: &str) -> bool {
    matches!(
        key,
        keys::BLOCK_ADS_AND_TRACKERS | keys::DYNAMIC_ICONS | keys::AUTO_UPDATER
    )
}

/// What a menu event asks the shell to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAction {
    Toggle { key: String, checked: bool },
    SetAccountMode(String),
    CheckForUpdates,
    Quit,
}

pub struct AppMenu {
    pub menu: Menu,
    toggles: Vec<(CheckMenuItem, &'static str)>,
    work_account: CheckMenuItem,
}

impl AppMenu {
    pub fn build(settings: &SettingsStore) -> Self {
        let menu = Menu::new();

        let file = Submenu::new("&File", true);
        let _ = file.append_items(&[
            &MenuItem::with_id(CHECK_UPDATES_ID, "Check for Updates…", true, None),
            &PredefinedMenuItem::separator(),
            &MenuItem::with_id(QUIT_ID, "Quit", true, None),
        ]);

        let settings_menu = Submenu::new("&Settings", true);
        let mut toggles = Vec::with_capacity(TOGGLES.len());
        for (key, label) in TOGGLES {
            let checked = settings.bool_or(key, toggle_default(key));
            let item = CheckMenuItem::with_id(*key, *label, true, checked, None);
            let _ = settings_menu.append(&item);
            toggles.push((item, *key));
        }

        let work_account = CheckMenuItem::with_id(
            WORK_ACCOUNT_ID,
            "Use work or school account",
            true,
            settings.string_or(keys::ACCOUNT_MODE, "?auth=1") == "?auth=2",
            None,
        );
        let _ = settings_menu.append_items(&[&PredefinedMenuItem::separator(), &work_account]);

        let _ = menu.append_items(&[&file, &settings_menu]);

        Self {
            menu,
            toggles,
            work_account,
        }
    }

    /// Attach the menu bar to the given window
    pub fn init_for_window(&self, window: &tao::window::Window) {
        #[cfg(target_os = "windows")]
        {
            use tao::platform::windows::WindowExtWindows;
            if let Err(e) = unsafe { self.menu.init_for_hwnd(window.hwnd() as _) } {
                log::warn!("Failed to attach menu bar: {}", e);
            }
        }

        #[cfg(target_os = "linux")]
        {
            use tao::platform::unix::WindowExtUnix;
            match (window.gtk_window(), window.default_vbox()) {
                (w, Some(vbox)) => {
                    if let Err(e) = self.menu.init_for_gtk_window(w, Some(vbox)) {
                        log::warn!("Failed to attach menu bar: {}", e);
                    }
                }
                _ => log::warn!("No GTK container to attach the menu bar to"),
            }
        }

        #[cfg(target_os = "macos")]
        {
            let _ = window;
            self.menu.init_for_nsapp();
        }
    }

    /// Translate a menu event into an action, if it belongs to this menu
    pub fn action_for(&self, event: &MenuEvent) -> Option<MenuAction> {
        let id = event.id().as_ref();
        if id == QUIT_ID {
            return Some(MenuAction::Quit);
        }
        if id == CHECK_UPDATES_ID {
            return Some(MenuAction::CheckForUpdates);
        }
        if id == WORK_ACCOUNT_ID {
            let mode = if self.work_account.is_checked() {
                "?auth=2"
            } else {
                "?auth=1"
            };
            return Some(MenuAction::SetAccountMode(mode.to_string()));
        }
        self.toggles
            .iter()
            .find(|(_, key)| *key == id)
            .map(|(item, key)| MenuAction::Toggle {
                key: (*key).to_string(),
                checked: item.is_checked(),
            })
    }
}
