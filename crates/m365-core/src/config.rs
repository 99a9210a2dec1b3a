//! Policy configuration snapshot

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default width/height fraction of the screen for new windows
pub const DEFAULT_WINDOW_FRACTION: f64 = 0.8;

/// Subset of the settings store relevant to navigation policy.
///
/// A snapshot is taken from the store once per decision and never mutated
/// during the call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Allow navigation to hosts outside the wrapped web apps (gated by the
    /// domain allow-list); disallowed hosts go to the OS default browser
    pub external_links_enabled: bool,

    /// Open allowed navigations in a new window instead of in place
    pub open_in_new_window: bool,

    /// New-window width as a fraction of screen width, in (0, 1]
    pub window_width_fraction: f64,

    /// New-window height as a fraction of screen height, in (0, 1]
    pub window_height_fraction: f64,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            external_links_enabled: false,
            open_in_new_window: false,
            window_width_fraction: DEFAULT_WINDOW_FRACTION,
            window_height_fraction: DEFAULT_WINDOW_FRACTION,
        }
    }
}

// Helper to get directories
pub mod dirs {
    use std::path::PathBuf;

    pub fn data_dir() -> Option<PathBuf> {
        if cfg!(target_os = "windows") {
            std::env::var_os("APPDATA").map(PathBuf::from)
        } else if cfg!(target_os = "macos") {
            home_dir().map(|h| h.join("Library").join("Application Support"))
        } else {
            std::env::var_os("XDG_DATA_HOME")
                .map(PathBuf::from)
                .or_else(|| home_dir().map(|h| h.join(".local").join("share")))
        }
    }

    pub fn cache_dir() -> Option<PathBuf> {
        if cfg!(target_os = "windows") {
            std::env::var_os("LOCALAPPDATA").map(PathBuf::from)
        } else if cfg!(target_os = "macos") {
            home_dir().map(|h| h.join("Library").join("Caches"))
        } else {
            std::env::var_os("XDG_CACHE_HOME")
                .map(PathBuf::from)
                .or_else(|| home_dir().map(|h| h.join(".cache")))
        }
    }

    fn home_dir() -> Option<PathBuf> {
        std::env::var_os("HOME").map(PathBuf::from)
    }
}

/// Application data directory (settings file lives here)
pub fn app_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("m365-desktop")
}

/// Application cache directory (filter lists live here)
pub fn app_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("m365-desktop")
}
