//! Settings keys and their documented defaults
//!
//! Key names match the settings files written by earlier releases, so an
//! existing store is picked up as-is.

/// Allow navigation outside the wrapped web apps (default: false)
pub const EXTERNAL_LINKS: &str = "externalLinks";

/// Open allowed navigations in a new window (default: false)
pub const WEBSITES_IN_NEW_WINDOW: &str = "websites-in-new-window";

/// Main/new window width as a fraction of screen width (default: 0.8)
pub const WINDOW_WIDTH: &str = "windowWidth";

/// Main/new window height as a fraction of screen height (default: 0.8)
pub const WINDOW_HEIGHT: &str = "windowHeight";

/// Enable the ad/tracker blocking engine (default: true)
pub const BLOCK_ADS_AND_TRACKERS: &str = "blockadsandtrackers";

/// Report the active page title to the presence service (default: false)
pub const PRESENCE_STATUS: &str = "discordrpcstatus";

/// Swap the window icon to match the loaded workload (default: true)
pub const DYNAMIC_ICONS: &str = "dynamicicons";

/// Check the release feed for updates at startup (default: true)
pub const AUTO_UPDATER: &str = "autoupdater";

/// Auto-hide the menu bar (default: false)
pub const AUTOHIDE_MENUBAR: &str = "autohide-menubar";

/// Account-mode query suffix: "?auth=1" personal, "?auth=2" work/school
/// (default: "?auth=1")
pub const ACCOUNT_MODE: &str = "enterprise-or-normal";

/// Path segment appended to the start URL (default: "")
pub const CUSTOM_PAGE: &str = "custompage";
