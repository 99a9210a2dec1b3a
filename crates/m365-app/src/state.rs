//! Shared application state
//!
//! One `AppState` behind an `Arc<Mutex<_>>` is touched from the event loop
//! and from the WebView callback threads. Locks are held only long enough
//! to snapshot what a single decision needs.

use crate::launcher;
use m365_core::{IconKind, NavigationDecision, NavigationRequest, ScreenMetrics};
use m365_policy::DomainAllowList;
use m365_presence::PresenceReporter;
use m365_settings::{keys, SettingsStore};
use m365_shield::{AdBlocker, ResourceType};
use serde_json::json;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex};
use url::Url;

pub type SharedState = Arc<Mutex<AppState>>;

pub struct AppState {
    pub settings: SettingsStore,
    pub allow_list: DomainAllowList,
    pub shield: AdBlocker,
    pub presence: Option<PresenceReporter>,
    pub screen: ScreenMetrics,
}

impl AppState {
    /// Load settings and bring up the subsystems they enable.
    ///
    /// The shield starts with its built-in starter rules; the caller is
    /// expected to upgrade it to the full filter lists off-thread.
    pub fn initialize() -> SharedState {
        let settings = SettingsStore::load_default();

        let mut shield = AdBlocker::new();
        shield.set_enabled(settings.bool_or(keys::BLOCK_ADS_AND_TRACKERS, true));

        let presence = if settings.bool_or(keys::PRESENCE_STATUS, false) {
            Some(PresenceReporter::spawn_discord())
        } else {
            None
        };

        Arc::new(Mutex::new(Self {
            settings,
            allow_list: DomainAllowList::bundled(),
            shield,
            presence,
            screen: ScreenMetrics {
                width_px: 1920,
                height_px: 1080,
            },
        }))
    }

    /// Record the monitor the main window landed on
    pub fn set_screen(&mut self, width_px: u32, height_px: u32) {
        self.screen = ScreenMetrics {
            width_px,
            height_px,
        };
        log::debug!("Screen metrics: {}x{}", width_px, height_px);
    }

    /// Run the navigation policy over a popup/new-window request
    pub fn decide(&self, request: &NavigationRequest) -> NavigationDecision {
        m365_policy::decide(
            request,
            &self.settings.policy_config(),
            &self.allow_list,
            self.screen,
        )
    }

    /// Whether the shield vetoes a subresource load
    pub fn should_block(&self, url: &str, source: &str, resource_type: ResourceType) -> bool {
        let (Ok(url), Ok(source)) = (Url::parse(url), Url::parse(source)) else {
            return false;
        };
        self.shield.should_block(&url, &source, resource_type)
    }

    /// URL the main window starts on
    pub fn start_url(&self) -> String {
        launcher::start_url(
            &self.settings.string_or(keys::CUSTOM_PAGE, ""),
            &self.account_mode(),
        )
    }

    pub fn account_mode(&self) -> String {
        self.settings.string_or(keys::ACCOUNT_MODE, "?auth=1")
    }

    /// Flip a boolean setting and apply any immediate side effects
    pub fn toggle(&mut self, key: &str, checked: bool) {
        self.settings.set(key, json!(checked.to_string()));
        match key {
            keys::BLOCK_ADS_AND_TRACKERS => self.shield.set_enabled(checked),
            keys::PRESENCE_STATUS => {
                if checked && self.presence.is_none() {
                    self.presence = Some(PresenceReporter::spawn_discord());
                } else if !checked {
                    if let Some(presence) = self.presence.take() {
                        presence.clear();
                    }
                }
            }
            _ => {}
        }
    }

    /// Announce the current page title if presence is on
    pub fn report_title(&self, title: &str) {
        if let Some(presence) = &self.presence {
            presence.page_title(title);
        }
    }
}

/// Last loaded URL per window, so a title change can resolve the workload
/// icon for whichever window it came from.
pub struct PageTracker<K> {
    urls: HashMap<K, String>,
}

impl<K: Eq + Hash> PageTracker<K> {
    pub fn new() -> Self {
        Self {
            urls: HashMap::new(),
        }
    }

    pub fn page_loaded(&mut self, window: K, url: String) {
        self.urls.insert(window, url);
    }

    pub fn window_closed(&mut self, window: &K) {
        self.urls.remove(window);
    }

    /// Icon for the given window's current page. A window with no recorded
    /// load yet can still match on title hints alone.
    pub fn icon_for_title(&self, window: &K, title: &str) -> Option<IconKind> {
        let url = self.urls.get(window).map(String::as_str).unwrap_or("");
        m365_policy::select_icon(url, title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use m365_core::config::DEFAULT_WINDOW_FRACTION;

    fn state_in(dir: &tempfile::TempDir) -> AppState {
        let settings = SettingsStore::load(dir.path().join("settings.json"));
        AppState {
            settings,
            allow_list: DomainAllowList::bundled(),
            shield: AdBlocker::new(),
            presence: None,
            screen: ScreenMetrics {
                width_px: 1920,
                height_px: 1080,
            },
        }
    }

    #[test]
    fn test_start_url_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_in(&dir);
        assert_eq!(state.start_url(), "https://microsoft365.com/?auth=1");
    }

    #[test]
    fn test_start_url_honors_settings() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state_in(&dir);
        state.settings.set(keys::CUSTOM_PAGE, json!("launch/word"));
        state.settings.set(keys::ACCOUNT_MODE, json!("?auth=2"));
        assert_eq!(
            state.start_url(),
            "https://microsoft365.com/launch/word?auth=2"
        );
    }

    #[test]
    fn test_toggle_persists_literal_strings() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state_in(&dir);

        state.toggle(keys::EXTERNAL_LINKS, true);
        assert_eq!(
            state.settings.get(keys::EXTERNAL_LINKS),
            Some(&json!("true"))
        );
        assert!(state.settings.bool_or(keys::EXTERNAL_LINKS, false));
    }

    #[test]
    fn test_toggle_drives_the_shield() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state_in(&dir);

        state.toggle(keys::BLOCK_ADS_AND_TRACKERS, false);
        assert!(!state.shield.is_enabled());
        state.toggle(keys::BLOCK_ADS_AND_TRACKERS, true);
        assert!(state.shield.is_enabled());
    }

    #[test]
    fn test_decide_uses_live_settings() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state_in(&dir);

        let request = NavigationRequest::new("https://example.com/", m365_core::WindowId::new());

        // External links off: the allow-list gate is skipped entirely.
        assert_eq!(state.decide(&request), NavigationDecision::AllowInPlace);

        // External links on: off-list hosts defer to the system browser.
        state.toggle(keys::EXTERNAL_LINKS, true);
        assert_eq!(
            state.decide(&request),
            NavigationDecision::DenyDeferToExternalBrowser
        );

        // Allowed host in new-window mode gets the inset sizing.
        state.toggle(keys::WEBSITES_IN_NEW_WINDOW, true);
        let allowed =
            NavigationRequest::new("https://www.office.com/mail", m365_core::WindowId::new());
        let expected = ((1920.0 * (DEFAULT_WINDOW_FRACTION - 0.07)).round()) as u32;
        match state.decide(&allowed) {
            NavigationDecision::AllowNewWindow { width, .. } => assert_eq!(width, expected),
            other => panic!("unexpected decision: {:?}", other),
        }
    }

    #[test]
    fn test_page_tracker_resolves_icons_per_window() {
        let mut tracker: PageTracker<u32> = PageTracker::new();
        tracker.page_loaded(1, "https://outlook.live.com/mail/0/".to_string());
        tracker.page_loaded(2, "https://teams.live.com/v2/".to_string());

        // Each window resolves against its own URL, not the last load overall.
        assert_eq!(tracker.icon_for_title(&1, "Inbox"), Some(IconKind::Outlook));
        assert_eq!(tracker.icon_for_title(&2, "Chat"), Some(IconKind::Teams));

        // A window with no recorded load still matches on title hints.
        assert_eq!(
            tracker.icon_for_title(&3, "Quarterly report.docx"),
            Some(IconKind::Word)
        );
        assert_eq!(tracker.icon_for_title(&3, "Home"), None);

        tracker.window_closed(&2);
        assert_eq!(tracker.icon_for_title(&2, "Chat"), None);
    }
}
