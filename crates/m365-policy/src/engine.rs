//! Navigation policy engine
//!
//! Evaluates an outbound navigation intent against the configuration
//! snapshot and the domain allow-list. Pure and synchronous: exactly one
//! decision per request, no I/O, no internal state.

use crate::allowlist::DomainAllowList;
use m365_core::types::{NavigationDecision, NavigationRequest, ScreenMetrics};
use m365_core::PolicyConfig;
use url::Url;

/// Fixed inset keeping new windows off the exact screen edges
pub const WINDOW_INSET_FRACTION: f64 = 0.07;

/// Query parameter signaling a file download rather than a page view
const DOWNLOAD_MARKER_KEY: &str = "page";
const DOWNLOAD_MARKER_VALUE: &str = "Download";

/// Decide what the shell should do with a navigation intent.
///
/// Evaluation order is significant: the scheme check precedes the
/// allow-list gate, which precedes the download override, which precedes
/// the window-mode preference. A download on a disallowed external domain
/// must reach the download manager, not the external browser.
pub fn decide(
    request: &NavigationRequest,
    config: &PolicyConfig,
    allow_list: &DomainAllowList,
    screen: ScreenMetrics,
) -> NavigationDecision {
    let url = match Url::parse(&request.target_url) {
        Ok(url) => url,
        Err(e) => {
            log::warn!("Denying malformed navigation target {:?}: {}", request.target_url, e);
            return NavigationDecision::Deny;
        }
    };

    // The embedded shell only knows how to render web content; mailto:,
    // file: and friends are dropped outright.
    if url.scheme() != "http" && url.scheme() != "https" {
        return NavigationDecision::Deny;
    }

    if config.external_links_enabled {
        let allowed = url
            .host_str()
            .map(|host| allow_list.allows(host))
            .unwrap_or(false);
        if !allowed {
            return NavigationDecision::DenyDeferToExternalBrowser;
        }
    }

    if is_download_intent(&url) {
        return NavigationDecision::AllowInPlace;
    }

    if !config.open_in_new_window {
        return NavigationDecision::AllowInPlace;
    }

    NavigationDecision::AllowNewWindow {
        width: inset_dimension(screen.width_px, config.window_width_fraction),
        height: inset_dimension(screen.height_px, config.window_height_fraction),
    }
}

/// True when the URL carries the reserved download-intent query parameter
pub fn is_download_intent(url: &Url) -> bool {
    url.query_pairs()
        .any(|(k, v)| k == DOWNLOAD_MARKER_KEY && v == DOWNLOAD_MARKER_VALUE)
}

fn inset_dimension(screen_px: u32, fraction: f64) -> u32 {
    let px = (screen_px as f64 * (fraction - WINDOW_INSET_FRACTION)).round();
    // Degenerate fractions (<= inset) still have to produce a positive size
    px.max(1.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use m365_core::types::WindowId;

    const SCREEN: ScreenMetrics = ScreenMetrics {
        width_px: 1920,
        height_px: 1080,
    };

    fn request(url: &str) -> NavigationRequest {
        NavigationRequest::new(url, WindowId(0))
    }

    fn office_allow_list() -> DomainAllowList {
        DomainAllowList::from_patterns(&["*.microsoft.com", "*.office.com"])
    }

    fn config(external: bool, new_window: bool) -> PolicyConfig {
        PolicyConfig {
            external_links_enabled: external,
            open_in_new_window: new_window,
            window_width_fraction: 0.8,
            window_height_fraction: 0.8,
        }
    }

    #[test]
    fn test_non_http_schemes_are_denied() {
        let cfg = config(true, true);
        let list = office_allow_list();
        for url in [
            "mailto:someone@office.com",
            "file:///etc/passwd",
            "ftp://office.com/file",
            "javascript:void(0)",
            "ms-word:ofe|u|https://office.com/doc",
        ] {
            assert_eq!(
                decide(&request(url), &cfg, &list, SCREEN),
                NavigationDecision::Deny,
                "expected Deny for {}",
                url
            );
        }
    }

    #[test]
    fn test_malformed_url_is_denied() {
        let cfg = config(false, false);
        let list = office_allow_list();
        assert_eq!(
            decide(&request("not a url"), &cfg, &list, SCREEN),
            NavigationDecision::Deny
        );
        assert_eq!(
            decide(&request(""), &cfg, &list, SCREEN),
            NavigationDecision::Deny
        );
    }

    #[test]
    fn test_allowed_host_never_defers_to_external_browser() {
        let cfg = config(true, false);
        let list = office_allow_list();
        for url in [
            "https://www.office.com/",
            "https://outlook.office.com/mail",
            "https://microsoft.com/",
        ] {
            assert_ne!(
                decide(&request(url), &cfg, &list, SCREEN),
                NavigationDecision::DenyDeferToExternalBrowser,
                "unexpected defer for {}",
                url
            );
        }
    }

    #[test]
    fn test_disallowed_host_always_defers_to_external_browser() {
        let list = office_allow_list();
        for new_window in [false, true] {
            let cfg = config(true, new_window);
            assert_eq!(
                decide(&request("https://evil.example.com/"), &cfg, &list, SCREEN),
                NavigationDecision::DenyDeferToExternalBrowser
            );
        }
    }

    #[test]
    fn test_download_marker_beats_new_window_preference() {
        let list = DomainAllowList::from_patterns(&["*.microsoft365.com"]);
        for (external, new_window) in [(false, false), (false, true), (true, false), (true, true)] {
            let cfg = config(external, new_window);
            assert_eq!(
                decide(
                    &request("https://microsoft365.com/launch/word?page=Download"),
                    &cfg,
                    &list,
                    SCREEN
                ),
                NavigationDecision::AllowInPlace,
                "external={} new_window={}",
                external,
                new_window
            );
        }
    }

    #[test]
    fn test_download_marker_on_disallowed_host_still_defers() {
        // Step order: the allow-list gate comes before the download override
        let cfg = config(true, true);
        let list = office_allow_list();
        assert_eq!(
            decide(
                &request("https://evil.example.com/?page=Download"),
                &cfg,
                &list,
                SCREEN
            ),
            NavigationDecision::DenyDeferToExternalBrowser
        );
    }

    #[test]
    fn test_download_marker_must_be_a_query_pair() {
        let cfg = config(false, true);
        let list = office_allow_list();
        // The marker in the path is not a download intent
        let decision = decide(
            &request("https://office.com/page=Download/view"),
            &cfg,
            &list,
            SCREEN,
        );
        assert!(matches!(
            decision,
            NavigationDecision::AllowNewWindow { .. }
        ));
    }

    #[test]
    fn test_same_window_mode_navigates_in_place() {
        let cfg = config(false, false);
        let list = office_allow_list();
        assert_eq!(
            decide(&request("https://outlook.live.com/mail/0/"), &cfg, &list, SCREEN),
            NavigationDecision::AllowInPlace
        );
    }

    #[test]
    fn test_new_window_dimensions_use_inset_formula() {
        let cfg = config(false, true);
        let list = office_allow_list();
        let decision = decide(&request("https://www.office.com/"), &cfg, &list, SCREEN);
        let width = (1920.0_f64 * (0.8 - 0.07)).round() as u32;
        let height = (1080.0_f64 * (0.8 - 0.07)).round() as u32;
        assert_eq!(
            decision,
            NavigationDecision::AllowNewWindow { width, height }
        );
    }

    #[test]
    fn test_degenerate_fraction_keeps_positive_size() {
        let cfg = PolicyConfig {
            external_links_enabled: false,
            open_in_new_window: true,
            window_width_fraction: 0.05,
            window_height_fraction: 0.05,
        };
        let list = office_allow_list();
        match decide(&request("https://www.office.com/"), &cfg, &list, SCREEN) {
            NavigationDecision::AllowNewWindow { width, height } => {
                assert!(width >= 1);
                assert!(height >= 1);
            }
            other => panic!("expected AllowNewWindow, got {:?}", other),
        }
    }

    #[test]
    fn test_external_links_disabled_skips_allow_list() {
        let cfg = config(false, false);
        let list = office_allow_list();
        assert_eq!(
            decide(&request("https://evil.example.com/"), &cfg, &list, SCREEN),
            NavigationDecision::AllowInPlace
        );
    }

    #[test]
    fn test_representative_scenarios() {
        // outlook in place
        assert_eq!(
            decide(
                &request("https://outlook.live.com/mail/0/"),
                &config(false, false),
                &office_allow_list(),
                SCREEN
            ),
            NavigationDecision::AllowInPlace
        );

        // evil domain to external browser
        assert_eq!(
            decide(
                &request("https://evil.example.com/"),
                &config(true, false),
                &DomainAllowList::from_patterns(&["*.microsoft.com", "*.office.com"]),
                SCREEN
            ),
            NavigationDecision::DenyDeferToExternalBrowser
        );

        // download override beats new-window preference
        assert_eq!(
            decide(
                &request("https://microsoft365.com/launch/word?page=Download"),
                &config(false, true),
                &office_allow_list(),
                SCREEN
            ),
            NavigationDecision::AllowInPlace
        );
    }
}
