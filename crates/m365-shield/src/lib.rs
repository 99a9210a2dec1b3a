//! Ad and tracker blocking for M365 Desktop
//!
//! Uses Brave's adblock-rust engine. The wrapped Microsoft 365 pages (the
//! consumer Outlook inbox in particular) serve their own ad and telemetry
//! requests; the shield filters those out of the embedded views.

pub mod filter_lists;

use adblock::lists::ParseOptions;
use adblock::Engine;
use m365_core::M365Result;
use std::sync::atomic::{AtomicU64, Ordering};
use url::Url;

pub use filter_lists::{FilterListManager, FilterListSource, FILTER_LISTS};

/// Ad blocker powered by Brave's adblock-rust engine
pub struct AdBlocker {
    engine: Engine,
    enabled: bool,
    requests_blocked: AtomicU64,
}

impl AdBlocker {
    const DEFAULT_RULES: &'static [&'static str] = &[
        // Microsoft ad delivery inside consumer Outlook/MSN surfaces
        "||adsdk.microsoft.com^",
        "||ads.msn.com^",
        "||adnexus.net^",
        "||bat.bing.com^",
        // Google advertising
        "||doubleclick.net^",
        "||googlesyndication.com^",
        "||googleadservices.com^",
        // Social media tracking pixels
        "||facebook.com/tr^",
        "||connect.facebook.net^",
        "||ads.twitter.com^",
        // Common ad networks
        "||adnxs.com^",
        "||adsrvr.org^",
        "||taboola.com^",
        "||outbrain.com^",
        "||criteo.com/sync^",
        "||amazon-adsystem.com^",
        // Analytics beacons
        "||scorecardresearch.com^",
        "||segment.io^",
        "||mixpanel.com^",
        "||hotjar.com^",
    ];

    /// Creates a new ad blocker with the starter rules
    pub fn new() -> Self {
        log::info!("Initializing ad blocker");

        let engine =
            Engine::from_rules(Self::DEFAULT_RULES.iter().copied(), ParseOptions::default());

        Self {
            engine,
            enabled: true,
            requests_blocked: AtomicU64::new(0),
        }
    }

    /// Creates ad blocker with the given filter rules
    pub fn with_rules(rules: &[&str]) -> Self {
        log::info!("Initializing ad blocker with {} rules", rules.len());

        let engine = Engine::from_rules(rules.iter().copied(), ParseOptions::default());

        Self {
            engine,
            enabled: true,
            requests_blocked: AtomicU64::new(0),
        }
    }

    /// Creates ad blocker from filter list content (e.g., EasyList)
    pub fn from_filter_list(list_content: &str) -> Self {
        log::info!("Initializing ad blocker from filter list");

        let rules: Vec<&str> = list_content.lines().collect();
        Self::with_rules(&rules)
    }

    /// Creates ad blocker with full EasyList/EasyPrivacy filter lists,
    /// falling back to the starter rules if the lists can't be loaded
    pub fn with_filter_lists() -> Self {
        log::info!("Initializing ad blocker with EasyList/EasyPrivacy");

        match FilterListManager::new() {
            Some(manager) => {
                let combined = manager.get_all_filter_lists();
                if combined.is_empty() {
                    log::warn!("No filter lists available, using default rules");
                    Self::new()
                } else {
                    let rule_count = combined
                        .lines()
                        .filter(|l| !l.trim().is_empty() && !l.starts_with('!'))
                        .count();
                    log::info!(
                        "Loaded {} filter rules from EasyList/EasyPrivacy",
                        rule_count
                    );
                    Self::from_filter_list(&combined)
                }
            }
            None => {
                log::warn!("Failed to initialize filter list manager, using default rules");
                Self::new()
            }
        }
    }

    /// Reload rules - creates a new engine (immutable design)
    pub fn load_rules(&mut self, rules: &[String]) -> M365Result<()> {
        log::info!("Reloading ad blocker with {} rules", rules.len());

        let rules_refs: Vec<&str> = rules.iter().map(|s| s.as_str()).collect();
        self.engine = Engine::from_rules(rules_refs, ParseOptions::default());
        self.requests_blocked.store(0, Ordering::Relaxed);

        Ok(())
    }

    /// Check if a request should be blocked
    pub fn should_block(&self, url: &Url, source_url: &Url, resource_type: ResourceType) -> bool {
        if !self.enabled {
            return false;
        }

        let request = adblock::request::Request::new(
            url.as_str(),
            source_url.as_str(),
            resource_type.as_str(),
        );

        match request {
            Ok(req) => {
                let result = self.engine.check_network_request(&req);

                if result.matched {
                    log::debug!("Blocked: {} (from {})", url, source_url);
                    self.requests_blocked.fetch_add(1, Ordering::Relaxed);
                    true
                } else {
                    false
                }
            }
            Err(e) => {
                log::warn!("Failed to create request for {}: {}", url, e);
                false
            }
        }
    }

    /// Enable or disable ad blocking
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        log::info!(
            "Ad blocking {}",
            if enabled { "enabled" } else { "disabled" }
        );
    }

    /// Check if ad blocking is enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Number of requests blocked so far
    pub fn blocked_count(&self) -> u64 {
        self.requests_blocked.load(Ordering::Relaxed)
    }
}

impl Default for AdBlocker {
    fn default() -> Self {
        Self::new()
    }
}

/// Type of resource being requested
#[derive(Debug, Clone, Copy)]
pub enum ResourceType {
    Document,
    Script,
    Image,
    Stylesheet,
    Xhr,
    Other,
}

impl ResourceType {
    fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Document => "document",
            ResourceType::Script => "script",
            ResourceType::Image => "image",
            ResourceType::Stylesheet => "stylesheet",
            ResourceType::Xhr => "xmlhttprequest",
            ResourceType::Other => "other",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_blocker() {
        let blocker = AdBlocker::new();
        assert!(blocker.is_enabled());
        assert_eq!(blocker.blocked_count(), 0);
    }

    #[test]
    fn test_enable_disable() {
        let mut blocker = AdBlocker::new();

        blocker.set_enabled(false);
        assert!(!blocker.is_enabled());

        blocker.set_enabled(true);
        assert!(blocker.is_enabled());
    }

    #[test]
    fn test_blocking() {
        let rules = vec!["||ads.example.com^"];
        let blocker = AdBlocker::with_rules(&rules);

        let url = Url::parse("https://ads.example.com/banner.js").unwrap();
        let source = Url::parse("https://outlook.live.com/").unwrap();

        assert!(blocker.should_block(&url, &source, ResourceType::Script));
        assert_eq!(blocker.blocked_count(), 1);
    }

    #[test]
    fn test_disabled_blocker_allows_everything() {
        let mut blocker = AdBlocker::with_rules(&["||ads.example.com^"]);
        blocker.set_enabled(false);

        let url = Url::parse("https://ads.example.com/banner.js").unwrap();
        let source = Url::parse("https://outlook.live.com/").unwrap();

        assert!(!blocker.should_block(&url, &source, ResourceType::Script));
    }

    #[test]
    fn test_wrapped_apps_not_blocked_by_default_rules() {
        let blocker = AdBlocker::new();
        let source = Url::parse("https://www.microsoft365.com/").unwrap();

        for url in [
            "https://outlook.live.com/mail/0/",
            "https://teams.live.com/v2/",
            "https://onedrive.live.com/",
        ] {
            let url = Url::parse(url).unwrap();
            assert!(
                !blocker.should_block(&url, &source, ResourceType::Document),
                "should not block {}",
                url
            );
        }
    }
}
