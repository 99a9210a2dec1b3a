//! Release update check
//!
//! Polls the GitHub releases API once at startup (when enabled) and reports
//! whether a newer tagged release exists. The check is advisory; nothing is
//! downloaded or installed.

use m365_core::{M365Error, M365Result};
use serde::Deserialize;
use std::time::Duration;

const RELEASES_URL: &str =
    "https://api.github.com/repos/m365-desktop/m365-desktop/releases/latest";

#[derive(Debug, Deserialize)]
struct ReleaseInfo {
    tag_name: String,
    html_url: String,
}

/// A newer release than the running build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateInfo {
    pub version: String,
    pub url: String,
}

/// Query the latest release and compare it against `current_version`
pub fn check_for_updates(current_version: &str) -> M365Result<Option<UpdateInfo>> {
    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(15))
        .user_agent(concat!("m365-desktop/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| M365Error::update(format!("failed to build HTTP client: {}", e)))?;

    let release: ReleaseInfo = client
        .get(RELEASES_URL)
        .send()
        .map_err(|e| M365Error::update(format!("release check failed: {}", e)))?
        .error_for_status()
        .map_err(|e| M365Error::update(format!("release check failed: {}", e)))?
        .json()
        .map_err(|e| M365Error::update(format!("malformed release data: {}", e)))?;

    let latest = release.tag_name.trim_start_matches('v');
    if is_newer(latest, current_version) {
        Ok(Some(UpdateInfo {
            version: latest.to_string(),
            url: release.html_url,
        }))
    } else {
        Ok(None)
    }
}

/// Parse a dotted version into its numeric components, ignoring anything
/// after a pre-release or build suffix.
fn parse_version(v: &str) -> Vec<u64> {
    v.split(['-', '+'])
        .next()
        .unwrap_or("")
        .split('.')
        .map(|part| part.parse().unwrap_or(0))
        .collect()
}

fn is_newer(candidate: &str, current: &str) -> bool {
    let a = parse_version(candidate);
    let b = parse_version(current);
    let len = a.len().max(b.len());
    for i in 0..len {
        let x = a.get(i).copied().unwrap_or(0);
        let y = b.get(i).copied().unwrap_or(0);
        if x != y {
            return x > y;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newer_versions_detected() {
        assert!(is_newer("1.2.3", "1.2.2"));
        assert!(is_newer("2.0.0", "1.9.9"));
        assert!(is_newer("1.10.0", "1.9.0"));
    }

    #[test]
    fn test_equal_and_older_versions_ignored() {
        assert!(!is_newer("1.2.3", "1.2.3"));
        assert!(!is_newer("1.2.2", "1.2.3"));
        assert!(!is_newer("0.9.0", "1.0.0"));
    }

    #[test]
    fn test_uneven_component_counts() {
        assert!(is_newer("1.2.3.1", "1.2.3"));
        assert!(!is_newer("1.2", "1.2.0"));
    }

    #[test]
    fn test_suffixes_are_ignored() {
        assert!(is_newer("1.3.0-beta.1", "1.2.9"));
        assert!(!is_newer("1.2.3+build5", "1.2.3"));
    }
}
