//! Platform helpers

use m365_core::{M365Error, M365Result};
use std::process::Command;

/// Hand a URL to the user's default browser.
///
/// Spawns and forgets; the browser's exit status is not our concern.
pub fn open_external(url: &str) -> M365Result<()> {
    // Only web URLs leave the shell. Anything else was already rejected by
    // the navigation policy, but a second gate here keeps this helper safe
    // to call with arbitrary strings.
    if !url.starts_with("https://") && !url.starts_with("http://") {
        return Err(M365Error::config(format!(
            "refusing to open non-web URL externally: {}",
            url
        )));
    }

    #[cfg(target_os = "windows")]
    let result = Command::new("cmd").args(["/C", "start", "", url]).spawn();

    #[cfg(target_os = "macos")]
    let result = Command::new("open").arg(url).spawn();

    #[cfg(all(unix, not(target_os = "macos")))]
    let result = Command::new("xdg-open").arg(url).spawn();

    result
        .map(|_| log::info!("Opened externally: {}", url))
        .map_err(M365Error::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_web_urls() {
        assert!(open_external("file:///etc/passwd").is_err());
        assert!(open_external("javascript:alert(1)").is_err());
        assert!(open_external("not a url").is_err());
    }
}
