//! Startup connectivity probe

use std::net::ToSocketAddrs;

const PROBE_HOST: &str = "microsoft.com:443";

/// Whether the Microsoft 365 endpoints look reachable.
///
/// DNS resolution is enough of a signal here; the WebView surfaces real
/// network errors on its own once loading starts.
pub fn is_online() -> bool {
    match PROBE_HOST.to_socket_addrs() {
        Ok(mut addrs) => addrs.next().is_some(),
        Err(e) => {
            log::warn!("Connectivity probe failed: {}", e);
            false
        }
    }
}

/// Probe on a detached thread and warn the user if offline
pub fn warn_if_offline() {
    std::thread::Builder::new()
        .name("connectivity".to_string())
        .spawn(|| {
            if !is_online() {
                rfd::MessageDialog::new()
                    .set_level(rfd::MessageLevel::Warning)
                    .set_title("You appear to be offline")
                    .set_description(
                        "Microsoft 365 could not be reached. The app will keep \
                         trying once your connection returns.",
                    )
                    .show();
            }
        })
        .map(|_| ())
        .unwrap_or_else(|e| log::error!("Failed to spawn connectivity probe: {}", e));
}
