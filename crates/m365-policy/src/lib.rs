//! Window-open / navigation policy for the M365 Desktop shell
//!
//! Pure decision logic: given a navigation intent, a configuration snapshot,
//! and the static domain allow-list, produce exactly one
//! [`NavigationDecision`](m365_core::types::NavigationDecision). The shell
//! executes the decision; this crate never touches a window, a socket, or
//! the settings file.

pub mod allowlist;
pub mod engine;
pub mod icons;

pub use allowlist::{DomainAllowList, DomainPattern};
pub use engine::{decide, is_download_intent, WINDOW_INSET_FRACTION};
pub use icons::select_icon;
