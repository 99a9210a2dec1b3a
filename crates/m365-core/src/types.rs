//! Common types used throughout M365 Desktop

use serde::{Deserialize, Serialize};

/// Unique identifier for a shell window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WindowId(pub u64);

impl WindowId {
    pub fn new() -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for WindowId {
    fn default() -> Self {
        Self::new()
    }
}

/// An outbound navigation intent from content running inside an embedded view.
///
/// The target URL is kept as the raw string the view handed us; a malformed
/// URL is a policy input (it produces a `Deny`), not a construction failure.
#[derive(Debug, Clone)]
pub struct NavigationRequest {
    pub target_url: String,
    pub originating_window: WindowId,
    pub user_initiated: bool,
}

impl NavigationRequest {
    pub fn new(target_url: impl Into<String>, originating_window: WindowId) -> Self {
        Self {
            target_url: target_url.into(),
            originating_window,
            user_initiated: true,
        }
    }
}

/// Outcome of evaluating a navigation intent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationDecision {
    /// Load the URL in the originating view
    AllowInPlace,
    /// Spawn a new window of the given pixel size and load the URL there
    AllowNewWindow { width: u32, height: u32 },
    /// Drop the request entirely
    Deny,
    /// Drop the request in the embedded view and hand the URL to the OS
    /// default browser
    DenyDeferToExternalBrowser,
}

/// Pixel dimensions of the monitor hosting the active window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenMetrics {
    pub width_px: u32,
    pub height_px: u32,
}

impl ScreenMetrics {
    pub fn new(width_px: u32, height_px: u32) -> Self {
        Self {
            width_px,
            height_px,
        }
    }
}

/// Workload icon shown as the dynamic window/taskbar icon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IconKind {
    PowerPoint,
    Word,
    Excel,
    Outlook,
    OneDrive,
    Teams,
    OneNote,
}

impl IconKind {
    /// Label used for the taskbar overlay description
    pub fn label(&self) -> &'static str {
        match self {
            IconKind::PowerPoint => "PowerPoint",
            IconKind::Word => "Word",
            IconKind::Excel => "Excel",
            IconKind::Outlook => "Outlook",
            IconKind::OneDrive => "OneDrive",
            IconKind::Teams => "Teams",
            IconKind::OneNote => "OneNote",
        }
    }
}
