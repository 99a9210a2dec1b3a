//! Workload launcher
//!
//! Maps each tray/menu entry to its launch URL. The account-mode suffix
//! (`?auth=1` personal, `?auth=2` work/school) selects which account the
//! web apps sign in with.

/// A Microsoft 365 workload reachable from the tray
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Workload {
    Word,
    Excel,
    PowerPoint,
    Outlook,
    OneDrive,
    OneNote,
    Teams,
    AllApps,
}

/// Tray menu order
pub const ALL_WORKLOADS: &[Workload] = &[
    Workload::Word,
    Workload::Excel,
    Workload::PowerPoint,
    Workload::Outlook,
    Workload::OneDrive,
    Workload::OneNote,
    Workload::Teams,
    Workload::AllApps,
];

impl Workload {
    pub fn label(&self) -> &'static str {
        match self {
            Workload::Word => "Word",
            Workload::Excel => "Excel",
            Workload::PowerPoint => "PowerPoint",
            Workload::Outlook => "Outlook",
            Workload::OneDrive => "OneDrive",
            Workload::OneNote => "OneNote",
            Workload::Teams => "Teams",
            Workload::AllApps => "All Apps",
        }
    }

    /// Stable id used for tray menu items
    pub fn menu_id(&self) -> &'static str {
        match self {
            Workload::Word => "launch-word",
            Workload::Excel => "launch-excel",
            Workload::PowerPoint => "launch-powerpoint",
            Workload::Outlook => "launch-outlook",
            Workload::OneDrive => "launch-onedrive",
            Workload::OneNote => "launch-onenote",
            Workload::Teams => "launch-teams",
            Workload::AllApps => "launch-allapps",
        }
    }

    pub fn from_menu_id(id: &str) -> Option<Self> {
        ALL_WORKLOADS.iter().copied().find(|w| w.menu_id() == id)
    }

    /// Launch URL for this workload under the given account mode.
    ///
    /// Outlook and Teams live on their own consumer hosts and ignore the
    /// suffix; OneNote has distinct personal and work entry points.
    pub fn launch_url(&self, account_mode: &str) -> String {
        match self {
            Workload::Word => format!("https://microsoft365.com/launch/word{}", account_mode),
            Workload::Excel => format!("https://microsoft365.com/launch/excel{}", account_mode),
            Workload::PowerPoint => {
                format!("https://microsoft365.com/launch/powerpoint{}", account_mode)
            }
            Workload::Outlook => "https://outlook.live.com/mail/0/".to_string(),
            Workload::OneDrive => {
                format!("https://microsoft365.com/launch/onedrive{}", account_mode)
            }
            Workload::OneNote => {
                if account_mode == "?auth=2" {
                    "https://www.microsoft365.com/launch/onenote?auth=2".to_string()
                } else {
                    "https://www.onenote.com/notebooks?auth=1".to_string()
                }
            }
            Workload::Teams => "https://teams.live.com/v2/".to_string(),
            Workload::AllApps => format!("https://www.microsoft365.com/apps{}", account_mode),
        }
    }
}

/// Start URL for the main window
pub fn start_url(custom_page: &str, account_mode: &str) -> String {
    let page = custom_page.trim_matches('/');
    if page.is_empty() {
        format!("https://microsoft365.com/{}", account_mode)
    } else {
        format!("https://microsoft365.com/{}{}", page, account_mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_launch_urls_carry_account_mode() {
        assert_eq!(
            Workload::Word.launch_url("?auth=1"),
            "https://microsoft365.com/launch/word?auth=1"
        );
        assert_eq!(
            Workload::AllApps.launch_url("?auth=2"),
            "https://www.microsoft365.com/apps?auth=2"
        );
    }

    #[test]
    fn test_consumer_hosts_ignore_account_mode() {
        assert_eq!(
            Workload::Outlook.launch_url("?auth=2"),
            "https://outlook.live.com/mail/0/"
        );
        assert_eq!(
            Workload::Teams.launch_url("?auth=1"),
            "https://teams.live.com/v2/"
        );
    }

    #[test]
    fn test_onenote_splits_on_account_mode() {
        assert_eq!(
            Workload::OneNote.launch_url("?auth=2"),
            "https://www.microsoft365.com/launch/onenote?auth=2"
        );
        assert_eq!(
            Workload::OneNote.launch_url("?auth=1"),
            "https://www.onenote.com/notebooks?auth=1"
        );
    }

    #[test]
    fn test_start_url_shapes() {
        assert_eq!(start_url("", "?auth=1"), "https://microsoft365.com/?auth=1");
        assert_eq!(
            start_url("launch/word", "?auth=2"),
            "https://microsoft365.com/launch/word?auth=2"
        );
        assert_eq!(
            start_url("/apps/", "?auth=1"),
            "https://microsoft365.com/apps?auth=1"
        );
    }

    #[test]
    fn test_menu_id_round_trip() {
        for w in ALL_WORKLOADS {
            assert_eq!(Workload::from_menu_id(w.menu_id()), Some(*w));
        }
        assert_eq!(Workload::from_menu_id("launch-unknown"), None);
    }
}
