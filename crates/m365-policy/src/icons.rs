//! Dynamic icon selection
//!
//! Matches substrings in the current URL and title against a fixed
//! priority-ordered rule table. First match wins; titles and URLs can carry
//! several overlapping hints (an Outlook tab previewing a .docx attachment,
//! for example), so order matters.

use m365_core::types::IconKind;

struct IconRule {
    kind: IconKind,
    url_hints: &'static [&'static str],
    title_hints: &'static [&'static str],
}

/// Priority-ordered rule table. File-type hints outrank domain hints so an
/// open document wins over the app hosting it.
const ICON_RULES: &[IconRule] = &[
    IconRule {
        kind: IconKind::PowerPoint,
        url_hints: &["&ithint=file%2cpptx"],
        title_hints: &[".pptx"],
    },
    IconRule {
        kind: IconKind::Word,
        url_hints: &["&ithint=file%2cdocx"],
        title_hints: &[".docx"],
    },
    IconRule {
        kind: IconKind::Excel,
        url_hints: &["&ithint=file%2cxlsx"],
        title_hints: &[".xlsx"],
    },
    IconRule {
        kind: IconKind::Outlook,
        url_hints: &["outlook.live.com", "outlook.office.com"],
        title_hints: &[],
    },
    IconRule {
        kind: IconKind::OneDrive,
        url_hints: &["onedrive.live.com", "onedrive.aspx"],
        title_hints: &[],
    },
    IconRule {
        kind: IconKind::Teams,
        url_hints: &["teams.live.com"],
        title_hints: &[],
    },
    IconRule {
        kind: IconKind::OneNote,
        url_hints: &["&ithint=onenote"],
        title_hints: &[],
    },
];

/// Pick the workload icon for the current page, or `None` to clear the
/// overlay
pub fn select_icon(url: &str, title: &str) -> Option<IconKind> {
    ICON_RULES
        .iter()
        .find(|rule| {
            rule.url_hints.iter().any(|hint| url.contains(hint))
                || rule.title_hints.iter().any(|hint| title.contains(hint))
        })
        .map(|rule| rule.kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_hints_match_url_or_title() {
        assert_eq!(
            select_icon("https://onedrive.live.com/edit?a=1&ithint=file%2cpptx", ""),
            Some(IconKind::PowerPoint)
        );
        assert_eq!(
            select_icon("https://www.office.com/", "Quarterly report.docx - Word"),
            Some(IconKind::Word)
        );
        assert_eq!(
            select_icon("https://www.office.com/", "budget.xlsx"),
            Some(IconKind::Excel)
        );
    }

    #[test]
    fn test_domain_hints() {
        assert_eq!(
            select_icon("https://outlook.live.com/mail/0/", "Inbox"),
            Some(IconKind::Outlook)
        );
        assert_eq!(
            select_icon("https://outlook.office.com/mail/", ""),
            Some(IconKind::Outlook)
        );
        assert_eq!(
            select_icon("https://onedrive.live.com/?id=root", "Files"),
            Some(IconKind::OneDrive)
        );
        assert_eq!(
            select_icon("https://teams.live.com/v2/", "Chat"),
            Some(IconKind::Teams)
        );
        assert_eq!(
            select_icon("https://www.onenote.com/nb?x=1&ithint=onenote", ""),
            Some(IconKind::OneNote)
        );
    }

    #[test]
    fn test_file_hint_outranks_domain_hint() {
        // A .pptx preview inside OneDrive shows the PowerPoint icon
        assert_eq!(
            select_icon(
                "https://onedrive.live.com/view?id=1&ithint=file%2cpptx",
                "deck.pptx"
            ),
            Some(IconKind::PowerPoint)
        );
        // A .docx attachment open from Outlook shows the Word icon
        assert_eq!(
            select_icon("https://outlook.live.com/mail/0/", "notes.docx"),
            Some(IconKind::Word)
        );
    }

    #[test]
    fn test_no_match_clears_overlay() {
        assert_eq!(select_icon("https://www.microsoft365.com/apps", "Home"), None);
        assert_eq!(select_icon("", ""), None);
    }
}
