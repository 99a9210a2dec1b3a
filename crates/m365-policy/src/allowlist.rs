//! Static domain allow-list
//!
//! Wildcard host patterns permitted to open without leaving the embedded
//! shell. The set is bundled as a JSON data file, loaded once at startup,
//! and immutable thereafter.

use serde::Deserialize;

/// The bundled allow-list data file
const BUNDLED_DOMAINS: &str = include_str!("../data/domains.json");

#[derive(Debug, Deserialize)]
struct DomainsFile {
    domains: Vec<String>,
}

/// A single wildcard host pattern.
///
/// `*.office.com` matches `office.com` and any subdomain of it; a pattern
/// without the `*.` prefix requires a full host match. Matching is
/// case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainPattern {
    base: String,
    wildcard: bool,
}

impl DomainPattern {
    pub fn parse(pattern: &str) -> Self {
        let lower = pattern.trim().to_ascii_lowercase();
        match lower.strip_prefix("*.") {
            Some(base) => Self {
                base: base.to_string(),
                wildcard: true,
            },
            None => Self {
                base: lower,
                wildcard: false,
            },
        }
    }

    pub fn matches(&self, host: &str) -> bool {
        let host = host.to_ascii_lowercase();
        if host == self.base {
            return true;
        }
        // Suffix match must sit on a label boundary so that e.g.
        // "eviloffice.com" does not match "*.office.com"
        self.wildcard && host.ends_with(&format!(".{}", self.base))
    }
}

/// Ordered, immutable set of allow-list patterns
#[derive(Debug, Clone)]
pub struct DomainAllowList {
    patterns: Vec<DomainPattern>,
}

impl DomainAllowList {
    /// Load the allow-list bundled with the application
    pub fn bundled() -> Self {
        // The data file ships inside the binary; a parse failure is a build
        // defect, so fall back to an empty list rather than unwinding.
        let file: DomainsFile = serde_json::from_str(BUNDLED_DOMAINS).unwrap_or_else(|e| {
            log::error!("Bundled domain list is invalid: {}", e);
            DomainsFile {
                domains: Vec::new(),
            }
        });
        let list = Self::from_patterns(&file.domains);
        log::info!("Loaded {} allow-list patterns", list.patterns.len());
        list
    }

    pub fn from_patterns<S: AsRef<str>>(patterns: &[S]) -> Self {
        Self {
            patterns: patterns
                .iter()
                .map(|p| DomainPattern::parse(p.as_ref()))
                .collect(),
        }
    }

    /// Test a host against every pattern in order
    pub fn allows(&self, host: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(host))
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wildcard_matches_base_and_subdomains() {
        let p = DomainPattern::parse("*.office.com");
        assert!(p.matches("office.com"));
        assert!(p.matches("www.office.com"));
        assert!(p.matches("outlook.office.com"));
        assert!(p.matches("a.b.office.com"));
    }

    #[test]
    fn test_wildcard_requires_label_boundary() {
        let p = DomainPattern::parse("*.office.com");
        assert!(!p.matches("eviloffice.com"));
        assert!(!p.matches("office.com.evil.net"));
    }

    #[test]
    fn test_exact_pattern_requires_full_match() {
        let p = DomainPattern::parse("teams.live.com");
        assert!(p.matches("teams.live.com"));
        assert!(!p.matches("sub.teams.live.com"));
        assert!(!p.matches("live.com"));
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let p = DomainPattern::parse("*.Office.COM");
        assert!(p.matches("Outlook.OFFICE.com"));
    }

    #[test]
    fn test_bundled_list_loads() {
        let list = DomainAllowList::bundled();
        assert!(!list.is_empty());
        assert!(list.allows("microsoft365.com"));
        assert!(list.allows("outlook.live.com"));
        assert!(!list.allows("evil.example.com"));
    }
}
