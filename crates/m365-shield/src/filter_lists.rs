//! Filter list management
//!
//! Downloads and caches EasyList and EasyPrivacy for the ad blocker.

use m365_core::config::app_cache_dir;
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};

/// Known filter list sources
pub struct FilterListSource {
    pub name: &'static str,
    pub url: &'static str,
    pub filename: &'static str,
}

/// Standard filter lists
pub const FILTER_LISTS: &[FilterListSource] = &[
    FilterListSource {
        name: "EasyList",
        url: "https://easylist.to/easylist/easylist.txt",
        filename: "easylist.txt",
    },
    FilterListSource {
        name: "EasyPrivacy",
        url: "https://easylist.to/easylist/easyprivacy.txt",
        filename: "easyprivacy.txt",
    },
];

/// How often to check for filter list updates (24 hours)
const UPDATE_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// Manages downloading and caching of filter lists
pub struct FilterListManager {
    cache_dir: PathBuf,
}

impl FilterListManager {
    /// Create a new filter list manager
    pub fn new() -> Option<Self> {
        let cache_dir = app_cache_dir().join("filter-lists");

        if let Err(e) = fs::create_dir_all(&cache_dir) {
            log::error!("Failed to create filter list cache directory: {}", e);
            return None;
        }

        Some(Self { cache_dir })
    }

    fn cache_path(&self, source: &FilterListSource) -> PathBuf {
        self.cache_dir.join(source.filename)
    }

    /// Check if a cached filter list needs updating
    fn needs_update(&self, source: &FilterListSource) -> bool {
        let path = self.cache_path(source);

        if !path.exists() {
            return true;
        }

        match fs::metadata(&path).and_then(|m| m.modified()) {
            Ok(modified) => match SystemTime::now().duration_since(modified) {
                Ok(age) => age > UPDATE_INTERVAL,
                Err(_) => true,
            },
            Err(_) => true,
        }
    }

    /// Download a filter list from the source
    fn download(&self, source: &FilterListSource) -> Result<String, String> {
        log::info!(
            "Downloading filter list: {} from {}",
            source.name,
            source.url
        );

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| format!("Failed to create HTTP client: {}", e))?;

        let response = client
            .get(source.url)
            .send()
            .map_err(|e| format!("Failed to download {}: {}", source.name, e))?;

        if !response.status().is_success() {
            return Err(format!(
                "Failed to download {}: HTTP {}",
                source.name,
                response.status()
            ));
        }

        let content = response
            .text()
            .map_err(|e| format!("Failed to read response body: {}", e))?;

        // Cache the downloaded content
        let path = self.cache_path(source);
        if let Err(e) = fs::write(&path, &content) {
            log::warn!("Failed to cache filter list {}: {}", source.name, e);
        } else {
            log::info!(
                "Cached filter list {} ({} bytes)",
                source.name,
                content.len()
            );
        }

        Ok(content)
    }

    /// Load a filter list from cache
    fn load_from_cache(&self, source: &FilterListSource) -> Option<String> {
        let path = self.cache_path(source);
        match fs::read_to_string(&path) {
            Ok(content) => {
                log::info!(
                    "Loaded cached filter list: {} ({} bytes)",
                    source.name,
                    content.len()
                );
                Some(content)
            }
            Err(e) => {
                log::warn!("Failed to load cached filter list {}: {}", source.name, e);
                None
            }
        }
    }

    /// Get a filter list, downloading if necessary
    pub fn get_filter_list(&self, source: &FilterListSource) -> Option<String> {
        if !self.needs_update(source) {
            if let Some(content) = self.load_from_cache(source) {
                return Some(content);
            }
        }

        match self.download(source) {
            Ok(content) => Some(content),
            Err(e) => {
                log::error!("{}", e);
                // Fall back to cached version if download fails
                self.load_from_cache(source)
            }
        }
    }

    /// Get all configured filter lists combined
    pub fn get_all_filter_lists(&self) -> String {
        let mut combined = String::new();

        for source in FILTER_LISTS {
            if let Some(content) = self.get_filter_list(source) {
                combined.push_str(&content);
                combined.push('\n');
            }
        }

        combined
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manager_creation() {
        let manager = FilterListManager::new();
        assert!(manager.is_some());
    }

    #[test]
    fn test_cache_path() {
        if let Some(manager) = FilterListManager::new() {
            let path = manager.cache_path(&FILTER_LISTS[0]);
            assert!(path.ends_with("easylist.txt"));
        }
    }
}
