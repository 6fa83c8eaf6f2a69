// src/config.rs
// =============================================================================
// This module holds the crawl configuration.
//
// Every run is described by one CrawlConfig value. It is built once (from a
// JSON file, CLI flags, or both), validated, and then only ever borrowed by
// the crawler and the extractor. Nothing mutates it while a crawl is running.
//
// Rust concepts:
// - serde: Derive macros turn JSON into our struct automatically
// - #[serde(default)]: Missing fields fall back to Default::default()
// - Option<T>: Used for settings that may be absent (page cap, filter)
// =============================================================================

use anyhow::{anyhow, bail, Context, Result};
use scraper::Selector;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::extract::CleanupRules;

// Config file picked up from the working directory when --config is not given
pub const DEFAULT_CONFIG_FILE: &str = "docs-crawler.json";

// Label written to the output header when crawling an explicit URL list
pub const LINKS_LIST_LABEL: &str = "LINKS_LIST";

/// Run parameters for one crawl.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    /// Base URL to start crawling from. Discovered links must start with it.
    pub start_url: String,

    /// Explicit URLs to crawl instead of following links from `start_url`.
    /// Relative entries are resolved against `start_url`.
    pub links: Vec<String>,

    /// File the crawled text is written to.
    pub output_file: PathBuf,

    /// CSS selector of the element holding the page content (e.g. "main").
    pub focus_element: String,

    /// Maximum number of pages to write. `None` crawls everything reachable.
    pub max_pages: Option<usize>,

    /// Polite delay between requests, in milliseconds.
    pub delay_ms: u64,

    /// Per-request timeout, in seconds.
    pub timeout_secs: u64,

    /// Substring a discovered URL must contain to be queued.
    /// `None` queues every URL under `start_url`.
    pub link_filter: Option<String>,

    /// User-Agent header sent with every request.
    pub user_agent: String,

    /// Text cleanup tables (mangled literals and protected terms).
    pub cleanup: CleanupRules,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            start_url: String::new(),
            links: Vec::new(),
            output_file: PathBuf::from("docs.txt"),
            focus_element: "main".to_string(),
            max_pages: None,
            delay_ms: 1000,
            timeout_secs: 30,
            link_filter: Some("/docs/".to_string()),
            user_agent: format!("docs-crawler/{}", env!("CARGO_PKG_VERSION")),
            cleanup: CleanupRules::default(),
        }
    }
}

impl CrawlConfig {
    // Creates a configuration for crawling from `start_url` with defaults
    #[cfg(test)]
    pub fn new(start_url: &str) -> Self {
        Self {
            start_url: start_url.to_string(),
            ..Self::default()
        }
    }

    // Loads a configuration from a JSON file
    //
    // Fields missing from the file keep their default values, so a file
    // containing only {"start_url": "..."} is a complete configuration.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_json(&contents)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    // Checks everything that would otherwise fail halfway through a crawl
    //
    // Returns: the parsed start URL so callers don't parse it twice
    pub fn validate(&self) -> Result<Url> {
        if self.start_url.trim().is_empty() {
            bail!(
                "No start URL configured (pass one on the command line or set start_url in {})",
                DEFAULT_CONFIG_FILE
            );
        }

        let start = Url::parse(&self.start_url)
            .map_err(|e| anyhow!("Invalid start URL '{}': {}", self.start_url, e))?;

        if start.scheme() != "http" && start.scheme() != "https" {
            bail!("Start URL must be http or https: {}", self.start_url);
        }

        Selector::parse(&self.focus_element)
            .map_err(|e| anyhow!("Invalid focus element '{}': {:?}", self.focus_element, e))?;

        if self.max_pages == Some(0) {
            bail!("max_pages must be a positive number (omit it to crawl all pages)");
        }

        Ok(start)
    }

    // True when crawling a fixed URL list instead of following links
    pub fn is_list_mode(&self) -> bool {
        !self.links.is_empty()
    }

    // Source descriptor for the output header and the startup banner
    pub fn source_label(&self) -> &str {
        if self.is_list_mode() {
            LINKS_LIST_LABEL
        } else {
            &self.start_url
        }
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = CrawlConfig::new("https://example.com/docs/");
        assert_eq!(config.focus_element, "main");
        assert_eq!(config.output_file, PathBuf::from("docs.txt"));
        assert_eq!(config.max_pages, None);
        assert_eq!(config.delay(), Duration::from_secs(1));
        assert_eq!(config.link_filter.as_deref(), Some("/docs/"));
        assert!(!config.is_list_mode());
        assert_eq!(config.source_label(), "https://example.com/docs/");
    }

    #[test]
    fn test_list_mode_label() {
        let mut config = CrawlConfig::new("https://example.com");
        config.links = vec!["/docs/a".to_string()];
        assert!(config.is_list_mode());
        assert_eq!(config.source_label(), "LINKS_LIST");
    }

    #[test]
    fn test_from_json_partial() {
        let config = CrawlConfig::from_json(
            r#"{"start_url": "https://example.com", "max_pages": 3, "link_filter": null}"#,
        )
        .unwrap();
        assert_eq!(config.start_url, "https://example.com");
        assert_eq!(config.max_pages, Some(3));
        assert_eq!(config.link_filter, None);
        // Untouched fields keep their defaults
        assert_eq!(config.focus_element, "main");
        assert_eq!(config.cleanup, CleanupRules::default());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"start_url": "https://example.com", "focus_element": "article"}}"#
        )
        .unwrap();

        let config = CrawlConfig::from_file(file.path()).unwrap();
        assert_eq!(config.focus_element, "article");
    }

    #[test]
    fn test_from_file_missing() {
        let result = CrawlConfig::from_file("/definitely/not/here.json");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_ok() {
        let config = CrawlConfig::new("https://example.com/docs");
        let start = config.validate().unwrap();
        assert_eq!(start.as_str(), "https://example.com/docs");
    }

    #[test]
    fn test_validate_rejects_bad_input() {
        assert!(CrawlConfig::default().validate().is_err());
        assert!(CrawlConfig::new("not a url").validate().is_err());
        assert!(CrawlConfig::new("ftp://example.com").validate().is_err());

        let mut config = CrawlConfig::new("https://example.com");
        config.focus_element = "main[".to_string();
        assert!(config.validate().is_err());

        let mut config = CrawlConfig::new("https://example.com");
        config.max_pages = Some(0);
        assert!(config.validate().is_err());
    }
}
