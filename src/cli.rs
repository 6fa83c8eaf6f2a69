// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Every setting can come from three places, later ones winning:
// 1. Built-in defaults (CrawlConfig::default)
// 2. A JSON config file (--config, or docs-crawler.json if it exists)
// 3. Command-line flags
//
// So `docs-crawler` alone runs whatever docs-crawler.json describes, and
// `docs-crawler https://example.com/docs/ --max-pages 5` needs no file.
// =============================================================================

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};

use crate::config::{CrawlConfig, DEFAULT_CONFIG_FILE};

#[derive(Parser, Debug)]
#[command(
    name = "docs-crawler",
    version,
    about = "Crawl a documentation site and save its text to a single file",
    long_about = "docs-crawler fetches documentation pages, extracts the readable text of each \
                  page's main content (keeping links, code blocks and tables), and appends \
                  everything to one text file."
)]
pub struct Cli {
    /// Documentation URL to start crawling from
    ///
    /// Only links starting with this URL are followed.
    pub start_url: Option<String>,

    /// JSON config file (defaults to ./docs-crawler.json when present)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Crawl this URL instead of following links (repeatable)
    ///
    /// Relative URLs are resolved against the start URL.
    #[arg(long = "link", value_name = "URL")]
    pub links: Vec<String>,

    /// Read URLs to crawl from a file, one per line (# starts a comment)
    #[arg(long, value_name = "FILE")]
    pub links_file: Option<PathBuf>,

    /// Output file
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// CSS selector of the element holding the page content
    #[arg(long, value_name = "SELECTOR")]
    pub focus: Option<String>,

    /// Stop after writing this many pages
    #[arg(long, value_name = "N")]
    pub max_pages: Option<usize>,

    /// Delay between requests in milliseconds
    #[arg(long, value_name = "MS")]
    pub delay_ms: Option<u64>,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Only follow links containing this substring
    #[arg(long, value_name = "TEXT", conflicts_with = "no_filter")]
    pub filter: Option<String>,

    /// Follow every link under the start URL
    #[arg(long)]
    pub no_filter: bool,

    /// User-Agent header to send
    #[arg(long, value_name = "AGENT")]
    pub user_agent: Option<String>,

    /// Show debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    // Builds the effective configuration (defaults <- file <- flags)
    pub fn load_config(&self) -> Result<CrawlConfig> {
        let mut config = match &self.config {
            Some(path) => CrawlConfig::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                CrawlConfig::from_file(DEFAULT_CONFIG_FILE)?
            }
            None => CrawlConfig::default(),
        };

        if let Some(start_url) = &self.start_url {
            config.start_url = start_url.clone();
        }
        if let Some(path) = &self.links_file {
            config.links = read_links_file(path)?;
        }
        if !self.links.is_empty() {
            config.links.extend(self.links.iter().cloned());
        }
        if let Some(output) = &self.output {
            config.output_file = output.clone();
        }
        if let Some(focus) = &self.focus {
            config.focus_element = focus.clone();
        }
        if self.max_pages.is_some() {
            config.max_pages = self.max_pages;
        }
        if let Some(delay_ms) = self.delay_ms {
            config.delay_ms = delay_ms;
        }
        if let Some(timeout_secs) = self.timeout_secs {
            config.timeout_secs = timeout_secs;
        }
        if let Some(filter) = &self.filter {
            config.link_filter = Some(filter.clone());
        }
        if self.no_filter {
            config.link_filter = None;
        }
        if let Some(user_agent) = &self.user_agent {
            config.user_agent = user_agent.clone();
        }

        Ok(config)
    }
}

// Reads one URL per line, skipping blank lines and # comments
fn read_links_file(path: &Path) -> Result<Vec<String>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read links file {}", path.display()))?;

    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("docs-crawler").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_flags_override_defaults() {
        let cli = parse(&[
            "https://example.com/docs/",
            "-o",
            "out.txt",
            "--focus",
            "article",
            "--max-pages",
            "5",
            "--delay-ms",
            "250",
            "--no-filter",
        ]);
        let config = cli.load_config().unwrap();

        assert_eq!(config.start_url, "https://example.com/docs/");
        assert_eq!(config.output_file, PathBuf::from("out.txt"));
        assert_eq!(config.focus_element, "article");
        assert_eq!(config.max_pages, Some(5));
        assert_eq!(config.delay_ms, 250);
        assert_eq!(config.link_filter, None);
    }

    #[test]
    fn test_repeated_links() {
        let cli = parse(&[
            "https://example.com",
            "--link",
            "/docs/a",
            "--link",
            "/docs/b",
        ]);
        let config = cli.load_config().unwrap();
        assert_eq!(config.links, vec!["/docs/a", "/docs/b"]);
        assert!(config.is_list_mode());
    }

    #[test]
    fn test_filter_conflicts_with_no_filter() {
        let result = Cli::try_parse_from([
            "docs-crawler",
            "https://example.com",
            "--filter",
            "/api/",
            "--no-filter",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_config_file_then_flags() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"start_url": "https://example.com/docs/", "max_pages": 10, "focus_element": "article"}}"#
        )
        .unwrap();

        let path = file.path().to_str().unwrap().to_string();
        let cli = parse(&["--config", &path, "--max-pages", "2"]);
        let config = cli.load_config().unwrap();

        assert_eq!(config.start_url, "https://example.com/docs/");
        assert_eq!(config.focus_element, "article");
        assert_eq!(config.max_pages, Some(2));
    }

    #[test]
    fn test_links_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# pages to crawl\n/docs/a\n\n  /docs/b  \n#/docs/c").unwrap();

        let links = read_links_file(file.path()).unwrap();
        assert_eq!(links, vec!["/docs/a", "/docs/b"]);
    }
}
