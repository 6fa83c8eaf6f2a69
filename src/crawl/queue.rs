// src/crawl/queue.rs
// =============================================================================
// This module runs the crawl loop.
//
// How it works:
// 1. Seed the frontier with the start URL (or the explicit URL list)
// 2. Pop the next URL and mark it visited
// 3. Fetch the page and extract its focus element
// 4. Append the extracted text to the output file
// 5. When following links, queue same-prefix documentation links
// 6. Wait a little, then repeat until the frontier is empty or the page
//    limit is reached
//
// Guarantees:
// - No URL is fetched twice in one run
// - At most max_pages pages are written
// - A failing URL is logged and skipped; it never aborts the run
//
// Rust concepts:
// - HashSet: Tracks visited and queued URLs (O(1) lookup)
// - VecDeque: FIFO queue for breadth-first order
// - Generics: The crawl loop writes to any `impl Write`, so tests can use
//   a Vec<u8> instead of a real file
// =============================================================================

use anyhow::Result;
use chrono::Local;
use log::{debug, error, info, warn};
use scraper::{ElementRef, Html};
use std::collections::{HashSet, VecDeque};
use std::io::Write;
use url::Url;

use super::fetch::Fetcher;
use super::output::{backup_existing, OutputSink};
use crate::config::CrawlConfig;
use crate::extract::Extractor;

/// Counters collected during a crawl.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CrawlStats {
    /// Pages written to the output file
    pub pages_written: usize,
    /// Pages fetched but without extractable content
    pub pages_skipped: usize,
    /// URLs whose fetch failed
    pub pages_failed: usize,
    /// URLs added to the frontier by link discovery
    pub links_queued: usize,
    /// True when the crawl stopped because max_pages was reached
    pub reached_limit: bool,
}

// URLs waiting to be crawled plus everything already visited
//
// A URL is only admitted when it is neither visited nor already waiting,
// so the queue never holds duplicates.
#[derive(Debug, Default)]
struct Frontier {
    queue: VecDeque<String>,
    queued: HashSet<String>,
    visited: HashSet<String>,
}

impl Frontier {
    // Builds the initial frontier
    //
    // List mode: every entry of config.links, resolved against the start URL
    // Otherwise: just the start URL, in the normalized form that discovered
    // links are compared against
    fn seeded(config: &CrawlConfig, start: &Url) -> Self {
        let mut frontier = Self::default();

        if config.is_list_mode() {
            for link in &config.links {
                match start.join(link) {
                    Ok(url) => {
                        frontier.push(url.to_string());
                    }
                    Err(e) => warn!("Skipping invalid URL in links list '{}': {}", link, e),
                }
            }
        } else {
            frontier.push(start.to_string());
        }

        frontier
    }

    // Returns: true when the URL was added
    fn push(&mut self, url: String) -> bool {
        if self.visited.contains(&url) || self.queued.contains(&url) {
            return false;
        }
        self.queued.insert(url.clone());
        self.queue.push_back(url);
        true
    }

    fn pop(&mut self) -> Option<String> {
        let url = self.queue.pop_front()?;
        self.queued.remove(&url);
        Some(url)
    }

    fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    fn mark_visited(&mut self, url: &str) {
        self.visited.insert(url.to_string());
    }
}

// Runs a full crawl as described by the configuration
//
// Steps: validate config -> back up old output -> create output file ->
// crawl. Errors before the loop starts (bad config, unwritable output) are
// returned; errors for individual pages are only logged.
pub async fn crawl_docs(config: &CrawlConfig) -> Result<CrawlStats> {
    config.validate()?;
    let extractor = Extractor::new(&config.focus_element, config.cleanup.clone())?;
    let fetcher = Fetcher::new(config)?;

    backup_existing(&config.output_file);
    let mut sink = OutputSink::create(&config.output_file)?;

    crawl_into(config, &fetcher, &extractor, &mut sink).await
}

// The crawl loop itself, writing to any sink
pub async fn crawl_into<W: Write>(
    config: &CrawlConfig,
    fetcher: &Fetcher,
    extractor: &Extractor,
    sink: &mut OutputSink<W>,
) -> Result<CrawlStats> {
    let start = config.validate()?;
    let mut frontier = Frontier::seeded(config, &start);
    let mut stats = CrawlStats::default();

    sink.write_header(Local::now(), config.source_label())?;

    while !frontier.is_empty() && !limit_reached(config, &stats) {
        let Some(url) = frontier.pop() else {
            break;
        };

        if frontier.is_visited(&url) {
            debug!("Skipping already visited URL: {}", url);
            continue;
        }

        info!("Processing page {}: {}", stats.pages_written + 1, url);
        frontier.mark_visited(&url);

        let page_url = match Url::parse(&url) {
            Ok(page_url) => page_url,
            Err(e) => {
                error!("Error processing {}: {}", url, e);
                stats.pages_failed += 1;
                continue;
            }
        };

        match fetcher.fetch(page_url.as_str()).await {
            Ok(html) => {
                let discovered =
                    process_page(config, extractor, sink, &start, &page_url, &html, &mut stats)?;
                for link in discovered {
                    if frontier.push(link.clone()) {
                        debug!("Queued: {}", link);
                        stats.links_queued += 1;
                    }
                }
            }
            Err(e) => {
                error!("Error processing {}: {:#}", url, e);
                stats.pages_failed += 1;
            }
        }

        // Polite delay, but not after the last request
        if !frontier.is_empty() && !limit_reached(config, &stats) {
            tokio::time::sleep(config.delay()).await;
        }
    }

    if let Some(max_pages) = config.max_pages {
        if stats.pages_written >= max_pages {
            stats.reached_limit = true;
            info!("Reached maximum pages limit ({})", max_pages);
        }
    }

    Ok(stats)
}

fn limit_reached(config: &CrawlConfig, stats: &CrawlStats) -> bool {
    config
        .max_pages
        .is_some_and(|max_pages| stats.pages_written >= max_pages)
}

// Extracts and writes one fetched page
//
// Returns: links to add to the frontier (always empty in list mode)
//
// The parsed document is used for both extraction and link discovery, so
// each page is fetched and parsed exactly once.
fn process_page<W: Write>(
    config: &CrawlConfig,
    extractor: &Extractor,
    sink: &mut OutputSink<W>,
    start: &Url,
    page_url: &Url,
    html: &str,
    stats: &mut CrawlStats,
) -> Result<Vec<String>> {
    let document = Html::parse_document(html);

    match extractor.extract(&document, page_url) {
        Some(page) => {
            sink.write_page(&page)?;
            stats.pages_written += 1;
        }
        None => {
            info!(
                "No <{}> content found on {}, skipping",
                config.focus_element, page_url
            );
            stats.pages_skipped += 1;
        }
    }

    if config.is_list_mode() {
        return Ok(Vec::new());
    }

    Ok(discover_links(
        &document,
        page_url,
        start.as_str(),
        config.link_filter.as_deref(),
    ))
}

// Finds crawlable documentation links anywhere on the page
//
// Parameters:
//   document: the full parsed page (not just the focus element)
//   page_url: the page's URL (for resolving relative links)
//   prefix: a link must start with this string (the start URL)
//   required: a link must also contain this substring, when set
//
// Returns: absolute URLs without #fragments, in page order
fn discover_links(
    document: &Html,
    page_url: &Url,
    prefix: &str,
    required: Option<&str>,
) -> Vec<String> {
    let mut links = Vec::new();

    let anchors = document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|e| e.value().name() == "a");

    for anchor in anchors {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let Some(link) = resolve_link(page_url, href) else {
            continue;
        };

        if link.starts_with(prefix) && required.map_or(true, |s| link.contains(s)) {
            links.push(link);
        }
    }

    links
}

// Resolves a link (possibly relative) to an absolute http(s) URL
fn resolve_link(base: &Url, href: &str) -> Option<String> {
    let mut url = base.join(href).ok()?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return None;
    }

    url.set_fragment(None);
    Some(url.to_string())
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why FIFO instead of any order?
//    - A VecDeque popped from the front visits pages breadth-first
//    - Runs over the same site produce the same page order, which makes
//      output files easy to diff
//
// 2. Why strip #fragments?
//    - "page#install" and "page#usage" are the same document
//    - Without stripping, every in-page anchor would trigger another fetch
//
// 3. Why is the prefix check a plain string comparison?
//    - It keeps the crawl under the exact start URL, path included
//    - Both sides are normalized by the url crate first, so a start URL
//      typed as "HTTP://Example.com:80/docs" still matches its own links
//    - "https://example.com/docs" admits "https://example.com/docs/intro"
//      but not "https://example.com/blog"
// -----------------------------------------------------------------------------
