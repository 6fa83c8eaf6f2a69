// src/crawl/mod.rs
// =============================================================================
// This module handles crawling a documentation site.
//
// Features:
// - Breadth-first crawling from a start URL, or a fixed list of URLs
// - Stays under the start URL and (by default) only follows /docs/ links
// - Optional page limit
// - Polite crawling with a fixed delay between requests
//
// Submodules:
// - queue: The frontier and the crawl loop
// - fetch: HTTP requests
// - output: The output file (header, page blocks, backups)
// =============================================================================

mod fetch;
mod output;
mod queue;

pub use queue::{crawl_docs, CrawlStats};
