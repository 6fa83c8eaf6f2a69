// src/extract/mod.rs
// =============================================================================
// This module extracts readable text from documentation pages.
//
// Submodules:
// - html: Walks the focus element, inlines links, pulls out code and tables
// - table: Renders <table> elements as pipe-delimited text
// - cleanup: Line-level text normalization driven by CleanupRules
//
// The Extractor ties them together:
//   focus element -> placeholder text -> cleanup -> restore code/tables
//
// It never touches the network or the filesystem, so it is easy to test
// with inline HTML strings.
// =============================================================================

mod cleanup;
mod html;
mod table;

pub use cleanup::CleanupRules;

use anyhow::{anyhow, Result};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// One successfully extracted page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub title: String,
    pub body: String,
    pub url: String,
}

/// Converts parsed HTML into a `Page`.
#[derive(Debug)]
pub struct Extractor {
    focus: Selector,
    rules: CleanupRules,
    placeholder: Regex,
}

impl Extractor {
    // Creates an extractor for the given focus selector
    //
    // Parameters:
    //   focus_selector: CSS selector of the content element ("main", "article", ...)
    //   rules: cleanup tables applied to the extracted text
    pub fn new(focus_selector: &str, rules: CleanupRules) -> Result<Self> {
        let focus = Selector::parse(focus_selector)
            .map_err(|e| anyhow!("Invalid focus element '{}': {:?}", focus_selector, e))?;
        let placeholder = Regex::new(html::PLACEHOLDER_PATTERN)?;

        Ok(Self {
            focus,
            rules,
            placeholder,
        })
    }

    // Extracts the title and body of a page
    //
    // Returns: None when the page has no focus element, or when the focus
    //          element holds no text at all. Neither case is an error; the
    //          caller just skips the page.
    pub fn extract(&self, document: &Html, page_url: &Url) -> Option<Page> {
        let focus = document.select(&self.focus).next()?;

        let title = page_title(focus, page_url);

        let content = html::render_focus(focus, page_url);
        let cleaned = self.rules.clean(&content.text);
        let body = html::restore_placeholders(
            &self.placeholder,
            &cleaned,
            &content.code_blocks,
            &content.tables,
        );

        if body.trim().is_empty() {
            return None;
        }

        Some(Page {
            title,
            body,
            url: page_url.to_string(),
        })
    }

    // Convenience wrapper that parses the HTML first
    #[cfg(test)]
    pub fn extract_html(&self, html: &str, page_url: &Url) -> Option<Page> {
        let document = Html::parse_document(html);
        self.extract(&document, page_url)
    }
}

// Text of the first <h1> inside the focus element, or the page URL
fn page_title(focus: ElementRef, page_url: &Url) -> String {
    focus
        .descendants()
        .filter_map(ElementRef::wrap)
        .find(|e| e.value().name() == "h1")
        .map(|h1| html::inline_text(h1, page_url).trim().to_string())
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| page_url.to_string())
}
