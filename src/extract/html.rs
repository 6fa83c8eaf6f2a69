// src/extract/html.rs
// =============================================================================
// This module turns the focus element of a page into plain text.
//
// We walk the DOM tree that `scraper` builds for us, one node at a time:
// - Text nodes are copied as-is (cleanup happens later)
// - <a href> becomes "link text (https://absolute/url)"
// - <pre> and <code> are captured and replaced by [CODE_BLOCK_n]
// - <table> is rendered separately and replaced by [TABLE_n]
// - <script> and <style> are dropped
//
// The placeholders keep code and tables away from the line cleanup (which
// would otherwise strip indentation and split identifiers). They are swapped
// back in by restore_placeholders() once the text is clean.
//
// Rust concepts:
// - Recursion: An element's text is the text of its children
// - Borrowing: ElementRef<'a> borrows from the parsed document
// - Regex replace_all with a closure: One pass over all placeholders
// =============================================================================

use regex::{Captures, Regex};
use scraper::{ElementRef, Node};
use url::Url;

use super::table::render_table;

// Pattern matching both kinds of placeholder, e.g. [CODE_BLOCK_3] or [TABLE_1]
pub const PLACEHOLDER_PATTERN: &str = r"\[(CODE_BLOCK|TABLE)_(\d+)\]";

// How an element's subtree is turned into text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    // Main content: code and tables become placeholders
    Body,
    // Inside a heading, code block or table cell: links are inlined but
    // everything else is plain text
    Inline,
}

/// Text of the focus element with code blocks and tables pulled out.
#[derive(Debug, Default)]
pub struct RenderedContent {
    pub text: String,
    pub code_blocks: Vec<String>,
    pub tables: Vec<String>,
}

// Renders the focus element into placeholder-protected text
//
// Parameters:
//   focus: the element selected by the focus selector
//   base: the page URL (for resolving relative links)
//
// Returns: RenderedContent where code_blocks[i] belongs to [CODE_BLOCK_{i+1}]
//          and tables[i] to [TABLE_{i+1}]
pub fn render_focus(focus: ElementRef, base: &Url) -> RenderedContent {
    let mut content = RenderedContent::default();
    let mut text = String::new();
    render_children(focus, base, Mode::Body, &mut text, &mut content);
    content.text = text;
    content
}

// Text of an element with links inlined and no placeholders
pub fn inline_text(element: ElementRef, base: &Url) -> String {
    let mut scratch = RenderedContent::default();
    let mut text = String::new();
    render_children(element, base, Mode::Inline, &mut text, &mut scratch);
    text
}

fn render_children(
    element: ElementRef,
    base: &Url,
    mode: Mode,
    out: &mut String,
    content: &mut RenderedContent,
) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    render_element(child_element, base, mode, out, content);
                }
            }
            // Comments, doctypes and processing instructions carry no text
            _ => {}
        }
    }
}

fn render_element(
    element: ElementRef,
    base: &Url,
    mode: Mode,
    out: &mut String,
    content: &mut RenderedContent,
) {
    let name = element.value().name();

    match name {
        "script" | "style" => {}
        "a" => match element.value().attr("href") {
            Some(href) => out.push_str(&link_text(element, href, base)),
            // No href means nothing to append; keep the inner text
            None => render_children(element, base, mode, out, content),
        },
        "pre" | "code" if mode == Mode::Body => {
            content
                .code_blocks
                .push(tidy_code(&inline_text(element, base)));
            out.push_str(&format!("[CODE_BLOCK_{}]", content.code_blocks.len()));
        }
        "table" if mode == Mode::Body => {
            content.tables.push(render_table(element, base));
            out.push_str(&format!("[TABLE_{}]", content.tables.len()));
        }
        _ => render_children(element, base, mode, out, content),
    }
}

// Renders a link as "text (absolute-url)"
//
// The visible text is taken verbatim, like get-text would. When the href
// can't be resolved (e.g. "http://[bad"), it is shown as written.
fn link_text(element: ElementRef, href: &str, base: &Url) -> String {
    let text: String = element.text().collect();
    let target = match base.join(href) {
        Ok(url) => url.to_string(),
        Err(_) => href.to_string(),
    };
    format!("{} ({})", text, target)
}

// Strips trailing whitespace from every line and drops blank lines at the
// start and end. Indentation of the remaining lines is kept.
fn tidy_code(raw: &str) -> String {
    let lines: Vec<&str> = raw.lines().map(str::trim_end).collect();

    let start = lines.iter().position(|l| !l.is_empty()).unwrap_or(lines.len());
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(start, |i| i + 1);

    lines[start..end].join("\n")
}

// Puts code blocks and tables back into cleaned text
//
// Each placeholder is replaced exactly once, in a single pass, so code that
// happens to contain placeholder-looking text is left alone. Placeholders
// with no stored content stay in the text unchanged.
pub fn restore_placeholders(
    pattern: &Regex,
    text: &str,
    code_blocks: &[String],
    tables: &[String],
) -> String {
    pattern
        .replace_all(text, |caps: &Captures| {
            let index: usize = caps[2].parse().unwrap_or(0);
            let stored = match &caps[1] {
                "CODE_BLOCK" => index
                    .checked_sub(1)
                    .and_then(|i| code_blocks.get(i))
                    .map(|code| format!("\n```\n{}\n```\n", code)),
                _ => index
                    .checked_sub(1)
                    .and_then(|i| tables.get(i))
                    .map(|table| format!("\n{}\n", table)),
            };
            stored.unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}
