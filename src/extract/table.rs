// src/extract/table.rs
// =============================================================================
// Renders an HTML <table> as pipe-delimited plain text:
//
//   Name | Type
//   ----------------------------------------
//   `id` | integer
//   name | string
//
// - Header cells (<th>) form the first line, followed by a dash rule that is
//   20 characters per header cell
// - Every <tr> becomes one line of cells joined by " | "
// - A cell containing <code> shows that code in backticks
// - A row that renders exactly like the header is skipped; the header row
//   itself and tables whose first body row repeats the header both hit this
// =============================================================================

use scraper::ElementRef;
use url::Url;

use super::html::inline_text;

const RULE_WIDTH_PER_HEADER: usize = 20;

pub fn render_table(table: ElementRef, base: &Url) -> String {
    let headers: Vec<String> = descendants_named(table, &["th"])
        .map(|cell| cell_text(cell, base))
        .collect();

    let mut rendered = String::new();
    let header_line = headers.join(" | ");

    if !headers.is_empty() {
        rendered.push_str(&header_line);
        rendered.push('\n');
        rendered.push_str(&"-".repeat(headers.len() * RULE_WIDTH_PER_HEADER));
        rendered.push('\n');
    }

    for row in descendants_named(table, &["tr"]) {
        let cells: Vec<String> = descendants_named(row, &["td", "th"])
            .map(|cell| cell_text(cell, base))
            .collect();
        if cells.is_empty() {
            continue;
        }

        let row_line = cells.join(" | ");
        if !headers.is_empty() && row_line == header_line {
            continue;
        }
        rendered.push_str(&row_line);
        rendered.push('\n');
    }

    rendered
}

// Text of one cell: the first nested <code> in backticks, or the cell's text
fn cell_text(cell: ElementRef, base: &Url) -> String {
    match descendants_named(cell, &["code"]).next() {
        Some(code) => format!("`{}`", inline_text(code, base).trim()),
        None => inline_text(cell, base).trim().to_string(),
    }
}

// All descendant elements (excluding `element` itself) whose tag is in `names`
fn descendants_named<'a>(
    element: ElementRef<'a>,
    names: &'a [&'a str],
) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    element
        .descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .filter(move |e| names.contains(&e.value().name()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    fn render(html: &str) -> String {
        let document = Html::parse_document(html);
        let selector = Selector::parse("table").unwrap();
        let table = document.select(&selector).next().unwrap();
        let base = Url::parse("https://example.com/docs/").unwrap();
        render_table(table, &base)
    }

    #[test]
    fn test_header_and_rows() {
        let text = render(
            "<table><thead><tr><th>Name</th><th>Type</th></tr></thead>\
             <tbody><tr><td>id</td><td>integer</td></tr><tr><td>name</td><td>string</td></tr></tbody></table>",
        );
        let rule = "-".repeat(40);
        assert_eq!(
            text,
            format!("Name | Type\n{}\nid | integer\nname | string\n", rule)
        );
    }

    #[test]
    fn test_duplicate_header_row_is_suppressed() {
        let text = render(
            "<table><thead><tr><th>Key</th><th>Value</th></tr></thead>\
             <tbody><tr><td>Key</td><td>Value</td></tr><tr><td>a</td><td>1</td></tr></tbody></table>",
        );
        assert_eq!(text.matches("Key | Value").count(), 1);
        assert!(text.ends_with("a | 1\n"));
    }

    #[test]
    fn test_table_without_headers() {
        let text = render("<table><tr><td>a</td><td>b</td></tr><tr><td>c</td><td>d</td></tr></table>");
        assert_eq!(text, "a | b\nc | d\n");
    }

    #[test]
    fn test_code_cells_use_backticks() {
        let text = render(
            "<table><tr><th>Field</th></tr><tr><td>The <code> user_id </code> field</td></tr></table>",
        );
        assert_eq!(text, format!("Field\n{}\n`user_id`\n", "-".repeat(20)));
    }

    #[test]
    fn test_links_in_cells() {
        let text = render(r#"<table><tr><td><a href="intro">Intro</a></td></tr></table>"#);
        assert_eq!(text, "Intro (https://example.com/docs/intro)\n");
    }

    #[test]
    fn test_empty_rows_are_skipped() {
        let text = render("<table><tr></tr><tr><td>x</td></tr></table>");
        assert_eq!(text, "x\n");
    }
}
