// src/extract/cleanup.rs
// =============================================================================
// This module tidies up text pulled out of the DOM.
//
// Text from get-text style extraction is messy:
// - Indentation from the HTML source leaks into every line
// - Runs of empty lines appear wherever block elements were
// - Some glyphs arrive mangled (emoji, arrows, obfuscated emails)
// - Words from adjacent inline elements get glued together ("fooBar")
//
// The fixes are driven by two data tables (CleanupRules) so new entries can
// be added from the config file without touching the loop below.
// =============================================================================

use serde::{Deserialize, Serialize};

/// A literal substring and the plain-text form it should become.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replacement {
    pub from: String,
    pub to: String,
}

impl Replacement {
    pub fn new(from: &str, to: &str) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}

/// Tables driving the line cleanup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanupRules {
    /// Applied in order to every line.
    pub replacements: Vec<Replacement>,

    /// A word boundary is never inserted right after a run ending in one of
    /// these terms.
    pub protected_terms: Vec<String>,
}

impl Default for CleanupRules {
    fn default() -> Self {
        Self {
            replacements: vec![
                Replacement::new("[email\u{a0}protected]", "email@example.com"),
                Replacement::new("[email protected]", "email@example.com"),
                Replacement::new("\u{1f6a7}", "[NOTE]"),
                Replacement::new("\u{2794}", "->"),
                Replacement::new("\u{2764}\u{fe0f}", "<3"),
            ],
            protected_terms: ["REST", "API", "UI", "JSON", "SDK"]
                .iter()
                .map(|t| t.to_string())
                .collect(),
        }
    }
}

impl CleanupRules {
    // Cleans extracted text line by line
    //
    // - Line endings become \n and every line is trimmed
    // - Replacement table entries are applied
    // - Glued words are split apart (see split_joined_words)
    // - Consecutive blank lines collapse into one; leading and trailing
    //   blank lines are dropped
    //
    // Running clean() on its own output returns the same text.
    pub fn clean(&self, text: &str) -> String {
        let normalized = text.replace("\r\n", "\n").replace('\r', "\n");

        let mut cleaned: Vec<String> = Vec::new();
        let mut prev_empty = false;

        for raw_line in normalized.split('\n') {
            let line = self.apply_replacements(raw_line.trim());
            let line = self.split_joined_words(&line);

            if !line.is_empty() {
                cleaned.push(line);
                prev_empty = false;
            } else if !prev_empty {
                cleaned.push(String::new());
                prev_empty = true;
            }
        }

        while cleaned.last().is_some_and(|l| l.is_empty()) {
            cleaned.pop();
        }
        let first_content = cleaned
            .iter()
            .position(|l| !l.is_empty())
            .unwrap_or(cleaned.len());

        cleaned[first_content..].join("\n")
    }

    fn apply_replacements(&self, line: &str) -> String {
        let mut line = line.to_string();
        for replacement in &self.replacements {
            if line.contains(&replacement.from) {
                line = line.replace(&replacement.from, &replacement.to);
            }
        }
        line
    }

    // Inserts a space where an uppercase letter directly follows a lowercase
    // one, e.g. "GettingStarted" -> "Getting Started"
    //
    // The line is scanned as a sequence of runs. A new run starts at each
    // inserted boundary; no boundary is inserted while the current run ends
    // with a protected term.
    pub fn split_joined_words(&self, line: &str) -> String {
        let mut out = String::with_capacity(line.len() + 8);
        let mut run_start = 0;
        let mut prev: Option<char> = None;

        for ch in line.chars() {
            if let Some(p) = prev {
                if ch.is_uppercase() && p.is_lowercase() && !self.is_protected(&out[run_start..]) {
                    out.push(' ');
                    run_start = out.len();
                }
            }
            out.push(ch);
            prev = Some(ch);
        }

        out
    }

    fn is_protected(&self, run: &str) -> bool {
        self.protected_terms
            .iter()
            .any(|term| !term.is_empty() && run.ends_with(term.as_str()))
    }
}
