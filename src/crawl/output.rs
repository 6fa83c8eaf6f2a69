// src/crawl/output.rs
// =============================================================================
// Writing the crawl results to a text file.
//
// File layout:
//
//   Documentation crawled on: 2025-01-31 12:00:00
//   Source: https://example.com/docs
//   ================================================================================
//
//   ================================================================================
//   PAGE: Getting Started
//   URL: https://example.com/docs/start
//   ================================================================================
//
//   <page text>
//
// An existing file at the output path is moved to "<path>.backup" before
// the new file is created.
// =============================================================================

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use log::{info, warn};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::extract::Page;

pub const BACKUP_SUFFIX: &str = ".backup";

const RULE_WIDTH: usize = 80;

// Moves an existing output file out of the way
//
// Returns: the backup path when a backup was made
//
// A failed rename is only a warning: the crawl continues and the old file
// gets overwritten.
pub fn backup_existing(path: &Path) -> Option<PathBuf> {
    if !path.exists() {
        return None;
    }

    let mut backup = path.as_os_str().to_owned();
    backup.push(BACKUP_SUFFIX);
    let backup = PathBuf::from(backup);

    match std::fs::rename(path, &backup) {
        Ok(()) => {
            info!("Existing file backed up to: {}", backup.display());
            Some(backup)
        }
        Err(e) => {
            warn!("Could not create backup of {}: {}", path.display(), e);
            None
        }
    }
}

/// Sink for the crawl output.
pub struct OutputSink<W: Write> {
    writer: W,
}

impl OutputSink<BufWriter<File>> {
    // Creates (or truncates) the output file
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("Cannot open output file {}", path.display()))?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> OutputSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    // Writes the run header; called once before any page
    pub fn write_header(&mut self, crawled_at: DateTime<Local>, source: &str) -> Result<()> {
        writeln!(
            self.writer,
            "Documentation crawled on: {}",
            crawled_at.format("%Y-%m-%d %H:%M:%S")
        )?;
        writeln!(self.writer, "Source: {}", source)?;
        writeln!(self.writer, "{}\n", rule())?;
        self.writer.flush()?;
        Ok(())
    }

    // Appends one page and flushes, so a crash loses at most the page
    // being processed
    pub fn write_page(&mut self, page: &Page) -> Result<()> {
        write!(self.writer, "\n{}\n", rule())?;
        writeln!(self.writer, "PAGE: {}", page.title)?;
        writeln!(self.writer, "URL: {}", page.url)?;
        write!(self.writer, "{}\n\n", rule())?;
        self.writer.write_all(page.body.as_bytes())?;
        self.writer.write_all(b"\n\n")?;
        self.writer.flush()?;
        Ok(())
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}
