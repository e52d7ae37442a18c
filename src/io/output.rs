use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

/// What a finished run did, written with `--summary`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub run_id: String,
    pub opinions_loaded: usize,
    pub rows_skipped: usize,
    pub themes_found: usize,
    pub themes_published: usize,
}

impl RunSummary {
    /// Write to a JSON file
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create file: {:?}", path))?;
        serde_json::to_writer_pretty(file, self).context("Failed to write JSON")?;
        Ok(())
    }
}

/// Write dry-run document text to a file
pub fn write_text_file(path: &Path, text: &str) -> Result<()> {
    let mut file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create file: {:?}", path))?;
    write!(file, "{}", text).with_context(|| format!("Failed to write file: {:?}", path))?;
    Ok(())
}
