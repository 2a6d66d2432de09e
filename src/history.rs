// File: src/history.rs
use crate::core::types::TranslationRecord;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Append-only log of past translations. Never read back.
#[derive(Debug, Clone)]
pub struct TranslationHistory {
    path: PathBuf,
}

impl TranslationHistory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one `Input:` / `Output:` block followed by a blank line.
    pub fn append(&self, record: &TranslationRecord) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        write!(file, "{}", render_record(record))
    }
}

fn render_record(record: &TranslationRecord) -> String {
    format!("Input: {}\nOutput: {}\n\n", record.input, record.output)
}
