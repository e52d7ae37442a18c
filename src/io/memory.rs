use std::sync::Mutex;

use anyhow::{Result, anyhow, bail};
use async_trait::async_trait;

use crate::traits::DocumentSink;

/// One insertion request as received by [`InMemoryDocument`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insertion {
    pub index: usize,
    pub text: String,
}

#[derive(Debug, Default)]
struct DocumentState {
    content: String,
    insertions: Vec<Insertion>,
}

/// A local stand-in for a Google Doc.
///
/// Indices count UTF-16 code units like the Docs API. The document starts
/// with `initial_length` units of pre-existing content that is never
/// materialized; only text inserted after it is kept.
#[derive(Debug, Default)]
pub struct InMemoryDocument {
    initial_length: usize,
    state: Mutex<DocumentState>,
}

impl InMemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_initial_length(initial_length: usize) -> Self {
        Self {
            initial_length,
            state: Mutex::default(),
        }
    }

    /// Text inserted so far
    pub fn content(&self) -> String {
        self.snapshot().content.clone()
    }

    /// Every insertion request in the order received
    pub fn insertions(&self) -> Vec<Insertion> {
        self.snapshot().insertions.clone()
    }

    /// Read access that also works on a poisoned lock
    fn snapshot(&self) -> std::sync::MutexGuard<'_, DocumentState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, DocumentState>> {
        self.state
            .lock()
            .map_err(|_| anyhow!("in-memory document lock poisoned"))
    }
}

#[async_trait]
impl DocumentSink for InMemoryDocument {
    async fn end_index(&self) -> Result<usize> {
        let state = self.lock()?;
        Ok(self.initial_length + state.content.encode_utf16().count())
    }

    async fn insert_text(&self, index: usize, text: &str) -> Result<()> {
        let mut state = self.lock()?;
        let end = self.initial_length + state.content.encode_utf16().count();
        if index < self.initial_length || index > end {
            bail!(
                "insertion index {} outside editable range {}..={}",
                index,
                self.initial_length,
                end
            );
        }

        let offset = byte_offset(&state.content, index - self.initial_length)
            .ok_or_else(|| anyhow!("insertion index {} splits a character", index))?;
        state.content.insert_str(offset, text);
        state.insertions.push(Insertion {
            index,
            text: text.to_string(),
        });
        Ok(())
    }
}

/// Byte offset of the given UTF-16 position, if it falls on a char boundary
fn byte_offset(s: &str, utf16_pos: usize) -> Option<usize> {
    let mut units = 0;
    for (offset, ch) in s.char_indices() {
        if units == utf16_pos {
            return Some(offset);
        }
        if units > utf16_pos {
            return None;
        }
        units += ch.len_utf16();
    }
    (units == utf16_pos).then_some(s.len())
}
