//! Capabilities the pipeline depends on.
//!
//! The stages only see these traits; the Google and OpenAI adapters (and the
//! in-memory document used for dry runs) implement them.

use anyhow::Result;
use async_trait::async_trait;

use crate::models::Record;

/// Read-only access to rows of named fields
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Fetch every data row in source order
    async fn fetch_records(&self) -> Result<Vec<Record>>;
}

/// Text generation from a system instruction and a user input
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Run one generation call and return the text of the reply
    async fn generate(&self, instructions: &str, input: &str) -> Result<String>;
}

/// A destination document that supports appending text
#[async_trait]
pub trait DocumentSink: Send + Sync {
    /// Index just past the last character of the document body
    async fn end_index(&self) -> Result<usize>;

    /// Insert `text` at `index` in a single request
    async fn insert_text(&self, index: usize, text: &str) -> Result<()>;

    /// Append `text` at the current end of the document.
    ///
    /// The end index is re-queried on every call.
    async fn append_text(&self, text: &str) -> Result<()> {
        let index = self.end_index().await?;
        self.insert_text(index, text).await
    }
}
