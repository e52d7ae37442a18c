use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::auth::ServiceAccountAuth;
use super::error::{GoogleError, check_status};
use crate::traits::DocumentSink;

pub const DOCS_API_URL: &str = "https://docs.googleapis.com/v1";

/// Browser URL of a Google Doc
pub fn document_edit_url(document_id: &str) -> String {
    format!("https://docs.google.com/document/d/{}/edit", document_id)
}

/// Append access to one Google Doc
pub struct DocsClient {
    client: Client,
    auth: Arc<ServiceAccountAuth>,
    document_id: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct Document {
    #[serde(default)]
    body: Option<Body>,
}

#[derive(Debug, Deserialize)]
struct Body {
    #[serde(default)]
    content: Vec<StructuralElement>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StructuralElement {
    #[serde(default)]
    end_index: usize,
}

#[derive(Debug, Serialize)]
struct BatchUpdateRequest<'a> {
    requests: Vec<DocRequest<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
enum DocRequest<'a> {
    InsertText { location: Location, text: &'a str },
}

#[derive(Debug, Serialize)]
struct Location {
    index: usize,
}

impl DocsClient {
    pub fn new(
        client: Client,
        auth: Arc<ServiceAccountAuth>,
        document_id: impl Into<String>,
    ) -> Self {
        Self {
            client,
            auth,
            document_id: document_id.into(),
            base_url: DOCS_API_URL.to_string(),
        }
    }

    /// Point at a different Docs API root, e.g. a local mock server
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn document_id(&self) -> &str {
        &self.document_id
    }
}

#[async_trait]
impl DocumentSink for DocsClient {
    async fn end_index(&self) -> Result<usize> {
        let token = self.auth.access_token().await?;

        let response = self
            .client
            .get(format!("{}/documents/{}", self.base_url, self.document_id))
            .bearer_auth(token)
            .query(&[("fields", "body.content(endIndex)")])
            .send()
            .await
            .context("Failed to send documents.get request")?;

        let document: Document = check_status("Docs", response)
            .await?
            .json()
            .await
            .context("Failed to parse document")?;

        let index = end_of_content(&document)
            .ok_or_else(|| GoogleError::EmptyDocument(self.document_id.clone()))?;
        debug!("Document {} ends at {}", self.document_id, index);
        Ok(index)
    }

    async fn insert_text(&self, index: usize, text: &str) -> Result<()> {
        let token = self.auth.access_token().await?;
        let request = insert_text_request(index, text);

        let response = self
            .client
            .post(format!(
                "{}/documents/{}:batchUpdate",
                self.base_url, self.document_id
            ))
            .bearer_auth(token)
            .json(&request)
            .send()
            .await
            .context("Failed to send documents.batchUpdate request")?;

        check_status("Docs", response).await?;
        debug!(
            "Inserted {} UTF-16 units at {}",
            text.encode_utf16().count(),
            index
        );
        Ok(())
    }
}

/// Insertion point before the body's trailing newline
fn end_of_content(document: &Document) -> Option<usize> {
    document
        .body
        .as_ref()
        .and_then(|b| b.content.last())
        .map(|e| e.end_index.saturating_sub(1))
}

fn insert_text_request(index: usize, text: &str) -> BatchUpdateRequest<'_> {
    BatchUpdateRequest {
        requests: vec![DocRequest::InsertText {
            location: Location { index },
            text,
        }],
    }
}
