use anyhow::{Context, Result};
use tracing::info;

use crate::llm::{SUMMARY_HEADER, format_theme_section};
use crate::models::{Proposal, ThemeBlock};
use crate::traits::DocumentSink;

/// Configuration for Stage 3 publishing
#[derive(Debug, Clone)]
pub struct Stage3Config {
    /// Banner appended once before the theme sections
    pub header: String,
}

impl Default for Stage3Config {
    fn default() -> Self {
        Self {
            header: SUMMARY_HEADER.to_string(),
        }
    }
}

/// Append the summary banner
pub async fn publish_header<D>(sink: &D, config: &Stage3Config) -> Result<()>
where
    D: DocumentSink + ?Sized,
{
    sink.append_text(&config.header)
        .await
        .context("Failed to append summary header")?;
    info!("Stage 3: header appended");
    Ok(())
}

/// Execute Stage 3 for one block: append marker, block text and proposal
pub async fn execute_stage3<D>(sink: &D, block: &ThemeBlock, proposal: &Proposal) -> Result<()>
where
    D: DocumentSink + ?Sized,
{
    let section = format_theme_section(block, proposal);
    sink.append_text(&section)
        .await
        .with_context(|| format!("Failed to append theme {}", block.index))?;
    info!("Theme {}: section appended", block.index);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::InMemoryDocument;

    #[test]
    fn test_stage3_config_default() {
        let config = Stage3Config::default();
        assert_eq!(config.header, SUMMARY_HEADER);
    }

    #[tokio::test]
    async fn test_header_then_section() {
        let doc = InMemoryDocument::with_initial_length(10);
        let block = ThemeBlock {
            index: 1,
            text: "Theme A".to_string(),
        };
        let proposal = Proposal {
            theme_index: 1,
            text: "Do A.".to_string(),
        };

        publish_header(&doc, &Stage3Config::default()).await.unwrap();
        execute_stage3(&doc, &block, &proposal).await.unwrap();

        let insertions = doc.insertions();
        assert_eq!(insertions.len(), 2);
        assert_eq!(insertions[0].index, 10);
        assert_eq!(insertions[0].text, SUMMARY_HEADER);
        assert_eq!(
            insertions[1].index,
            10 + SUMMARY_HEADER.encode_utf16().count()
        );
        assert!(insertions[1].text.contains("📌 テーマ 1\nTheme A\n"));
        assert!(insertions[1].text.ends_with("Do A.\n"));
    }
}
