use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::llm::{GROUPING_INSTRUCTIONS, build_grouping_prompt};
use crate::models::{Opinion, ThemeBlock, split_theme_blocks};
use crate::traits::TextGenerator;

/// Result of Stage 1 grouping
#[derive(Debug, Clone)]
pub struct Stage1Result {
    /// The model's reply, unmodified
    pub raw_output: String,
    /// Non-blank blocks of the reply, in order
    pub blocks: Vec<ThemeBlock>,
}

/// Execute Stage 1: ask the model to cluster the opinions into themes.
///
/// The reply is split on blank lines; the model is trusted to emit one
/// theme per block.
pub async fn execute_stage1<G>(generator: &G, opinions: &[Opinion]) -> Result<Stage1Result>
where
    G: TextGenerator + ?Sized,
{
    let prompt = build_grouping_prompt(opinions);
    debug!("Grouping prompt:\n{}", prompt);

    let raw_output = generator
        .generate(GROUPING_INSTRUCTIONS, &prompt)
        .await
        .context("Grouping request failed")?;

    let blocks = split_theme_blocks(&raw_output);
    info!("Stage 1: {} theme blocks from grouping output", blocks.len());
    if blocks.is_empty() {
        warn!("Grouping output contained no non-blank blocks");
    }

    Ok(Stage1Result { raw_output, blocks })
}
