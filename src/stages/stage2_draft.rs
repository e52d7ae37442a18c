use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::llm::{DRAFTING_INSTRUCTIONS, build_drafting_prompt};
use crate::models::{Proposal, ThemeBlock};
use crate::traits::TextGenerator;

/// Execute Stage 2 for one block: draft a policy proposal from it
pub async fn execute_stage2<G>(generator: &G, block: &ThemeBlock) -> Result<Proposal>
where
    G: TextGenerator + ?Sized,
{
    let prompt = build_drafting_prompt(block);
    debug!("Drafting prompt for theme {}:\n{}", block.index, prompt);

    let text = generator
        .generate(DRAFTING_INSTRUCTIONS, &prompt)
        .await
        .with_context(|| format!("Drafting request failed for theme {}", block.index))?;

    info!(
        "Theme {}: proposal drafted ({} chars)",
        block.index,
        text.chars().count()
    );

    Ok(Proposal {
        theme_index: block.index,
        text,
    })
}
