use anyhow::Result;
use tracing::{Instrument, info, info_span};
use uuid::Uuid;

use crate::io::RunSummary;
use crate::stages::{
    Stage0Config, Stage3Config, execute_stage0, execute_stage1, execute_stage2, execute_stage3,
    publish_header,
};
use crate::traits::{DocumentSink, RecordSource, TextGenerator};

/// Settings passed through to each stage
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    pub load: Stage0Config,
    pub publish: Stage3Config,
}

/// Run load → group → header → (draft → publish) per theme.
///
/// Every call is awaited in sequence. The first failure ends the run;
/// sections already appended stay in the document.
pub async fn run_pipeline<S, G, D>(
    source: &S,
    generator: &G,
    sink: &D,
    config: &PipelineConfig,
) -> Result<RunSummary>
where
    S: RecordSource + ?Sized,
    G: TextGenerator + ?Sized,
    D: DocumentSink + ?Sized,
{
    let run_id = Uuid::new_v4().to_string();
    let span = info_span!("run", run_id = %run_id);

    async move {
        let loaded = execute_stage0(source, &config.load).await?;
        let grouped = execute_stage1(generator, &loaded.opinions).await?;

        publish_header(sink, &config.publish).await?;

        let mut themes_published = 0;
        for block in &grouped.blocks {
            let proposal = execute_stage2(generator, block).await?;
            execute_stage3(sink, block, &proposal).await?;
            themes_published += 1;
        }

        info!(
            "Complete: {} themes published from {} opinions",
            themes_published,
            loaded.opinions.len()
        );

        Ok(RunSummary {
            run_id,
            opinions_loaded: loaded.opinions.len(),
            rows_skipped: loaded.rows_skipped,
            themes_found: grouped.blocks.len(),
            themes_published,
        })
    }
    .instrument(span)
    .await
}
